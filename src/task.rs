//! Task entity and urgency scoring.
//!
//! A task's score is derived from its priority, due date, effort and
//! completion flag relative to a caller-supplied "today". Nothing in this
//! module reads the system clock.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Date format used for due dates on input and in the task file
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Days out at which the urgency factor bottoms out at 1
const URGENCY_HORIZON_DAYS: i64 = 10;

/// Lower bound of the urgency factor
const MIN_URGENCY: i64 = 1;

/// Compute the urgency score of a task.
///
/// Completed tasks always score 0. Otherwise the urgency factor is
/// `max(1, 10 - days_left)`, where `days_left` is negative for overdue tasks,
/// and the score is `priority * urgency - effort`. Scores may be negative.
/// The arithmetic saturates at the `i64` bounds, so extreme efforts pin the
/// score to `i64::MIN` or `i64::MAX` instead of overflowing.
pub fn calculate_score(
    priority: u8,
    due_date: NaiveDate,
    effort: i64,
    completed: bool,
    today: NaiveDate,
) -> i64 {
    if completed {
        return 0;
    }
    let days_left = due_date.signed_duration_since(today).num_days();
    let urgency = URGENCY_HORIZON_DAYS
        .saturating_sub(days_left)
        .max(MIN_URGENCY);
    i64::from(priority)
        .saturating_mul(urgency)
        .saturating_sub(effort)
}

/// Parse a `YYYY-MM-DD` due date.
pub fn parse_due_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, DUE_DATE_FORMAT).map_err(|err| {
        Error::Validation(format!(
            "due date '{trimmed}' is not a valid YYYY-MM-DD date ({err})"
        ))
    })
}

fn validate_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("title cannot be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Raw input for a new task, as handed over by a front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub priority: u8,
    pub due_date: String,
    pub effort: i64,
    pub category: String,
}

/// Sparse set of changes applied by [`Task::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub priority: Option<u8>,
    pub due_date: Option<String>,
    pub effort: Option<i64>,
    pub category: Option<String>,
    pub completed: Option<bool>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.effort.is_none()
            && self.category.is_none()
            && self.completed.is_none()
    }
}

/// A single tracked task.
///
/// `score` is kept private so it can only change through rescoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub title: String,
    pub priority: u8,
    pub due_date: NaiveDate,
    pub effort: i64,
    pub category: String,
    pub completed: bool,
    score: i64,
}

impl Task {
    /// Build an open task from already-typed values and score it.
    pub fn new(
        title: impl Into<String>,
        priority: u8,
        due_date: NaiveDate,
        effort: i64,
        category: impl Into<String>,
        today: NaiveDate,
    ) -> Self {
        let mut task = Self {
            title: title.into(),
            priority,
            due_date,
            effort,
            category: category.into(),
            completed: false,
            score: 0,
        };
        task.rescore(today);
        task
    }

    /// Validate raw front-end input and build a scored task.
    pub fn create(input: NewTask, today: NaiveDate) -> Result<Self> {
        let title = validate_title(&input.title)?;
        let due_date = parse_due_date(&input.due_date)?;
        Ok(Self::new(
            title,
            input.priority,
            due_date,
            input.effort,
            input.category,
            today,
        ))
    }

    /// Rebuild a task from a stored record. Any stored score is discarded.
    pub(crate) fn from_record(record: TaskRecord, today: NaiveDate) -> Self {
        let mut task = Self::new(
            record.title.trim(),
            record.priority,
            record.due_date,
            record.effort,
            record.category,
            today,
        );
        task.completed = record.completed;
        task.rescore(today);
        task
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    /// Recompute the score for `today`.
    pub fn rescore(&mut self, today: NaiveDate) {
        self.score = calculate_score(
            self.priority,
            self.due_date,
            self.effort,
            self.completed,
            today,
        );
    }

    /// Apply a sparse update and rescore.
    ///
    /// Every supplied value is validated before anything is written, so an
    /// error leaves the task as it was.
    pub fn update(&mut self, changes: &TaskUpdate, today: NaiveDate) -> Result<()> {
        let title = changes.title.as_deref().map(validate_title).transpose()?;
        let due_date = changes
            .due_date
            .as_deref()
            .map(parse_due_date)
            .transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if let Some(due_date) = due_date {
            self.due_date = due_date;
        }
        if let Some(effort) = changes.effort {
            self.effort = effort;
        }
        if let Some(category) = &changes.category {
            self.category = category.clone();
        }
        if let Some(completed) = changes.completed {
            self.completed = completed;
        }
        self.rescore(today);
        Ok(())
    }

    /// Case-insensitive title equality.
    pub fn matches_title(&self, title: &str) -> bool {
        self.title.trim().to_lowercase() == title.trim().to_lowercase()
    }

    /// Case-insensitive substring match against title or category.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let needle = keyword.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.category.to_lowercase().contains(&needle)
    }

    pub(crate) fn to_record(&self) -> TaskRecord {
        TaskRecord {
            title: self.title.clone(),
            priority: self.priority,
            due_date: self.due_date,
            effort: self.effort,
            category: self.category.clone(),
            completed: self.completed,
            score: Some(self.score),
        }
    }
}

/// On-disk shape of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub title: String,
    pub priority: u8,
    #[serde(with = "due_date_format")]
    pub due_date: NaiveDate,
    pub effort: i64,
    pub category: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
}

mod due_date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DUE_DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(DUE_DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(raw.trim(), DUE_DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}
