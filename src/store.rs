//! Ordered task store.
//!
//! Tasks live in an arena keyed by a store-local [`TaskId`]. A separate
//! sorted index of `(Reverse(score), id)` answers "highest score first"
//! queries. Task scores change on mutation, so every write to a stored task
//! goes through [`TaskStore::put`], which drops the stale index key before
//! inserting the new one.
//!
//! Every mutating operation rewrites the task file before returning. If that
//! write fails the in-memory change is rolled back, so memory and disk never
//! disagree.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::storage::TaskFile;
use crate::task::{NewTask, Task, TaskRecord, TaskUpdate};

/// Number of tasks returned by `top` when the caller does not say
pub const DEFAULT_TOP_COUNT: usize = 5;

/// Store-local identity of a task. Assigned in insertion order, never
/// reused while the store is open, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

type RankKey = (Reverse<i64>, TaskId);

/// How to undo a mutation whose save failed
enum Undo {
    Remove(TaskId),
    Restore(TaskId, Task),
}

#[derive(Debug)]
pub struct TaskStore {
    file: TaskFile,
    today: NaiveDate,
    tasks: HashMap<TaskId, Task>,
    ranking: BTreeSet<RankKey>,
    next_id: u64,
    load_warnings: Vec<String>,
}

impl TaskStore {
    /// Open the store backed by `path`, scoring against `today`.
    ///
    /// A missing file gives an empty store.
    pub fn open(path: impl Into<PathBuf>, today: NaiveDate) -> Result<Self> {
        let mut store = Self {
            file: TaskFile::new(path),
            today,
            tasks: HashMap::new(),
            ranking: BTreeSet::new(),
            next_id: 0,
            load_warnings: Vec::new(),
        };
        store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Problems found in the task file by the last load that did not stop it
    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }

    /// Replace the in-memory collection with the contents of the task file.
    ///
    /// Stored scores are ignored; every task is rescored against `today`.
    /// On error the current collection is left untouched.
    pub fn load(&mut self) -> Result<()> {
        let records = self.file.read()?.unwrap_or_default();

        self.tasks.clear();
        self.ranking.clear();
        self.load_warnings.clear();
        let mut seen = HashSet::new();
        for record in records {
            let task = Task::from_record(record, self.today);
            if !seen.insert(task.title.to_lowercase()) {
                tracing::warn!(title = %task.title, "duplicate task title in task file");
                self.load_warnings
                    .push(format!("duplicate task title '{}' in task file", task.title));
            }
            let id = self.allocate_id();
            self.put(id, task);
        }

        tracing::debug!(
            path = %self.file.path().display(),
            tasks = self.tasks.len(),
            "loaded tasks"
        );
        Ok(())
    }

    /// Write the full collection, in ranking order, to the task file.
    pub fn save(&self) -> Result<()> {
        let records: Vec<TaskRecord> = self.ranked().map(Task::to_record).collect();
        self.file.write(&records)
    }

    /// Add a new open task.
    ///
    /// Titles are unique, compared case-insensitively.
    pub fn add(&mut self, input: NewTask) -> Result<Task> {
        let task = Task::create(input, self.today)?;
        if self.find_id(&task.title).is_some() {
            return Err(Error::DuplicateTitle(task.title));
        }

        let id = self.allocate_id();
        self.put(id, task.clone());
        self.commit(Undo::Remove(id))?;

        tracing::debug!(title = %task.title, score = task.score(), "added task");
        Ok(task)
    }

    /// Apply `changes` to the task matching `title`.
    ///
    /// Returns `Ok(false)` when no task matches. Invalid changes fail before
    /// anything is modified or written.
    pub fn edit(&mut self, title: &str, changes: &TaskUpdate) -> Result<bool> {
        let Some(id) = self.find_id(title) else {
            return Ok(false);
        };
        let previous = self.tasks[&id].clone();

        let mut updated = previous.clone();
        updated.update(changes, self.today)?;
        if self.find_id(&updated.title).is_some_and(|other| other != id) {
            return Err(Error::DuplicateTitle(updated.title));
        }

        tracing::debug!(
            title = %previous.title,
            old_score = previous.score(),
            new_score = updated.score(),
            "edited task"
        );
        self.put(id, updated);
        self.commit(Undo::Restore(id, previous))?;
        Ok(true)
    }

    /// Remove the task matching `title`.
    pub fn delete(&mut self, title: &str) -> Result<bool> {
        let Some(id) = self.find_id(title) else {
            return Ok(false);
        };
        let Some(removed) = self.take(id) else {
            return Ok(false);
        };

        tracing::debug!(title = %removed.title, "deleted task");
        self.commit(Undo::Restore(id, removed))?;
        Ok(true)
    }

    /// Mark the task matching `title` completed. Its score drops to 0.
    pub fn mark_completed(&mut self, title: &str) -> Result<bool> {
        let changes = TaskUpdate {
            completed: Some(true),
            ..TaskUpdate::default()
        };
        self.edit(title, &changes)
    }

    /// Tasks whose title or category contains `keyword`, in ranking order.
    pub fn search(&self, keyword: &str) -> Vec<Task> {
        self.ranked()
            .filter(|task| task.matches_keyword(keyword))
            .cloned()
            .collect()
    }

    /// The `count` highest-ranked tasks.
    pub fn top_tasks(&self, count: usize) -> Vec<Task> {
        self.ranked().take(count).cloned().collect()
    }

    /// Every task, in ranking order.
    pub fn tasks(&self) -> Vec<Task> {
        self.ranked().cloned().collect()
    }

    /// The task matching `title`, if any.
    pub fn get(&self, title: &str) -> Option<&Task> {
        self.find_id(title).and_then(|id| self.tasks.get(&id))
    }

    /// Move the store to a new "today": rescore every task and rebuild the
    /// ranking index. Nothing is written.
    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
        self.ranking.clear();
        for (id, task) in self.tasks.iter_mut() {
            task.rescore(today);
            self.ranking.insert((Reverse(task.score()), *id));
        }
    }

    fn ranked(&self) -> impl Iterator<Item = &Task> + '_ {
        self.ranking
            .iter()
            .filter_map(move |(_, id)| self.tasks.get(id))
    }

    // Duplicates can only come from an older file; the highest-ranked wins.
    fn find_id(&self, title: &str) -> Option<TaskId> {
        self.ranking
            .iter()
            .map(|(_, id)| *id)
            .find(|id| self.tasks.get(id).is_some_and(|task| task.matches_title(title)))
    }

    fn allocate_id(&mut self) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        id
    }

    fn put(&mut self, id: TaskId, task: Task) {
        let key = (Reverse(task.score()), id);
        if let Some(old) = self.tasks.insert(id, task) {
            self.ranking.remove(&(Reverse(old.score()), id));
        }
        self.ranking.insert(key);
    }

    fn take(&mut self, id: TaskId) -> Option<Task> {
        let task = self.tasks.remove(&id)?;
        self.ranking.remove(&(Reverse(task.score()), id));
        Some(task)
    }

    fn commit(&mut self, undo: Undo) -> Result<()> {
        let Err(err) = self.save() else {
            return Ok(());
        };

        tracing::warn!(error = %err, "save failed, rolling back");
        match undo {
            Undo::Remove(id) => {
                self.take(id);
            }
            Undo::Restore(id, task) => self.put(id, task),
        }
        Err(err)
    }
}
