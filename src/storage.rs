//! Durable record for taskrank.
//!
//! The whole collection lives in a single pretty-printed JSON array that is
//! rewritten in full on every save:
//!
//! ```text
//! tasks.json
//!   [ { "title": ..., "priority": ..., "due_date": "YYYY-MM-DD",
//!       "effort": ..., "category": ..., "completed": ..., "score": ... } ]
//! ```
//!
//! Writes go to a temp file in the same directory which is then renamed over
//! the target, so the file on disk is always either the old or the new
//! collection.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::task::TaskRecord;

/// Default file name of the task record
pub const TASKS_FILE: &str = "tasks.json";

/// Handle on the task record file
#[derive(Debug, Clone)]
pub struct TaskFile {
    path: PathBuf,
}

impl TaskFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all records.
    ///
    /// Returns `Ok(None)` when the file does not exist yet. Any other read
    /// failure, and any content that is not a valid record array, is a
    /// persistence error.
    pub fn read(&self) -> Result<Option<Vec<TaskRecord>>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(Error::persistence(&self.path, err)),
        };

        let records: Vec<TaskRecord> = serde_json::from_str(&content)
            .map_err(|err| Error::persistence(&self.path, format!("malformed task data: {err}")))?;
        Ok(Some(records))
    }

    /// Replace the file with `records`.
    pub fn write(&self, records: &[TaskRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)
            .map_err(|err| Error::persistence(&self.path, err))?;
        self.write_atomic(json.as_bytes())
            .map_err(|err| Error::persistence(&self.path, err))
    }

    fn write_atomic(&self, data: &[u8]) -> io::Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        // Dropping the temp file on an early return removes it.
        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(data)?;
        temp.write_all(b"\n")?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }
}
