#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// Fixed "today" used by every CLI test
pub const TODAY: &str = "2026-10-17";

/// Scratch directory holding a task file and, optionally, a config file
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.dir.path().join("tasks.json")
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read_tasks(&self) -> Result<Value, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(self.tasks_file())?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// A `taskrank` invocation isolated from the user's config and data
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskrank").expect("taskrank binary");
        cmd.current_dir(self.path())
            .env("TASKRANK_FILE", self.tasks_file())
            .env("TASKRANK_TODAY", TODAY)
            .env("XDG_CONFIG_HOME", self.path().join("xdg-config"))
            .env("XDG_DATA_HOME", self.path().join("xdg-data"))
            .env_remove("TASKRANK_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }
}

pub fn titles(tasks: &Value) -> Vec<String> {
    tasks
        .as_array()
        .expect("task array")
        .iter()
        .map(|task| task["title"].as_str().expect("title").to_string())
        .collect()
}

pub fn json_stdout(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("json stdout")
}
