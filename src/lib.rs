//! taskrank - urgency-ranked task tracking library
//!
//! This library provides the core of the taskrank CLI: a task model with a
//! derived urgency score and a store that keeps tasks ordered by that score
//! across every mutation.
//!
//! # Core Concepts
//!
//! - **Score**: `priority * max(1, 10 - days_left) - effort`, 0 once completed
//! - **Ranking order**: descending score, ties by insertion order
//! - **Task file**: JSON array rewritten in full after every change
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `taskrank.toml`
//! - `error`: Error types and result aliases
//! - `output`: Human and JSON rendering for the CLI
//! - `storage`: Task file reading and atomic rewriting
//! - `store`: Ordered task collection and its operations
//! - `task`: Task entity and scoring

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod storage;
pub mod store;
pub mod task;

pub use error::{Error, Result};
pub use store::TaskStore;
pub use task::{calculate_score, NewTask, Task, TaskUpdate};
