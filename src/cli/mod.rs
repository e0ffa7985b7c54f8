//! Command-line interface for taskrank
//!
//! This module defines the CLI structure using clap derive macros. The
//! command implementations live in `task`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;

mod task;

/// taskrank - urgency-ranked personal task tracker
///
/// Tasks are scored from priority, due date and effort; the most urgent
/// ones come first.
#[derive(Parser, Debug)]
#[command(name = "taskrank")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the task file
    #[arg(long, global = true, env = "TASKRANK_FILE")]
    pub file: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(long, global = true, env = "TASKRANK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Date to score against (YYYY-MM-DD, defaults to the local date)
    #[arg(long, global = true, env = "TASKRANK_TODAY")]
    pub today: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task
    Add {
        /// Task title (unique, case-insensitive)
        title: String,

        /// Priority from 1 (low) to 5 (high)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        priority: u8,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: String,

        /// Estimated effort in hours
        #[arg(long)]
        effort: i64,

        /// Category
        #[arg(long)]
        category: String,
    },

    /// Change fields of a task
    Edit {
        /// Title of the task to edit
        title: String,

        /// New title
        #[arg(long = "title", value_name = "NEW_TITLE")]
        new_title: Option<String>,

        /// New priority (1-5)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        priority: Option<u8>,

        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// New effort in hours
        #[arg(long)]
        effort: Option<i64>,

        /// New category
        #[arg(long)]
        category: Option<String>,
    },

    /// Delete a task
    Rm {
        /// Title of the task to delete
        title: String,
    },

    /// Mark a task completed
    Done {
        /// Title of the task to complete
        title: String,
    },

    /// Find tasks by title or category
    Search {
        /// Case-insensitive keyword
        keyword: String,
    },

    /// Show the most urgent tasks
    Top {
        /// Number of tasks to show (defaults to top.count from config)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Show all tasks in ranking order
    List,
}

impl Cli {
    /// Run the selected command
    pub fn run(self) -> Result<()> {
        let ctx = task::ContextOptions {
            file: self.file,
            config: self.config,
            today: self.today,
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Add {
                title,
                priority,
                due,
                effort,
                category,
            } => task::run_add(
                ctx,
                task::AddOptions {
                    title,
                    priority,
                    due,
                    effort,
                    category,
                },
            ),
            Commands::Edit {
                title,
                new_title,
                priority,
                due,
                effort,
                category,
            } => task::run_edit(
                ctx,
                task::EditOptions {
                    title,
                    new_title,
                    priority,
                    due,
                    effort,
                    category,
                },
            ),
            Commands::Rm { title } => task::run_rm(ctx, title),
            Commands::Done { title } => task::run_done(ctx, title),
            Commands::Search { keyword } => task::run_search(ctx, keyword),
            Commands::Top { count } => task::run_top(ctx, count),
            Commands::List => task::run_list(ctx),
        }
    }
}
