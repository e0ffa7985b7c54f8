//! taskrank command implementations.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{emit_success, task_line, HumanOutput, OutputOptions};
use crate::store::TaskStore;
use crate::task::{NewTask, Task, TaskUpdate, DUE_DATE_FORMAT};

/// Global options shared by every command
pub struct ContextOptions {
    pub file: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub today: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

pub struct AddOptions {
    pub title: String,
    pub priority: u8,
    pub due: String,
    pub effort: i64,
    pub category: String,
}

pub struct EditOptions {
    pub title: String,
    pub new_title: Option<String>,
    pub priority: Option<u8>,
    pub due: Option<String>,
    pub effort: Option<i64>,
    pub category: Option<String>,
}

struct Context {
    store: TaskStore,
    config: Config,
    output: OutputOptions,
}

#[derive(Serialize)]
struct TaskChangedOutput {
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    task: Option<Task>,
}

#[derive(Serialize)]
struct TaskListOutput {
    total: usize,
    tasks: Vec<Task>,
}

impl Context {
    /// Human output that carries the store's load warnings
    fn human(&self, header: impl Into<String>) -> HumanOutput {
        let mut human = HumanOutput::new(header);
        for warning in self.store.load_warnings() {
            human.push_warning(warning.clone());
        }
        human
    }
}

fn resolve_today(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), DUE_DATE_FORMAT).map_err(|_| {
            Error::InvalidArgument(format!("--today '{raw}' is not a YYYY-MM-DD date"))
        }),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn load_context(options: ContextOptions) -> Result<Context> {
    let today = resolve_today(options.today.as_deref())?;
    let config = Config::load_or_default(options.config.as_deref())?;
    let path = config.tasks_path(options.file.as_deref());
    tracing::debug!(path = %path.display(), %today, "opening task store");
    let store = TaskStore::open(path, today)?;
    Ok(Context {
        store,
        config,
        output: OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
    })
}

fn push_task_summary(human: &mut HumanOutput, task: &Task) {
    human.push_summary("Title", task.title.clone());
    human.push_summary("Score", task.score().to_string());
    human.push_summary("Priority", task.priority.to_string());
    human.push_summary("Due", task.due_date.format(DUE_DATE_FORMAT).to_string());
    human.push_summary("Effort", format!("{}h", task.effort));
    human.push_summary("Category", task.category.clone());
    if task.completed {
        human.push_summary("Completed", "");
    }
}

fn emit_task_list(ctx: &Context, command: &str, header: &str, tasks: Vec<Task>) -> Result<()> {
    let mut human = ctx.human(header);
    if tasks.is_empty() {
        human.push_summary("No tasks found", "");
    }
    for (idx, task) in tasks.iter().enumerate() {
        human.push_detail(task_line(idx + 1, task));
    }

    let output = TaskListOutput {
        total: tasks.len(),
        tasks,
    };
    emit_success(ctx.output, command, &output, Some(&human))
}

pub fn run_add(options: ContextOptions, add: AddOptions) -> Result<()> {
    let mut ctx = load_context(options)?;
    let task = ctx.store.add(NewTask {
        title: add.title,
        priority: add.priority,
        due_date: add.due,
        effort: add.effort,
        category: add.category,
    })?;

    let mut human = ctx.human("Task added");
    push_task_summary(&mut human, &task);
    emit_success(ctx.output, "add", &task, Some(&human))
}

pub fn run_edit(options: ContextOptions, edit: EditOptions) -> Result<()> {
    let mut ctx = load_context(options)?;
    let changes = TaskUpdate {
        title: edit.new_title,
        priority: edit.priority,
        due_date: edit.due,
        effort: edit.effort,
        category: edit.category,
        completed: None,
    };
    if changes.is_empty() {
        return Err(Error::InvalidArgument("no updates provided".to_string()));
    }

    if !ctx.store.edit(&edit.title, &changes)? {
        return Err(Error::TaskNotFound(edit.title));
    }
    let lookup = changes.title.as_deref().unwrap_or(&edit.title);
    let task = ctx.store.get(lookup).cloned();

    let mut human = ctx.human("Task updated");
    if let Some(task) = &task {
        push_task_summary(&mut human, task);
    }
    let output = TaskChangedOutput {
        title: edit.title,
        task,
    };
    emit_success(ctx.output, "edit", &output, Some(&human))
}

pub fn run_rm(options: ContextOptions, title: String) -> Result<()> {
    let mut ctx = load_context(options)?;
    if !ctx.store.delete(&title)? {
        return Err(Error::TaskNotFound(title));
    }

    let mut human = ctx.human("Task deleted");
    human.push_summary("Title", title.clone());
    let output = TaskChangedOutput { title, task: None };
    emit_success(ctx.output, "rm", &output, Some(&human))
}

pub fn run_done(options: ContextOptions, title: String) -> Result<()> {
    let mut ctx = load_context(options)?;
    if !ctx.store.mark_completed(&title)? {
        return Err(Error::TaskNotFound(title));
    }
    let task = ctx.store.get(&title).cloned();

    let mut human = ctx.human("Task completed");
    if let Some(task) = &task {
        push_task_summary(&mut human, task);
    }
    let output = TaskChangedOutput { title, task };
    emit_success(ctx.output, "done", &output, Some(&human))
}

pub fn run_search(options: ContextOptions, keyword: String) -> Result<()> {
    let ctx = load_context(options)?;
    let tasks = ctx.store.search(&keyword);
    let header = format!("Tasks matching '{keyword}'");
    emit_task_list(&ctx, "search", &header, tasks)
}

pub fn run_top(options: ContextOptions, count: Option<usize>) -> Result<()> {
    let ctx = load_context(options)?;
    let count = count.unwrap_or(ctx.config.top.count);
    let tasks = ctx.store.top_tasks(count);
    emit_task_list(&ctx, "top", "Top tasks", tasks)
}

pub fn run_list(options: ContextOptions) -> Result<()> {
    let ctx = load_context(options)?;
    let tasks = ctx.store.tasks();
    emit_task_list(&ctx, "list", "Tasks", tasks)
}
