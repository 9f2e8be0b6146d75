//! `taskboard task`: deadlines, completion marks and progress

use crate::api::{Task, TaskInput};
use crate::auth::Role;
use crate::commands::Context;
use crate::error::Result;
use crate::tracker::{AssignmentBook, Countdown, parse_deadline};
use chrono::{DateTime, Utc};
use clap::Subcommand;
use std::fmt::Write;
use tracing::warn;

/// `taskboard task` subcommands.
#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// List the tasks of a week with their countdowns
    List {
        #[arg(long)]
        semester: u64,
        #[arg(long)]
        week: u64,
    },
    /// Add a task to a week
    Add {
        #[arg(long)]
        semester: u64,
        #[arg(long)]
        week: u64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        matkul: String,
        /// Deadline, YYYY-MM-DD or an RFC 3339 timestamp
        #[arg(long)]
        deadline: String,
        #[arg(long, default_value = "")]
        link: String,
    },
    /// Toggle the local done mark of a task
    Done { task_id: u64 },
}

impl TaskCommand {
    pub fn requirement(&self) -> Option<Role> {
        match self {
            TaskCommand::Add { .. } => Some(Role::Admin),
            TaskCommand::List { .. } | TaskCommand::Done { .. } => None,
        }
    }
}

pub(crate) async fn run(cmd: TaskCommand, ctx: &Context) -> Result<String> {
    match cmd {
        TaskCommand::List { semester, week } => {
            let tasks = ctx.api.list_tasks(semester, week).await?;
            let book = ctx.assignments.load();
            Ok(render_tasks(&tasks, &book, Utc::now()))
        }
        TaskCommand::Add {
            semester,
            week,
            name,
            matkul,
            deadline,
            link,
        } => {
            let input = TaskInput {
                name,
                matkul,
                link,
                deadline,
            };
            ctx.api.create_task(semester, week, &input).await?;
            Ok(format!("Task '{}' added", input.name.trim()))
        }
        TaskCommand::Done { task_id } => {
            let done = ctx.assignments.toggle(task_id)?;
            Ok(if done {
                format!("Task {} marked done", task_id)
            } else {
                format!("Task {} marked not done", task_id)
            })
        }
    }
}

/// Task table with done marks, countdowns and a progress footer
pub(crate) fn render_tasks(tasks: &[Task], book: &AssignmentBook, now: DateTime<Utc>) -> String {
    if tasks.is_empty() {
        return "No tasks this week".to_string();
    }

    let mut out = String::new();
    for task in tasks {
        let mark = if book.is_done(task.task_id) { "x" } else { " " };
        let countdown = match parse_deadline(&task.deadline) {
            Ok(deadline) => Countdown::between(deadline, now).to_string(),
            Err(e) => {
                warn!(task_id = task.task_id, error = %e, "Unreadable deadline");
                format!("due {}", task.deadline)
            }
        };
        let _ = writeln!(
            out,
            "[{}] {:>4}  {} ({}), {}",
            mark, task.task_id, task.name, task.matkul, countdown
        );
        if !task.link.is_empty() {
            let _ = writeln!(out, "          {}", task.link);
        }
    }

    let _ = write!(
        out,
        "Progress: {}/{} done ({}%)",
        book.done_count(tasks),
        tasks.len(),
        book.progress(tasks)
    );
    out
}
