//! Command-line interface definition

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use taskdesk_shared::models::task::{TaskId, TaskPriority, TaskStatus};

#[derive(Debug, Parser)]
#[command(name = "taskdesk", version, about = "Personal task manager with local accounts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an account (does not log in)
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Log in and persist the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// End the current session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// List registered users
    Users,

    /// Create a task (assigned to yourself unless `--assign` is given)
    Add(AddArgs),

    /// List tasks
    List(ListArgs),

    /// Show one task
    Show { id: TaskId },

    /// Change fields of a task
    Edit(EditArgs),

    /// Mark a task completed
    Complete { id: TaskId },

    /// Add a tag to a task
    Tag { id: TaskId, tag: String },

    /// Delete a task
    Delete { id: TaskId },

    /// Show task counts and completion rate
    Stats,

    /// Import seed tasks, skipping IDs already present
    Seed {
        /// URL or file path; defaults to TASKDESK_SEED_SOURCE
        #[arg(long)]
        source: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct AddArgs {
    pub title: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// high, medium or low
    #[arg(long, default_value = "medium")]
    pub priority: TaskPriority,

    /// pending, in-progress or completed
    #[arg(long)]
    pub status: Option<TaskStatus>,

    /// Assignee email
    #[arg(long)]
    pub assign: Option<String>,

    /// Due date (RFC 3339)
    #[arg(long)]
    pub due: Option<DateTime<Utc>>,

    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub status: Option<TaskStatus>,

    #[arg(long)]
    pub priority: Option<TaskPriority>,

    /// Case-insensitive match on title or description
    #[arg(long)]
    pub search: Option<String>,

    /// Only tasks assigned to you
    #[arg(long)]
    pub mine: bool,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: TaskId,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub priority: Option<TaskPriority>,

    #[arg(long)]
    pub status: Option<TaskStatus>,

    #[arg(long)]
    pub assign: Option<String>,

    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<DateTime<Utc>>,

    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,

    /// Replace all tags (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,
}
