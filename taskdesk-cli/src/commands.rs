//! Command execution
//!
//! Every command runs against an open [`TaskDesk`] and writes its
//! human-readable result to `out`. Logging goes to stderr separately.

use std::io::Write;

use anyhow::{bail, Context};
use taskdesk_shared::auth::AuthError;
use taskdesk_shared::context::TaskDesk;
use taskdesk_shared::models::task::{NewTask, Task, TaskFilter, TaskId, UpdateTask};
use taskdesk_shared::models::user::User;
use taskdesk_shared::tasks::seed;
use tracing::warn;

use crate::cli::{AddArgs, Command, EditArgs, ListArgs};
use crate::config::Config;

/// Runs one command, then shuts `desk` down
///
/// The command's error takes precedence; a flush failure after a failed
/// command is logged instead of returned.
pub async fn run_and_shutdown(
    command: Command,
    mut desk: TaskDesk,
    config: &Config,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let result = run(command, &mut desk, config, out).await;
    let shutdown = desk.shutdown();

    match (result, shutdown) {
        (Err(e), Err(flush)) => {
            warn!(error = %flush, "Flush on shutdown failed");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), shutdown) => Ok(shutdown?),
    }
}

/// Runs one command
pub async fn run(
    command: Command,
    desk: &mut TaskDesk,
    config: &Config,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Register {
            name,
            email,
            password,
        } => match desk.auth.register(&name, &email, &password).await {
            Ok(user) => writeln!(out, "Registered {} <{}>", user.name, user.email)?,
            Err(AuthError::AlreadyRegistered(email)) => {
                bail!("{email} is already registered")
            }
            Err(e) => return Err(e.into()),
        },

        Command::Login { email, password } => match desk.auth.login(&email, &password).await {
            Ok(user) => writeln!(out, "Welcome, {}", user.name)?,
            Err(AuthError::InvalidCredentials) => bail!("Invalid email or password"),
            Err(e) => return Err(e.into()),
        },

        Command::Logout => {
            desk.auth.logout()?;
            writeln!(out, "Logged out")?;
        }

        Command::Whoami => match desk.auth.current_user() {
            Some(user) => writeln!(out, "{} <{}> ({})", user.name, user.email, user.role)?,
            None => writeln!(out, "Not logged in")?,
        },

        Command::Users => {
            for user in desk.auth.users()? {
                writeln!(out, "{:<24} {}", user.name, user.email)?;
            }
        }

        Command::Add(args) => add(desk, args, out)?,
        Command::List(args) => list(desk, args, out)?,

        Command::Show { id } => {
            require_user(desk)?;
            let task = find(desk, id)?;
            write_detail(out, &task)?;
        }

        Command::Edit(args) => edit(desk, args, out)?,

        Command::Complete { id } => {
            require_user(desk)?;
            if !desk.tasks.mark_completed(id)? {
                bail!("No task with id {id}");
            }
            writeln!(out, "Completed task {id}")?;
        }

        Command::Tag { id, tag } => {
            require_user(desk)?;
            if !desk.tasks.add_tag(id, &tag)? {
                bail!("No task with id {id}");
            }
            writeln!(out, "Tagged task {id} with {tag}")?;
        }

        Command::Delete { id } => {
            require_user(desk)?;
            if !desk.tasks.delete(id)? {
                bail!("No task with id {id}");
            }
            writeln!(out, "Deleted task {id}")?;
        }

        Command::Stats => {
            require_user(desk)?;
            let stats = desk.tasks.stats();
            writeln!(out, "Total:       {}", stats.total)?;
            writeln!(out, "Pending:     {}", stats.pending)?;
            writeln!(out, "In progress: {}", stats.in_progress)?;
            writeln!(out, "Completed:   {}", stats.completed)?;
            writeln!(
                out,
                "Priority:    {} high, {} medium, {} low",
                stats.high, stats.medium, stats.low
            )?;
            writeln!(out, "Done:        {:.0}%", stats.completion_percent())?;
        }

        Command::Seed { source } => {
            let location = source.unwrap_or_else(|| config.seed.location.clone());
            let source = seed::source_for(&location, config.seed.timeout)?;
            let report = desk
                .tasks
                .seed_merge(source.as_ref())
                .await
                .with_context(|| format!("Seeding from {location} failed"))?;
            writeln!(
                out,
                "Added {} seed tasks ({} already present)",
                report.added, report.skipped
            )?;
        }
    }

    Ok(())
}

fn add(desk: &mut TaskDesk, args: AddArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let user = require_user(desk)?;
    let assignee = args.assign.unwrap_or(user.email);

    let mut data = NewTask::new(args.title, args.description, args.priority, assignee);
    if let Some(status) = args.status {
        data = data.with_status(status);
    }
    if let Some(due) = args.due {
        data = data.with_due_at(due);
    }
    data.tags = args.tags;

    let task = desk.tasks.create(data)?;
    writeln!(out, "Created task {}", task.id)?;
    Ok(())
}

fn list(desk: &TaskDesk, args: ListArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let user = require_user(desk)?;

    let filter = TaskFilter {
        status: args.status,
        priority: args.priority,
        search: args.search,
    };

    let tasks: Vec<Task> = desk
        .tasks
        .filter(&filter)
        .into_iter()
        .filter(|t| !args.mine || t.is_assigned_to(&user.email))
        .collect();

    if tasks.is_empty() {
        writeln!(out, "No tasks")?;
    }
    for task in &tasks {
        write_line(out, task)?;
    }
    Ok(())
}

fn edit(desk: &mut TaskDesk, args: EditArgs, out: &mut impl Write) -> anyhow::Result<()> {
    require_user(desk)?;

    let due_at = match (args.due, args.clear_due) {
        (Some(due), _) => Some(Some(due)),
        (None, true) => Some(None),
        (None, false) => None,
    };

    let update = UpdateTask {
        title: args.title,
        description: args.description,
        priority: args.priority,
        status: args.status,
        assigned_to: args.assign,
        due_at,
        completed_at: None,
        tags: args.tags,
    };

    if update.is_empty() {
        bail!("Nothing to change");
    }
    if !desk.tasks.update(args.id, update)? {
        bail!("No task with id {}", args.id);
    }
    writeln!(out, "Updated task {}", args.id)?;
    Ok(())
}

fn require_user(desk: &TaskDesk) -> anyhow::Result<User> {
    desk.auth
        .current_user()
        .cloned()
        .context("Not logged in; run `taskdesk login` first")
}

fn find(desk: &TaskDesk, id: TaskId) -> anyhow::Result<Task> {
    desk.tasks
        .find_by_id(id)
        .with_context(|| format!("No task with id {id}"))
}

fn write_line(out: &mut impl Write, task: &Task) -> std::io::Result<()> {
    let mark = if task.status.is_completed() { "x" } else { " " };
    writeln!(
        out,
        "[{mark}] {:<14} {:<6} {:<11} {}  ({})",
        task.id,
        task.priority.to_string(),
        task.status.to_string(),
        task.title,
        task.assigned_to
    )
}

fn write_detail(out: &mut impl Write, task: &Task) -> std::io::Result<()> {
    writeln!(out, "#{} {}", task.id, task.title)?;
    if !task.description.is_empty() {
        writeln!(out, "{}", task.description)?;
    }
    writeln!(out, "Priority:  {}", task.priority)?;
    writeln!(out, "Status:    {}", task.status)?;
    writeln!(out, "Assignee:  {}", task.assigned_to)?;
    writeln!(out, "Created:   {}", task.created_at.to_rfc3339())?;
    if let Some(due) = task.due_at {
        writeln!(out, "Due:       {}", due.to_rfc3339())?;
    }
    if let Some(done) = task.completed_at {
        writeln!(out, "Completed: {}", done.to_rfc3339())?;
    }
    if !task.tags.is_empty() {
        writeln!(out, "Tags:      {}", task.tags.join(", "))?;
    }
    Ok(())
}
