//! Command grammar and handlers for the interactive prompt.
//!
//! Each input line is parsed as one of [`Commands`] and dispatched to a
//! `cmd_*` handler that writes its human-readable result to the session
//! output.

use std::io::Write;

use chrono::Local;
use clap::{Parser, Subcommand};
use log::info;

use crate::error::{Result, TrackerError};
use crate::fields::ListQuery;
use crate::format::format_row;
use crate::session::{Flow, Session};
use crate::task::{Task, TaskEdit};

// One line typed at the prompt; the first token names the command.
#[derive(Parser, Debug)]
#[command(
    multicall = true,
    about = "Task tracker commands. Tasks are numbered as shown by 'list'; quote arguments that contain spaces."
)]
pub struct ReplLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Create an account (replaces the password of an existing one).
    Register {
        #[arg(allow_hyphen_values = true)]
        username: String,
        #[arg(allow_hyphen_values = true)]
        password: String,
    },

    /// Log in to an existing account.
    Login {
        #[arg(allow_hyphen_values = true)]
        username: String,
        #[arg(allow_hyphen_values = true)]
        password: String,
    },

    /// Add a new task.
    Add {
        #[arg(allow_hyphen_values = true)]
        title: String,
        #[arg(allow_hyphen_values = true)]
        description: String,
        /// Free-form deadline text, e.g. 2024-01-01.
        #[arg(allow_hyphen_values = true)]
        deadline: String,
        #[arg(allow_hyphen_values = true)]
        category: String,
        /// Lower numbers sort first.
        #[arg(allow_negative_numbers = true)]
        priority: i64,
    },

    /// List tasks: list [completed|pending|<category>] [sort:priority|sort:deadline]
    List {
        #[arg(value_name = "FILTER|SORT", trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Change fields of task <n>; omitted or "" fields are kept.
    Edit {
        index: usize,
        #[arg(allow_hyphen_values = true)]
        title: Option<String>,
        #[arg(allow_hyphen_values = true)]
        description: Option<String>,
        #[arg(allow_hyphen_values = true)]
        deadline: Option<String>,
        #[arg(allow_hyphen_values = true)]
        category: Option<String>,
        #[arg(allow_hyphen_values = true)]
        priority: Option<String>,
    },

    /// Mark task <n> completed.
    Complete { index: usize },

    /// Delete task <n>; later tasks move up by one.
    Delete { index: usize },

    /// Leave the program.
    Exit,
}

/// Run one parsed command against the session.
pub fn dispatch<W: Write>(session: &mut Session, command: Commands, out: &mut W) -> Result<Flow> {
    match command {
        Commands::Register { username, password } => cmd_register(session, &username, &password, out)?,
        Commands::Login { username, password } => cmd_login(session, &username, &password, out)?,
        Commands::Add { title, description, deadline, category, priority } => {
            cmd_add(session, Task::new(title, description, deadline, category, priority), out)?
        }
        Commands::List { args } => cmd_list(session, &args, out)?,
        Commands::Edit { index, title, description, deadline, category, priority } => {
            let priority = parse_priority(priority)?;
            let edit = TaskEdit { title, description, deadline, category, priority };
            cmd_edit(session, index, edit, out)?
        }
        Commands::Complete { index } => cmd_complete(session, index, out)?,
        Commands::Delete { index } => cmd_delete(session, index, out)?,
        Commands::Exit => {
            writeln!(out, "Goodbye!")?;
            return Ok(Flow::Exit);
        }
    }
    Ok(Flow::Continue)
}

/// An empty priority token means "keep the current one".
fn parse_priority(raw: Option<String>) -> Result<Option<i64>> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<i64>()
            .map(Some)
            .map_err(|_| TrackerError::InvalidPriority(s.to_string())),
    }
}

pub fn cmd_register<W: Write>(session: &mut Session, username: &str, password: &str, out: &mut W) -> Result<()> {
    session.users.register(username, password)?;
    writeln!(out, "User '{username}' registered successfully.")?;
    Ok(())
}

pub fn cmd_login<W: Write>(session: &mut Session, username: &str, password: &str, out: &mut W) -> Result<()> {
    if !session.users.authenticate(username, password) {
        info!("failed login for '{username}'");
        return Err(TrackerError::InvalidCredentials);
    }
    session.set_user(username);
    info!("'{username}' logged in");
    writeln!(out, "Login successful. Welcome, {username}!")?;
    Ok(())
}

pub fn cmd_add<W: Write>(session: &mut Session, task: Task, out: &mut W) -> Result<()> {
    session.require_login()?;
    let title = task.title.clone();
    let position = session.tasks.add(task)?;
    writeln!(out, "Task '{title}' added as #{position}.")?;
    Ok(())
}

pub fn cmd_list<W: Write>(session: &Session, args: &[String], out: &mut W) -> Result<()> {
    let query = ListQuery::from_tokens(args)?;
    let view = session.tasks.list(&query);
    if view.is_empty() {
        writeln!(out, "No tasks found.")?;
        return Ok(());
    }
    let today = Local::now().date_naive();
    for listed in &view {
        writeln!(out, "{}", format_row(listed, today, session.color()))?;
    }
    Ok(())
}

pub fn cmd_edit<W: Write>(session: &mut Session, index: usize, edit: TaskEdit, out: &mut W) -> Result<()> {
    session.require_login()?;
    session.tasks.edit(index, edit)?;
    writeln!(out, "Task {index} updated.")?;
    Ok(())
}

pub fn cmd_complete<W: Write>(session: &mut Session, index: usize, out: &mut W) -> Result<()> {
    session.require_login()?;
    session.tasks.mark_completed(index)?;
    writeln!(out, "Task {index} marked as completed.")?;
    Ok(())
}

pub fn cmd_delete<W: Write>(session: &mut Session, index: usize, out: &mut W) -> Result<()> {
    session.require_login()?;
    let removed = session.tasks.delete(index)?;
    writeln!(out, "Task {index} deleted: {}.", removed.title)?;
    Ok(())
}
