//! # tt - interactive task tracker
//!
//! A single-user, local task tracker driven from a prompt. Users register and
//! log in with a username and password, then add, list, edit, complete and
//! delete tasks. Users and tasks live in two flat JSON files that are rewritten
//! after every change.
//!
//! ## Quick Start
//!
//! ```text
//! $ tt
//! > register alice secret
//! > login alice secret
//! > add "Report" "Write report" 2024-01-01 work 2
//! > list pending sort:priority
//! > complete 1
//! > exit
//! ```
//!
//! Tokens follow shell quoting rules, so titles and descriptions may contain
//! spaces when quoted. Tasks are numbered by their position in the task file;
//! `list` always shows those numbers, even when filtered or sorted.

use std::io::{self, IsTerminal};

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod db;
pub mod error;
pub mod fields;
pub mod format;
pub mod session;
pub mod task;
pub mod users;

use cli::Cli;
use db::TaskStore;
use session::Session;
use users::UserStore;

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let tasks = match TaskStore::load(&cli.tasks) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to load tasks from {}: {e}", cli.tasks.display());
            std::process::exit(1);
        }
    };
    let users = match UserStore::load(&cli.users) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to load users from {}: {e}", cli.users.display());
            std::process::exit(1);
        }
    };

    let stdout = io::stdout();
    let mut session = Session::new(tasks, users).with_color(stdout.is_terminal());
    if let Err(e) = session.run(io::stdin().lock(), &mut stdout.lock()) {
        eprintln!("I/O error: {e}");
        std::process::exit(1);
    }
}
