//! Session context and the read-eval-print loop.
//!
//! A [`Session`] owns both stores and the logged-in user. The loop reads one
//! line at a time, dispatches it through [`crate::cmd`], and reminds the user
//! to log in after every command while nobody is.

use std::io::{self, BufRead, Write};

use clap::error::ErrorKind;
use clap::Parser;
use log::{debug, error};

use crate::cmd::{dispatch, ReplLine};
use crate::db::TaskStore;
use crate::error::{Result, TrackerError};
use crate::users::UserStore;

const BANNER: &str = "Task tracker. Type 'help' for the list of commands.";
const LOGIN_REMINDER: &str =
    "You are not logged in. Use 'register <username> <password>' or 'login <username> <password>'.";
const PROMPT: &str = "> ";

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug)]
pub struct Session {
    pub tasks: TaskStore,
    pub users: UserStore,
    current_user: Option<String>,
    color: bool,
}

impl Session {
    pub fn new(tasks: TaskStore, users: UserStore) -> Self {
        Session { tasks, users, current_user: None, color: false }
    }

    /// Enable ANSI colours in listings.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn color(&self) -> bool {
        self.color
    }

    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user.is_some()
    }

    pub(crate) fn set_user(&mut self, username: &str) {
        self.current_user = Some(username.to_string());
    }

    /// The logged-in username, or `NotLoggedIn`.
    pub fn require_login(&self) -> Result<&str> {
        self.current_user().ok_or(TrackerError::NotLoggedIn)
    }

    /// Parse and run one input line, writing all user-facing text to `out`.
    ///
    /// Command failures are reported on `out` and never end the session;
    /// only a failing `out` itself is returned as an error.
    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
        let tokens = match shell_words::split(line) {
            Ok(tokens) => tokens,
            Err(e) => {
                writeln!(out, "Could not read command: {e}.")?;
                return Ok(Flow::Continue);
            }
        };
        if tokens.is_empty() {
            return Ok(Flow::Continue);
        }

        let command = match ReplLine::try_parse_from(&tokens) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                if !matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                    debug!("rejected '{}' command: {:?}", tokens[0], e.kind());
                }
                write!(out, "{}", e.render())?;
                return Ok(Flow::Continue);
            }
        };

        match dispatch(self, command, out) {
            Ok(flow) => Ok(flow),
            Err(e) => {
                match &e {
                    TrackerError::Io(_) | TrackerError::Json(_) => error!("{e}"),
                    other => debug!("command failed: {other}"),
                }
                writeln!(out, "{e}")?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Run the prompt until `exit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, out: &mut W) -> io::Result<()> {
        writeln!(out, "{BANNER}")?;
        writeln!(out, "{LOGIN_REMINDER}")?;
        let mut line = String::new();
        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                break;
            }
            if line.trim().is_empty() {
                continue;
            }
            if self.execute(&line, out)? == Flow::Exit {
                break;
            }
            if !self.is_logged_in() {
                writeln!(out, "{LOGIN_REMINDER}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    fn session(dir: &Path) -> Session {
        Session::new(
            TaskStore::load(&dir.join("tasks.json")).unwrap(),
            UserStore::load(&dir.join("users.json")).unwrap(),
        )
    }

    fn exec(s: &mut Session, line: &str) -> String {
        let mut out = Vec::new();
        s.execute(line, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn transcript(s: &mut Session, input: &str) -> String {
        let mut out = Vec::new();
        s.run(input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_example_scenario() {
        let dir = tempdir().unwrap();
        let mut s = session(dir.path());
        assert!(exec(&mut s, "register alice secret").contains("registered"));
        assert!(exec(&mut s, "login alice secret").contains("Login successful"));
        assert!(exec(&mut s, r#"add "Report" "Write report" "2024-01-01" work 2"#).contains("#1"));

        let listed = exec(&mut s, "list");
        assert!(listed.starts_with("1. Report - Write report"));
        assert!(listed.contains("Status: Pending"));

        exec(&mut s, "complete 1");
        let done = exec(&mut s, "list completed");
        assert!(done.starts_with("1. Report"));
        assert!(done.contains("Status: Completed"));

        assert!(exec(&mut s, "delete 1").contains("deleted"));
        assert_eq!(exec(&mut s, "list"), "No tasks found.\n");
    }

    #[test]
    fn test_mutations_require_login() {
        let dir = tempdir().unwrap();
        let mut s = session(dir.path());
        for line in ["add a b c d 1", "edit 1 x", "complete 1", "delete 1"] {
            assert_eq!(exec(&mut s, line), "You must be logged in to do that.\n", "{line}");
        }
        assert!(s.tasks.is_empty());
    }

    #[test]
    fn test_bad_login_stays_logged_out() {
        let dir = tempdir().unwrap();
        let mut s = session(dir.path());
        exec(&mut s, "register alice secret");
        assert_eq!(exec(&mut s, "login alice wrong"), "Invalid username or password.\n");
        assert!(!s.is_logged_in());
        exec(&mut s, "login alice secret");
        assert_eq!(s.current_user(), Some("alice"));
    }

    #[test]
    fn test_missing_index_is_reported() {
        let dir = tempdir().unwrap();
        let mut s = session(dir.path());
        exec(&mut s, "register a b");
        exec(&mut s, "login a b");
        assert_eq!(exec(&mut s, "complete 4"), "Task 4 not found.\n");
        assert_eq!(exec(&mut s, "delete 0"), "Task 0 not found.\n");
        assert!(!dir.path().join("tasks.json").exists());
    }

    #[test]
    fn test_edit_priority_only_via_prompt() {
        let dir = tempdir().unwrap();
        let mut s = session(dir.path());
        exec(&mut s, "register a b");
        exec(&mut s, "login a b");
        exec(&mut s, "add Report desc 2024-01-01 work 5");
        assert_eq!(exec(&mut s, r#"edit 1 "" "" "" "" 0"#), "Task 1 updated.\n");
        let t = s.tasks.get(1).unwrap();
        assert_eq!((t.title.as_str(), t.category.as_str(), t.priority), ("Report", "work", 0));
        assert!(exec(&mut s, "edit 1 x y z w high").contains("Invalid priority 'high'"));
    }

    #[test]
    fn test_unknown_and_malformed_commands_continue() {
        let dir = tempdir().unwrap();
        let mut s = session(dir.path());
        assert!(exec(&mut s, "frobnicate").contains("error"));
        assert!(exec(&mut s, "add onlytitle").contains("Usage"));
        assert!(exec(&mut s, "complete one").contains("error"));
        assert!(exec(&mut s, "list \"unterminated").contains("Could not read command"));
        assert_eq!(exec(&mut s, "   "), "");
    }

    #[test]
    fn test_run_prints_reminder_until_login() {
        let dir = tempdir().unwrap();
        let mut s = session(dir.path());
        let out = transcript(&mut s, "register a b\nlogin a b\nlist\nexit\nlist\n");
        // Start-up plus the one command issued before logging in.
        assert_eq!(out.matches(LOGIN_REMINDER).count(), 2);
        assert!(out.contains("Goodbye!"));
        // Nothing after `exit` is executed.
        assert_eq!(out.matches("No tasks found.").count(), 1);
    }

    #[test]
    fn test_hyphen_led_title_and_category() {
        let dir = tempdir().unwrap();
        let mut s = session(dir.path());
        exec(&mut s, "register a b");
        exec(&mut s, "login a b");
        assert_eq!(exec(&mut s, "add -draft desc 2024 -home 1"), "Task '-draft' added as #1.\n");
        exec(&mut s, "add other desc 2024 work 1");

        let listed = exec(&mut s, "list -home");
        assert!(listed.starts_with("1. -draft - desc"));
        assert_eq!(listed.lines().count(), 1);
    }

    #[test]
    fn test_failed_save_is_not_listed() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        std::fs::create_dir(&data).unwrap();
        let mut s = session(&data);
        exec(&mut s, "register a b");
        exec(&mut s, "login a b");
        std::fs::remove_dir_all(&data).unwrap();

        assert!(exec(&mut s, "add T d 2024 w 1").starts_with("io error"));
        assert_eq!(exec(&mut s, "list"), "No tasks found.\n");
    }

    #[test]
    fn test_help_lists_commands() {
        let dir = tempdir().unwrap();
        let mut s = session(dir.path());
        let help = exec(&mut s, "help");
        for name in ["register", "login", "add", "list", "edit", "complete", "delete", "exit"] {
            assert!(help.contains(name), "{name} missing from help");
        }
    }

    #[test]
    fn test_second_login_switches_user() {
        let dir = tempdir().unwrap();
        let mut s = session(dir.path());
        exec(&mut s, "register a pa");
        exec(&mut s, "register b pb");
        exec(&mut s, "login a pa");
        assert_eq!(s.current_user(), Some("a"));
        exec(&mut s, "login b pb");
        assert_eq!(s.current_user(), Some("b"));
    }

    #[test]
    fn test_run_stops_at_end_of_input() {
        let dir = tempdir().unwrap();
        let mut s = session(dir.path());
        let out = transcript(&mut s, "list\n");
        assert!(out.starts_with(BANNER));
        assert!(out.contains("No tasks found."));
        assert!(!out.contains("Goodbye!"));
    }
}
