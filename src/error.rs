//! Error type shared by the stores and the command layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Task {0} not found.")]
    TaskNotFound(usize),

    #[error("You must be logged in to do that.")]
    NotLoggedIn,

    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("Invalid priority '{0}': expected a whole number.")]
    InvalidPriority(String),

    #[error("Invalid list argument '{0}'. Use: list [completed|pending|<category>] [sort:priority|sort:deadline]")]
    InvalidListArgument(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
