use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// Interactive, file-backed task tracker.
/// Storage defaults to ./tasks.json and ./users.json.
#[derive(Parser, Debug)]
#[command(name = "tt", version, about = "Interactive task tracker with a simple login")]
pub struct Cli {
    /// Path to the JSON task file.
    #[arg(long, default_value = "tasks.json")]
    pub tasks: PathBuf,

    /// Path to the JSON user file.
    #[arg(long, default_value = "users.json")]
    pub users: PathBuf,

    /// More log output on stderr (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }
}
