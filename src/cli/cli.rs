use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Build a directory tree and list the entries whose names match a pattern.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Regular expression matched against entry names
    pub pattern: String,
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// YAML layout describing the tree; the built-in sample tree is used when omitted
    #[clap(long)]
    pub layout: Option<PathBuf>,

    /// Levels below the root to search; negative means no limit
    #[clap(long, short, default_value_t = -1, allow_negative_numbers = true)]
    pub depth: i32,

    /// Match file names instead of directory names
    #[clap(long, short)]
    pub files: bool,
}
