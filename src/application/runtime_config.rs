use std::path::PathBuf;

use derive_more::Display;
use dirtree::namespace::SearchDepth;

use crate::cli::Cli;

/// Which kind of entry the pattern is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SearchTarget {
    #[display("directories")]
    Directories,
    #[display("files")]
    Files,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub pattern: String,
    pub layout: Option<PathBuf>,
    pub depth: SearchDepth,
    pub target: SearchTarget,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            pattern: cli.pattern,
            layout: cli.layout,
            depth: SearchDepth::from(cli.depth),
            target: if cli.files {
                SearchTarget::Files
            } else {
                SearchTarget::Directories
            },
        }
    }
}
