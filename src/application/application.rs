use dirtree::namespace::{Directory, Namespace, TreeError, TreeResult, path};
use regex::Regex;
use snafu::Snafu;
use snafu::prelude::*;
use tracing::debug;
use tracing::info;

use crate::application::{Output, RuntimeConfig, SearchTarget};
use crate::layout::{Layout, LayoutError};

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let pattern = Regex::new(&app_config.pattern).context(PatternSnafu {
            pattern: app_config.pattern.clone(),
        })?;

        let layout = match &app_config.layout {
            Some(path) => Layout::read(path).await,
            None => Layout::sample(),
        }
        .context(LayoutLoadSnafu)?;
        debug!("Loaded layout: {:?}", layout);

        let namespace = Namespace::new();
        let root = layout.build(&namespace).context(BuildSnafu)?;
        info!("Built {:?}", namespace);

        let paths = Self::search(&root, &pattern, &app_config).context(SearchSnafu)?;
        Output::detect().print_matches(app_config.target, &paths);

        Ok(())
    }

    fn search(
        root: &Directory,
        pattern: &Regex,
        app_config: &RuntimeConfig,
    ) -> TreeResult<Vec<String>> {
        match app_config.target {
            SearchTarget::Directories => {
                allow_no_match(root.find_directories(pattern, app_config.depth))?
                    .iter()
                    .map(path)
                    .collect()
            }
            SearchTarget::Files => allow_no_match(root.find_files(pattern, app_config.depth))?
                .iter()
                .map(path)
                .collect(),
        }
    }
}

/// An empty result is a valid answer for the command line.
fn allow_no_match<T>(result: TreeResult<Vec<T>>) -> TreeResult<Vec<T>> {
    match result {
        Err(TreeError::NoMatch) => Ok(Vec::new()),
        other => other,
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Invalid search pattern '{}'", pattern))]
    PatternError {
        pattern: String,
        source: regex::Error,
    },
    #[snafu(display("Critical failure encountered while loading the layout"))]
    LayoutLoadError { source: LayoutError },
    #[snafu(display("Critical failure encountered while building the tree"))]
    BuildError { source: TreeError },
    #[snafu(display("Critical failure encountered during the search"))]
    SearchError { source: TreeError },
}
