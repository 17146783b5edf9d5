use colored::Colorize;
use supports_color::Stream;

use crate::application::SearchTarget;

/// Renders search results on stdout.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    color: bool,
}

impl Output {
    pub fn detect() -> Self {
        let color = supports_color::on(Stream::Stdout).is_some();
        colored::control::set_override(color);
        Self { color }
    }

    pub fn print_matches(&self, target: SearchTarget, paths: &[String]) {
        for line in self.render(target, paths) {
            println!("{line}");
        }
    }

    fn render(&self, target: SearchTarget, paths: &[String]) -> Vec<String> {
        let mut lines = Vec::with_capacity(paths.len() + 1);
        lines.push(format!("Matched {} {target}.", paths.len()));
        lines.extend(paths.iter().map(|path| self.highlight(path)));
        lines
    }

    /// Emphasises the last segment, which is the name that matched.
    fn highlight(&self, path: &str) -> String {
        if !self.color {
            return path.to_owned();
        }
        match path.rsplit_once('/') {
            Some((parent, name)) => format!("{}/{}", parent.dimmed(), name.bold().green()),
            None => path.bold().green().to_string(),
        }
    }
}
