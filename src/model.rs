use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key used for files whose name carries no extension.
pub const NO_EXTENSION: &str = "(none)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContribution {
    pub file: String,
    pub added: u64,
    pub removed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    pub date: String,
    pub message: String,
    pub files: Vec<FileContribution>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineTotals {
    pub added: u64,
    pub removed: u64,
}

impl LineTotals {
    pub fn add(&mut self, file: &FileContribution) {
        self.added += file.added;
        self.removed += file.removed;
    }

    pub fn total(&self) -> u64 {
        self.added + self.removed
    }
}

/// One element of `contributions.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorReport {
    pub author: String,
    pub contributions: BTreeMap<String, LineTotals>,
    pub commits: Vec<CommitRecord>,
}

impl AuthorReport {
    pub fn totals(&self) -> LineTotals {
        self.contributions
            .values()
            .fold(LineTotals::default(), |acc, t| LineTotals {
                added: acc.added + t.added,
                removed: acc.removed + t.removed,
            })
    }

    /// Extension with the most lines changed, ties broken by name.
    pub fn top_extension(&self) -> Option<&str> {
        self.contributions
            .iter()
            .max_by(|a, b| a.1.total().cmp(&b.1.total()).then_with(|| b.0.cmp(a.0)))
            .map(|(ext, _)| ext.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub since: Option<String>,
    pub until: Option<String>,
}

impl LogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_since(mut self, since: String) -> Self {
        self.since = Some(since);
        self
    }

    pub fn with_until(mut self, until: String) -> Self {
        self.until = Some(until);
        self
    }

    pub fn git_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(since) = &self.since {
            args.push(format!("--since={since}"));
        }
        if let Some(until) = &self.until {
            args.push(format!("--until={until}"));
        }
        args
    }
}
