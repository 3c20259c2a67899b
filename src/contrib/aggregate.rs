use crate::model::{AuthorReport, CommitRecord, LineTotals, NO_EXTENSION};
use std::collections::BTreeMap;
use std::path::Path;

/// Extension of the file name, ignoring dots in directory names.
pub fn file_extension(path: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_EXTENSION)
        .to_string()
}

pub fn aggregate_contributions(commits: &[CommitRecord]) -> BTreeMap<String, LineTotals> {
    let mut totals: BTreeMap<String, LineTotals> = BTreeMap::new();
    for commit in commits {
        for file in &commit.files {
            totals.entry(file_extension(&file.file)).or_default().add(file);
        }
    }
    totals
}

pub fn build_report(author: &str, commits: Vec<CommitRecord>) -> AuthorReport {
    AuthorReport {
        author: author.to_string(),
        contributions: aggregate_contributions(&commits),
        commits,
    }
}
