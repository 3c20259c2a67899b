use crate::git::{FIELD_SEP, RECORD_SEP};
use crate::model::{CommitRecord, FileContribution};
use regex::Regex;
use std::sync::OnceLock;

fn numstat_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)\t(\d+)\t(.+)$").expect("numstat pattern is valid"))
}

/// Parse `git log --numstat` output produced by [`crate::git::GitRepo::author_log`].
///
/// Records whose author name is not exactly `author` are dropped.
pub fn parse_author_log(output: &str, author: &str) -> Vec<CommitRecord> {
    output
        .split(RECORD_SEP)
        .skip(1)
        .filter_map(|block| parse_block(block, author))
        .collect()
}

fn parse_block(block: &str, author: &str) -> Option<CommitRecord> {
    let mut lines = block.lines();
    let header = lines.next()?;

    let mut fields = header.splitn(4, FIELD_SEP);
    let hash = fields.next()?.trim();
    let name = fields.next()?;
    let date = fields.next().unwrap_or("").trim();
    let message = fields.next().unwrap_or("").trim();

    if hash.is_empty() || name != author {
        return None;
    }

    let files = lines.filter_map(parse_numstat_line).collect();

    Some(CommitRecord {
        hash: hash.to_string(),
        date: date.to_string(),
        message: message.to_string(),
        files,
    })
}

/// `added<TAB>removed<TAB>path`; binary entries (`-`) yield `None`.
pub fn parse_numstat_line(line: &str) -> Option<FileContribution> {
    let caps = numstat_re().captures(line.trim_end_matches('\r'))?;
    let added = caps[1].parse().ok()?;
    let removed = caps[2].parse().ok()?;
    Some(FileContribution {
        file: resolve_rename(&caps[3]),
        added,
        removed,
    })
}

/// Collapse numstat rename notation to the destination path.
pub fn resolve_rename(path: &str) -> String {
    if let (Some(open), Some(close)) = (path.find('{'), path.rfind('}')) {
        if open < close {
            if let Some((_, new)) = path[open + 1..close].split_once(" => ") {
                let joined = format!("{}{}{}", &path[..open], new, &path[close + 1..]);
                return joined.replace("//", "/").trim_start_matches('/').to_string();
            }
        }
    }
    match path.split_once(" => ") {
        Some((_, new)) => new.to_string(),
        None => path.to_string(),
    }
}
