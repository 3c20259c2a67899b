use crate::error::{ContribError, Result};
use crate::model::LogFilter;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Separates commits in `git log` output.
pub const RECORD_SEP: char = '\x1e';
/// Separates header fields of a single commit.
pub const FIELD_SEP: char = '\x1f';

const COMMIT_FORMAT: &str = "--pretty=format:%x1e%H%x1f%an%x1f%ad%x1f%s";

pub struct GitRepo {
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let path = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };

        let repo = Self { path };
        let output = repo.run(&["rev-parse", "--show-toplevel"])?;
        if !output.status.success() {
            return Err(ContribError::NotARepository(
                repo.path.to_string_lossy().to_string(),
            ));
        }
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_commits(&self) -> Result<bool> {
        let output = self.run(&["rev-parse", "--verify", "-q", "HEAD"])?;
        Ok(output.status.success())
    }

    /// Every distinct author name in history, sorted.
    ///
    /// Fails on an unborn branch; check [`GitRepo::has_commits`] first.
    pub fn list_authors(&self, filter: &LogFilter) -> Result<Vec<String>> {
        let mut args = vec![
            "log".to_string(),
            "--no-mailmap".to_string(),
            "--format=%an".to_string(),
        ];
        args.extend(filter.git_args());
        let stdout = self.run_checked(&args)?;

        let authors: BTreeSet<String> = stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        Ok(authors.into_iter().collect())
    }

    /// Raw `git log --numstat` output for commits whose author matches `author`.
    ///
    /// `--author` is a substring match on `Name <email>`; callers must still
    /// compare the `%an` field of each record. Mailmap is disabled so the
    /// match runs against the same raw names `list_authors` reports.
    /// `-M` keeps rename detection on regardless of `diff.renames`.
    pub fn author_log(&self, author: &str, filter: &LogFilter) -> Result<String> {
        let mut args = vec![
            "log".to_string(),
            "--no-mailmap".to_string(),
            format!("--author={author}"),
            "--fixed-strings".to_string(),
            COMMIT_FORMAT.to_string(),
            "--date=short".to_string(),
            "--numstat".to_string(),
            "-M".to_string(),
        ];
        args.extend(filter.git_args());
        self.run_checked(&args)
    }

    fn run_checked<S: AsRef<str>>(&self, args: &[S]) -> Result<String> {
        let args: Vec<&str> = args.iter().map(|a| a.as_ref()).collect();
        let output = self.run(&args)?;
        if !output.status.success() {
            return Err(ContribError::git_command(&args, &output.stderr));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        Command::new("git")
            .arg("-C")
            .arg(&self.path)
            .arg("--no-pager")
            .args(["-c", "core.quotepath=off"])
            .args(args)
            .output()
            .map_err(ContribError::GitUnavailable)
    }
}
