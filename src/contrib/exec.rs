use super::aggregate::build_report;
use super::numstat::parse_author_log;
use super::output::{output_summary, render_json, render_ndjson, write_output};
use crate::cli::ExtractArgs;
use crate::error::Result;
use crate::git::GitRepo;
use crate::model::{AuthorReport, LogFilter};
use crate::util::resolve_filter;
use anyhow::Context;
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;

pub const DEFAULT_OUTPUT: &str = "contributions.json";

pub fn exec(args: ExtractArgs) -> anyhow::Result<()> {
    let started = Instant::now();
    let repo = GitRepo::open(args.repo_path.as_ref()).context("Failed to open git repository")?;

    let filter = resolve_filter(args.since.as_deref(), args.until.as_deref(), Utc::now())
        .context("Failed to resolve date range")?;

    let has_history = repo.has_commits().context("Failed to inspect HEAD")?;

    let authors = if !args.author.is_empty() {
        let mut names = args.author.clone();
        names.sort();
        names.dedup();
        names
    } else if has_history {
        repo.list_authors(&filter).with_context(|| {
            format!("Failed to list commit authors in {}", repo.path().display())
        })?
    } else {
        Vec::new()
    };

    let show_progress = !args.quiet && !args.stdout;
    let reports = collect_reports(&repo, &authors, &filter, has_history, show_progress)?;

    let rendered = if args.ndjson {
        render_ndjson(&reports)?
    } else {
        render_json(&reports)?
    };

    if args.stdout {
        print!("{rendered}");
        return Ok(());
    }

    let output_path = match args.output {
        Some(path) => path,
        None => std::env::current_dir()?.join(DEFAULT_OUTPUT),
    };
    write_output(&output_path, &rendered)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    if !args.quiet {
        output_summary(&reports, Some(&output_path));
        eprintln!(
            "Done in {}",
            humantime::format_duration(std::time::Duration::from_millis(
                started.elapsed().as_millis() as u64
            ))
        );
    }

    Ok(())
}

/// One `git log` per author, in order. Without history every report is empty.
pub fn collect_reports(
    repo: &GitRepo,
    authors: &[String],
    filter: &LogFilter,
    has_history: bool,
    show_progress: bool,
) -> anyhow::Result<Vec<AuthorReport>> {
    let pb = if show_progress {
        let pb = ProgressBar::new(authors.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut reports = Vec::with_capacity(authors.len());
    for author in authors {
        pb.set_message(author.clone());
        let report = if has_history {
            author_report(repo, author, filter)?
        } else {
            build_report(author, Vec::new())
        };
        reports.push(report);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(reports)
}

fn author_report(repo: &GitRepo, author: &str, filter: &LogFilter) -> Result<AuthorReport> {
    let log = repo.author_log(author, filter)?;
    let commits = parse_author_log(&log, author);
    Ok(build_report(author, commits))
}
