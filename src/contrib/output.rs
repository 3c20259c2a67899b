use crate::error::Result;
use crate::model::AuthorReport;
use console::style;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::Path;

/// Pretty JSON array with four-space indentation and a trailing newline.
pub fn render_json(reports: &[AuthorReport]) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    reports.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn render_ndjson(reports: &[AuthorReport]) -> Result<String> {
    let mut out = String::new();
    for report in reports {
        out.push_str(&serde_json::to_string(report)?);
        out.push('\n');
    }
    Ok(out)
}

pub fn write_output(path: &Path, rendered: &str) -> Result<()> {
    std::fs::write(path, rendered)?;
    Ok(())
}

pub fn output_summary(reports: &[AuthorReport], written_to: Option<&Path>) {
    let mut rows: Vec<&AuthorReport> = reports.iter().collect();
    rows.sort_by(|a, b| {
        b.totals()
            .added
            .cmp(&a.totals().added)
            .then_with(|| a.author.cmp(&b.author))
    });

    println!(
        "{:<32} {:>8} {:>10} {:>10} {:>10}",
        style("Author").bold(),
        style("Commits").bold(),
        style("Added").bold(),
        style("Removed").bold(),
        style("Top ext").bold()
    );
    println!("{}", "─".repeat(74));
    for r in rows.iter().take(50) {
        let totals = r.totals();
        println!(
            "{:<32} {:>8} {:>10} {:>10} {:>10}",
            truncate(&r.author, 32),
            r.commits.len(),
            style(totals.added).green(),
            style(totals.removed).red(),
            r.top_extension().unwrap_or("-")
        );
    }
    if rows.len() > 50 {
        println!("\n... and {} more authors", rows.len() - 50);
    }

    if let Some(path) = written_to {
        println!(
            "\n{} {} authors to {}",
            style("Wrote").bold(),
            style(reports.len()).cyan(),
            style(path.display()).dim()
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max.saturating_sub(1)).collect();
        t.push('…');
        t
    }
}
