pub mod aggregate;
pub mod exec;
pub mod numstat;
pub mod output;

pub use aggregate::{aggregate_contributions, build_report, file_extension};
pub use exec::{collect_reports, exec, DEFAULT_OUTPUT};
pub use numstat::{parse_author_log, parse_numstat_line, resolve_rename};
pub use output::{output_summary, render_json, render_ndjson, write_output};
