use crate::serve::{DEFAULT_HOST, DEFAULT_MAX_TRIES, DEFAULT_START_PORT};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gitcontrib")]
#[command(about = "Per-author git contribution extractor and a tiny static file server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write per-author line statistics to contributions.json
    Extract(ExtractArgs),
    /// Serve the current directory over HTTP on the first free port
    Serve(ServeArgs),
}

#[derive(Args, Clone, Debug)]
pub struct ExtractArgs {
    #[arg(help = "Path to git repository (default: current directory)")]
    pub repo_path: Option<PathBuf>,

    #[arg(short, long, help = "Output file (default: ./contributions.json)")]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Only report these authors (repeatable, exact name)")]
    pub author: Vec<String>,

    #[arg(long, help = "Only commits after this date (YYYY-MM-DD, RFC3339, '3 weeks ago' or '90days')")]
    pub since: Option<String>,

    #[arg(long, help = "Only commits before this date (YYYY-MM-DD, RFC3339, '3 weeks ago' or '90days')")]
    pub until: Option<String>,

    #[arg(long, help = "Print the report to stdout instead of writing a file")]
    pub stdout: bool,

    #[arg(long, help = "Emit one author object per line")]
    pub ndjson: bool,

    #[arg(short, long, help = "No progress bar or summary")]
    pub quiet: bool,
}

#[derive(Args, Clone, Debug)]
pub struct ServeArgs {
    #[arg(long, help = "Directory to serve (default: current directory)")]
    pub dir: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_HOST, help = "Host to bind")]
    pub host: String,

    #[arg(long, default_value_t = DEFAULT_START_PORT, help = "First port to try")]
    pub port: u16,

    #[arg(long, default_value_t = DEFAULT_MAX_TRIES, help = "How many sequential ports to try")]
    pub max_tries: u16,

    #[arg(long, help = "List the directory at / instead of the bundled contributions viewer")]
    pub no_viewer: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Extract(args) => crate::contrib::exec(args),
            Commands::Serve(args) => crate::serve::exec(args),
        }
    }
}
