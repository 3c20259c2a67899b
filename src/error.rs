use thiserror::Error;

pub type Result<T> = std::result::Result<T, ContribError>;

#[derive(Error, Debug)]
pub enum ContribError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Failed to run git: {0}")]
    GitUnavailable(std::io::Error),
    #[error("git {args} failed: {stderr}")]
    GitCommand { args: String, stderr: String },
    #[error("Not a git repository: {0}")]
    NotARepository(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("No available ports on {host} in {start}..{end}")]
    NoAvailablePort { host: String, start: u16, end: u32 },
    #[error("HTTP server error: {0}")]
    Http(String),
}

impl ContribError {
    pub fn git_command(args: &[&str], stderr: &[u8]) -> Self {
        ContribError::GitCommand {
            args: args.join(" "),
            stderr: String::from_utf8_lossy(stderr).trim().to_string(),
        }
    }
}
