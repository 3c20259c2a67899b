pub mod assets;
pub mod exec;
pub mod handler;
pub mod port;

pub use exec::{exec, reply_for, Reply, StaticServer};
pub use handler::{content_type, render_listing, resolve, Resolved};
pub use port::{find_available_port, DEFAULT_HOST, DEFAULT_MAX_TRIES, DEFAULT_START_PORT};
