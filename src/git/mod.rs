pub mod repo;

pub use repo::{GitRepo, FIELD_SEP, RECORD_SEP};
