pub mod cli;
pub mod contrib;
pub mod error;
pub mod git;
pub mod model;
pub mod serve;
pub mod util;
