//! Configuration sources, lowest precedence first: global file, repository file, environment.

pub mod environment;
pub mod global_file;
pub mod repo_file;
