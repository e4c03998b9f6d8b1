//! Tooling & Integration Layer
//!
//! Command-line entry points over the tree view.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
