//! Integration tests for the tree view

mod cli_parse;
mod listing;
mod path_resolution;
mod snapshot;
mod subtrees;
mod support;
