//! Treeview: Repository Tree Browser
//!
//! Renders the tree view of a content-addressed repository: a directory
//! listing with compressed breadcrumbs and subtree badges, or a file's
//! content as numbered text or a hex dump.

pub mod config;
pub mod error;
pub mod logging;
pub mod render;
pub mod store;
pub mod subtree;
pub mod tooling;
pub mod tree;
pub mod types;
