//! Output writers for tables and hierarchies.
//!
//! This module handles:
//! - JSON table exports (write and read back)
//! - Text rendering for the terminal

pub mod json;
pub mod text;

// Re-export main functions
pub use json::{read_table, validate_path, write_table, TableExport};
pub use text::{render_hierarchy, render_table};
