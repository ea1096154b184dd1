//! Error types for the entire library.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! Hierarchy lookups that miss are not errors: they return `None`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a view
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("View resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Processing did not finish, marker missing: {}", .0.display())]
    SourceIncomplete(PathBuf),

    #[error("Unsupported view source: {}", .0.display())]
    UnsupportedSource(PathBuf),

    #[error("Malformed view table: {0}")]
    MalformedTable(String),

    #[error("CSV read failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook read failed: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while parsing a core list
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreSetError {
    #[error("string: '{0}' is not a regular core list")]
    InvalidCoreSet(String),
}

/// Errors that can occur while reading or expanding metric formulas
#[derive(Error, Debug)]
pub enum FormulaError {
    #[error("Formula '{formula}' references undeclared alias '{alias}'")]
    MissingAlias { formula: String, alias: String },

    #[error("Formula '{formula}' declares alias '{alias}' more than once")]
    DuplicateAlias { formula: String, alias: String },

    #[error("Malformed formula catalog: {0}")]
    MalformedCatalog(String),

    #[error("XML parse failed: {0}")]
    Xml(#[from] xml::reader::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while selecting from a metric hierarchy
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("Rename target '{0}' collides with an existing metric")]
    LabelCollision(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
