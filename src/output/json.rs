//! JSON table export.
//!
//! Writes tables wrapped in a small versioned envelope so exports can be
//! told apart and re-read later.

use crate::reader::MetricTable;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Top-level structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableExport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Where the table came from (run path, view name)
    pub source: String,

    pub table: MetricTable,

    /// Timestamp when the export was generated
    pub generated_at: String,
}

impl TableExport {
    pub fn new(source: impl Into<String>, table: MetricTable) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            source: source.into(),
            table,
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Write a table export to a JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_table(export: &TableExport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing table to: {}", output_path.display());

    validate_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, export).map_err(OutputError::SerializationFailed)?;

    info!(
        "Table written successfully ({} rows)",
        export.table.len()
    );

    Ok(())
}

/// Validate that output path is writable
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Read a table export from a JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_table(input_path: impl AsRef<Path>) -> Result<TableExport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading table from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let export: TableExport =
        serde_json::from_reader(BufReader::new(file)).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Table loaded: version {}, source {}",
        export.version, export.source
    );

    Ok(export)
}
