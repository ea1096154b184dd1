//! Formula command implementation.
//!
//! Expands every formula of an EDP metric catalog, one per line.

use crate::parser::FormulaCatalog;
use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Execute the formulas command
///
/// **Public** - main entry point called from main.rs
///
/// Writes `name: expression` lines to `output`, or stdout when `None`.
pub fn execute_formulas(catalog: &Path, output: Option<&Path>) -> Result<usize> {
    let catalog = FormulaCatalog::from_path(catalog)
        .with_context(|| format!("Failed to read catalog {}", catalog.display()))?;

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    for entry in catalog.iter() {
        let expression = entry
            .expand()
            .with_context(|| format!("Failed to expand '{}'", entry.name))?;
        writeln!(writer, "{}: {}", entry.name, expression)?;
    }
    writer.flush()?;

    info!("Expanded {} formulas", catalog.len());
    Ok(catalog.len())
}
