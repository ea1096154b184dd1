//! Combine command implementation.
//!
//! Reads the same summary view from several runs and puts one column of
//! each side by side.

use super::models::CombineArgs;
use crate::aggregator::combine_runs;
use crate::output::{render_table, write_table, TableExport};
use crate::reader::{MetricTable, ViewKind, ViewReader};
use anyhow::{bail, Context, Result};
use log::debug;

/// Execute the combine command
///
/// **Public** - main entry point called from main.rs
pub fn execute_combine(args: CombineArgs) -> Result<MetricTable> {
    if args.runs.is_empty() {
        bail!("At least one run is required");
    }

    let mut runs = Vec::with_capacity(args.runs.len());
    for path in &args.runs {
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        debug!("Loading run '{}'", label);

        let mut reader = ViewReader::open(path, args.reader.clone())
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let table = reader
            .load(args.scope, ViewKind::Summary, None)
            .with_context(|| format!("Failed to load {} view of {}", args.scope, label))?;
        runs.push((label, table));
    }

    let combined = combine_runs(&runs, &args.column);
    println!("{}", render_table(&combined));

    if let Some(path) = &args.output_json {
        let source = format!("{} runs, {} view, column '{}'", runs.len(), args.scope, args.column);
        write_table(&TableExport::new(source, combined.clone()), path)
            .context("Failed to write JSON export")?;
    }

    Ok(combined)
}
