//! View command implementation.
//!
//! The view command:
//! 1. Opens the run with the backend matching its path
//! 2. Loads one view with the requested projection
//! 3. Prints it and optionally exports JSON

use super::models::ViewArgs;
use crate::output::{render_table, write_table, TableExport};
use crate::parser::CoreSet;
use crate::reader::{MetricTable, Projection, ViewReader};
use anyhow::{Context, Result};
use log::info;

/// Execute the view command
///
/// **Public** - main entry point called from main.rs
pub fn execute_view(args: ViewArgs) -> Result<MetricTable> {
    let mut projection = Projection {
        rows: args.rows.clone(),
        columns: args.columns.clone(),
    };

    if let Some((socket, cores)) = &args.cores {
        let cores = CoreSet::parse(cores).context("Invalid --cores list")?;
        info!("Selecting socket {} cores {}", socket, cores);
        projection = projection.with_cores(*socket, &cores);
    }

    let mut reader = ViewReader::open(&args.source, args.reader.clone())
        .with_context(|| format!("Failed to open {}", args.source.display()))?;

    let table = reader
        .load(args.scope, args.kind, Some(&projection))
        .with_context(|| format!("Failed to load {} {} view", args.scope, args.kind))?;

    println!("{}", render_table(&table));

    if let Some(path) = &args.output_json {
        let source = format!("{} ({} {})", args.source.display(), args.scope, args.kind);
        write_table(&TableExport::new(source, table.clone()), path)
            .context("Failed to write JSON export")?;
    }

    Ok(table)
}
