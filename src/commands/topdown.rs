//! Top-down command implementation.
//!
//! Loads a summary view, rebuilds the top-down hierarchy and prints either
//! the whole tree, one metric's subtree, or a platform's breakdown groups.

use super::models::TopdownArgs;
use crate::aggregator::{MetricHierarchy, GROUPS};
use crate::output::{render_hierarchy, render_table};
use crate::reader::{ViewKind, ViewReader};
use anyhow::{anyhow, Context, Result};
use log::{info, warn};

/// Execute the topdown command
///
/// **Public** - main entry point called from main.rs
pub fn execute_topdown(args: TopdownArgs) -> Result<()> {
    let mut reader = ViewReader::open(&args.source, args.reader.clone())
        .with_context(|| format!("Failed to open {}", args.source.display()))?;
    let table = reader
        .load(args.scope, ViewKind::Summary, None)
        .with_context(|| format!("Failed to load {} summary view", args.scope))?;

    let prefix = args
        .platform
        .map(|p| p.prefix().to_string())
        .unwrap_or_else(|| args.prefix.clone());
    let hierarchy = MetricHierarchy::build(&table, &prefix);
    info!("{} top-down metrics under '{}'", hierarchy.len(), prefix);

    if hierarchy.is_empty() {
        warn!("No metrics start with '{}'", prefix);
        return Ok(());
    }

    if let Some(node) = &args.node {
        let region = hierarchy
            .get_child(node)
            .ok_or_else(|| anyhow!("Metric '{}' not found", node))?;
        println!("{}", render_table(&region.select_columns(&[args.column.as_str()])));
        return Ok(());
    }

    if let Some(platform) = args.platform {
        for group in GROUPS {
            let Some(breakdown) = platform.breakdown(&hierarchy, group)? else {
                continue;
            };
            println!("  {} {}", platform, group.to_uppercase());
            println!("{}", render_table(&breakdown.select_columns(&[args.column.as_str()])));
            println!();
        }
        return Ok(());
    }

    println!("{}", render_hierarchy(&hierarchy, &args.column));
    Ok(())
}
