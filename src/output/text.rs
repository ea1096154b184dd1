//! Plain-text rendering of tables and hierarchies.

use crate::aggregator::MetricHierarchy;
use crate::reader::{Cell, MetricTable};

const KEY_WIDTH: usize = 48;
const VALUE_WIDTH: usize = 14;

fn format_cell(cell: Option<&Cell>) -> String {
    match cell {
        Some(Cell::Number(value)) => format!("{:.4}", value),
        Some(other) => other.to_string(),
        None => "-".to_string(),
    }
}

fn fit(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let skip = text.chars().count() - (width - 3);
        let tail: String = text.chars().skip(skip).collect();
        format!("...{}", tail)
    } else {
        text.to_string()
    }
}

/// Render a table with aligned columns
pub fn render_table(table: &MetricTable) -> String {
    let mut lines = Vec::with_capacity(table.len() + 2);

    let mut header = format!("  {:<width$}", fit(&table.index_name, KEY_WIDTH), width = KEY_WIDTH);
    for column in table.columns() {
        header.push_str(&format!(" {:>width$}", fit(column, VALUE_WIDTH), width = VALUE_WIDTH));
    }
    lines.push(header);
    lines.push(format!(
        "  {}",
        "-".repeat(KEY_WIDTH + (VALUE_WIDTH + 1) * table.columns().len())
    ));

    for row in table.rows() {
        let mut line = format!("  {:<width$}", fit(&row.key, KEY_WIDTH), width = KEY_WIDTH);
        for cell in &row.cells {
            line.push_str(&format!(" {:>width$}", format_cell(Some(cell)), width = VALUE_WIDTH));
        }
        lines.push(line);
    }

    lines.join("\n")
}

/// Render the hierarchy as an indented tree with one column's values
pub fn render_hierarchy(hierarchy: &MetricHierarchy, column: &str) -> String {
    let table = hierarchy.table();
    let mut lines = Vec::with_capacity(hierarchy.len() + 1);
    lines.push(format!("  TOP-DOWN BREAKDOWN ({})", column));

    for node in hierarchy.nodes() {
        let mut level = 0;
        let mut parent = node.parent;
        while let Some(p) = parent {
            level += 1;
            parent = hierarchy.nodes()[p].parent;
        }

        let label = format!("{}{}", "  ".repeat(level), node.name);
        lines.push(format!(
            "  {:<width$} {:>vw$}",
            fit(&label, KEY_WIDTH),
            format_cell(table.get(&node.name, column)),
            width = KEY_WIDTH,
            vw = VALUE_WIDTH
        ));
    }

    lines.join("\n")
}
