//! Combine metric columns across runs and across cores.

use crate::parser::CoreSet;
use crate::reader::{core_columns, Cell, MetricTable};
use log::debug;

/// Label of the column produced by `mean_across`
pub const MEAN_COLUMN: &str = "mean";

/// Put one column from each run side by side
///
/// Columns are the run labels in sorted order; rows are the union of
/// metric keys in first-seen order. Metrics absent from a run are missing.
pub fn combine_runs(runs: &[(String, MetricTable)], column: &str) -> MetricTable {
    let mut sorted: Vec<&(String, MetricTable)> = runs.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let labels: Vec<String> = sorted.iter().map(|(label, _)| label.clone()).collect();
    let index_name = sorted
        .first()
        .map(|(_, t)| t.index_name.clone())
        .unwrap_or_default();
    let mut combined = MetricTable::new(index_name, labels);

    for (_, table) in &sorted {
        for key in table.keys() {
            if combined.row(key).is_none() {
                let cells = sorted
                    .iter()
                    .map(|(_, run)| run.get(key, column).cloned().unwrap_or(Cell::Missing))
                    .collect();
                combined.push_row(key, cells);
            }
        }
    }

    debug!(
        "Combined column '{}' from {} runs into {} metrics",
        column,
        runs.len(),
        combined.len()
    );

    combined
}

/// Mean of the listed columns per row, ignoring missing cells
pub fn mean_across<S: AsRef<str>>(table: &MetricTable, columns: &[S]) -> MetricTable {
    let indices: Vec<usize> = columns
        .iter()
        .filter_map(|c| table.column_index(c.as_ref()))
        .collect();

    let mut out = MetricTable::new(table.index_name.clone(), vec![MEAN_COLUMN.to_string()]);
    for row in table.rows() {
        let values: Vec<f64> = indices
            .iter()
            .filter_map(|&i| row.cells[i].as_f64())
            .collect();
        let cell = if values.is_empty() {
            Cell::Missing
        } else {
            Cell::Number(values.iter().sum::<f64>() / values.len() as f64)
        };
        out.push_row(row.key.clone(), vec![cell]);
    }

    out
}

/// Per-core column for a single core, or the mean across several
pub fn core_average(table: &MetricTable, socket: u32, cores: &CoreSet) -> MetricTable {
    let columns = core_columns(socket, cores);
    if let [single] = columns.as_slice() {
        return table.select_columns(std::slice::from_ref(single));
    }
    mean_across(table, &columns)
}
