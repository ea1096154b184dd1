//! Top-down (TMA) metric hierarchy recovered from row order.
//!
//! EDP lists top-down metrics flat, in tree pre-order, with depth encoded
//! by a run of dots inside the name:
//!
//! ```text
//! metric_TMAM_Backend_bound(%)
//! metric_TMAM_..Memory_Bound(%)
//! metric_TMAM_....L1_Bound(%)
//! metric_TMAM_..Core_Bound(%)
//! ```
//!
//! The tree is rebuilt in one pass with a depth stack: every row's parent
//! is the nearest earlier row that is strictly shallower.

use crate::reader::MetricTable;
use crate::utils::config::NESTING_MARKER;
use crate::utils::error::HierarchyError;
use log::debug;
use serde::Serialize;
use std::collections::HashSet;

/// Default depth function: length of the first run of nesting markers
///
/// `metric_tmam_frontend_bound` is 0, `metric_tmam_..memory_bound` is 2.
pub fn nesting_level(name: &str) -> usize {
    name.chars()
        .skip_while(|&c| c != NESTING_MARKER)
        .take_while(|&c| c == NESTING_MARKER)
        .count()
}

/// Which rows to keep, optionally relabelled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Keep these metrics under their own names
    Include(Vec<String>),
    /// Keep these metrics, renamed to the paired label
    Rename(Vec<(String, String)>),
}

impl Selector {
    pub fn include<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Include(names.into_iter().map(Into::into).collect())
    }

    pub fn rename<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Rename(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One metric in the hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricNode {
    /// Case-folded metric name
    pub name: String,
    pub depth: usize,
    /// Row index in `MetricHierarchy::table`
    pub row: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    /// One past the last row of this node's subtree
    #[serde(skip)]
    subtree_end: usize,
}

/// Parent/child decomposition of the rows sharing a prefix
#[derive(Debug, Clone)]
pub struct MetricHierarchy {
    prefix: String,
    table: MetricTable,
    nodes: Vec<MetricNode>,
}

impl MetricHierarchy {
    /// Build with the default dot-run depth function
    pub fn build(table: &MetricTable, prefix: &str) -> Self {
        Self::build_with(table, prefix, nesting_level)
    }

    /// Build from the rows of `table` whose key starts with `prefix`
    ///
    /// Keys are case-folded first; the original row order is kept.
    pub fn build_with<F>(table: &MetricTable, prefix: &str, name_to_level: F) -> Self
    where
        F: Fn(&str) -> usize,
    {
        let prefix = prefix.to_lowercase();
        let folded = table.case_folded();
        let keys: Vec<String> = folded
            .keys()
            .filter(|k| k.starts_with(&prefix))
            .map(str::to_string)
            .collect();
        let table = folded.select_rows(&keys);

        let mut nodes: Vec<MetricNode> = Vec::with_capacity(table.len());
        let mut stack: Vec<usize> = Vec::new();

        for (index, key) in table.keys().enumerate() {
            let depth = name_to_level(key);

            while let Some(&top) = stack.last() {
                if nodes[top].depth < depth {
                    break;
                }
                nodes[top].subtree_end = index;
                stack.pop();
            }

            let parent = stack.last().copied();
            if let Some(parent) = parent {
                nodes[parent].children.push(index);
            }

            nodes.push(MetricNode {
                name: key.to_string(),
                depth,
                row: index,
                parent,
                children: Vec::new(),
                subtree_end: index + 1,
            });
            stack.push(index);
        }

        let total = nodes.len();
        for open in stack {
            nodes[open].subtree_end = total;
        }

        debug!(
            "Built hierarchy for prefix '{}': {} metrics, {} roots",
            prefix,
            nodes.len(),
            nodes.iter().filter(|n| n.parent.is_none()).count()
        );

        Self {
            prefix,
            table,
            nodes,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Retained rows, case-folded, in original order
    pub fn table(&self) -> &MetricTable {
        &self.table
    }

    pub fn nodes(&self) -> &[MetricNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = name.to_lowercase();
        self.nodes.iter().position(|n| n.name == name)
    }

    pub fn node(&self, name: &str) -> Option<&MetricNode> {
        self.position(name).map(|i| &self.nodes[i])
    }

    pub fn parent(&self, name: &str) -> Option<&MetricNode> {
        self.node(name)?.parent.map(|p| &self.nodes[p])
    }

    /// Direct children of a metric
    pub fn children(&self, name: &str) -> Option<Vec<&MetricNode>> {
        let node = self.node(name)?;
        Some(node.children.iter().map(|&c| &self.nodes[c]).collect())
    }

    pub fn roots(&self) -> impl Iterator<Item = &MetricNode> {
        self.nodes.iter().filter(|n| n.parent.is_none())
    }

    /// Every descendant of a metric, in row order
    ///
    /// `None` when the metric is unknown; an empty slice for a leaf.
    pub fn subtree(&self, name: &str) -> Option<&[MetricNode]> {
        let index = self.position(name)?;
        Some(&self.nodes[index + 1..self.nodes[index].subtree_end])
    }

    /// Rows of a metric's child region
    ///
    /// The region starts right after the metric and ends before the first
    /// later row at the same or a shallower depth.
    pub fn get_child(&self, name: &str) -> Option<MetricTable> {
        let keys: Vec<&str> = self.subtree(name)?.iter().map(|n| n.name.as_str()).collect();
        Some(self.table.select_rows(&keys))
    }

    /// Child region computed with a different depth function
    pub fn get_child_by<F>(&self, name: &str, name_to_level: F) -> Option<MetricTable>
    where
        F: Fn(&str) -> usize,
    {
        let name = name.to_lowercase();
        let keys: Vec<&str> = self.table.keys().collect();
        let start = keys.iter().position(|k| *k == name)?;
        let depth = name_to_level(keys[start]);

        let region: Vec<&str> = keys[start + 1..]
            .iter()
            .take_while(|k| name_to_level(k) > depth)
            .copied()
            .collect();

        Some(self.table.select_rows(&region))
    }

    /// Select (and optionally relabel) metrics
    ///
    /// Output keeps the hierarchy's row order. An empty selector selects
    /// nothing.
    ///
    /// # Errors
    /// * `HierarchyError::LabelCollision` - a new label equals another retained
    ///   metric or another label
    pub fn filter(&self, selector: &Selector) -> Result<MetricTable, HierarchyError> {
        match selector {
            Selector::Include(names) => Ok(self.table.select_rows(names)),
            Selector::Rename(pairs) => {
                let mut labels: HashSet<String> = HashSet::new();
                for (source, label) in pairs {
                    let folded_label = label.to_lowercase();
                    let clashes_metric = folded_label != source.to_lowercase()
                        && self.position(&folded_label).is_some();
                    if clashes_metric || !labels.insert(folded_label) {
                        return Err(HierarchyError::LabelCollision(label.clone()));
                    }
                }

                let mut out = MetricTable::new(
                    self.table.index_name.clone(),
                    self.table.columns().to_vec(),
                );
                for row in self.table.rows() {
                    let label = pairs
                        .iter()
                        .find(|(source, _)| source.to_lowercase() == row.key);
                    if let Some((_, label)) = label {
                        out.push_row(label.clone(), row.cells.clone());
                    }
                }
                Ok(out)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Cell;

    fn table(keys: &[&str]) -> MetricTable {
        let mut t = MetricTable::new("name", vec!["aggregated".to_string()]);
        for (i, k) in keys.iter().enumerate() {
            t.push_row(*k, vec![Cell::Number(i as f64)]);
        }
        t
    }

    #[test]
    fn test_nesting_level() {
        assert_eq!(nesting_level("metric_tmam_frontend_bound(%)"), 0);
        assert_eq!(nesting_level("metric_tmam_..memory_bound(%)"), 2);
        assert_eq!(nesting_level("metric_TMA......0_Ports_Utilized(%)"), 6);
        assert_eq!(nesting_level(".a..b"), 1);
    }

    #[test]
    fn test_parents_from_depth_stack() {
        let t = table(&["p_a", "p_.b", "p_..c", "p_.d", "p_e"]);
        let h = MetricHierarchy::build(&t, "p_");

        assert_eq!(h.parent("p_..c").unwrap().name, "p_.b");
        assert_eq!(h.parent("p_.d").unwrap().name, "p_a");
        assert!(h.parent("p_e").is_none());
        let roots: Vec<&str> = h.roots().map(|n| n.name.as_str()).collect();
        assert_eq!(roots, vec!["p_a", "p_e"]);
    }

    #[test]
    fn test_prefix_and_case_fold() {
        let t = table(&["Metric_TMAM_Retiring", "metric_cpi", "METRIC_TMAM_..Light"]);
        let h = MetricHierarchy::build(&t, "metric_TMAM");
        let keys: Vec<&str> = h.table().keys().collect();
        assert_eq!(keys, vec!["metric_tmam_retiring", "metric_tmam_..light"]);
    }

    #[test]
    fn test_get_child_by_matches_stack() {
        let t = table(&["p_a", "p_.b", "p_..c", "p_.d", "p_e"]);
        let h = MetricHierarchy::build(&t, "p_");
        for name in ["p_a", "p_.b", "p_..c", "p_.d", "p_e"] {
            assert_eq!(h.get_child(name), h.get_child_by(name, nesting_level));
        }
        assert!(h.get_child_by("p_z", nesting_level).is_none());
    }
}
