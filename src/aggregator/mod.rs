//! Analysis built on loaded views.
//!
//! This module transforms metric tables into:
//! - The top-down parent/child hierarchy
//! - Per-platform breakdown groups
//! - Cross-run and cross-core combinations

pub mod combine;
pub mod platform;
pub mod topdown;

// Re-export main types and functions
pub use combine::{combine_runs, core_average, mean_across, MEAN_COLUMN};
pub use platform::{Platform, GROUPS};
pub use topdown::{nesting_level, MetricHierarchy, MetricNode, Selector};
