//! Parsing of the small textual languages found around EMON data.
//!
//! This module handles:
//! - CPU core lists (`0-3,8`)
//! - The XML metric formula catalog
//! - Sample timestamps

pub mod core_set;
pub mod formula;
pub mod timestamp;

// Re-export main types
pub use core_set::CoreSet;
pub use formula::{AliasDef, AliasKind, FormulaCatalog, FormulaEntry};
pub use timestamp::parse_timestamp;
