//! Configuration and constants for view readers.

/// Current JSON export schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// Delimited-text view files, one per (kind, scope)
pub const CSV_SUMMARY_TEMPLATE: &str = "__edp_{scope}_view_summary.csv";
pub const CSV_DETAIL_TEMPLATE: &str = "__edp_{scope}_view_details.csv";

// Spreadsheet sheets, one per (kind, scope)
pub const SHEET_SUMMARY_TEMPLATE: &str = "{scope} view";
pub const SHEET_DETAIL_TEMPLATE: &str = "details {scope} view";

/// Companion archive written once EDP post-processing completes
pub const PROCESSING_MARKER: &str = "emon_data.zip";

/// Column kept as text instead of being coerced to a number
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// Default prefix of top-down metric rows
pub const DEFAULT_TOPDOWN_PREFIX: &str = "metric_tmam";

/// Character whose leading run encodes hierarchy depth in metric names
pub const NESTING_MARKER: char = '.';

/// Workbook extensions accepted by the spreadsheet backend
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// Largest CPU index a core list may name
pub const MAX_CORE_INDEX: u32 = 65_535;

/// Layout used when a workbook stores a timestamp as a date cell
pub const CELL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

// Timestamp layouts emitted by EDP and common exporters
pub const TIMESTAMP_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Runtime options for a view reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Fail with `SourceIncomplete` unless the processing marker exists
    pub require_marker: bool,

    /// Forward-fill missing cells column-wise in detail views
    pub forward_fill: bool,

    /// File name of the processing marker
    pub marker_name: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            require_marker: false,
            forward_fill: false,
            marker_name: PROCESSING_MARKER.to_string(),
        }
    }
}

impl ReaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_marker_required(mut self, required: bool) -> Self {
        self.require_marker = required;
        self
    }

    pub fn with_forward_fill(mut self, enabled: bool) -> Self {
        self.forward_fill = enabled;
        self
    }
}
