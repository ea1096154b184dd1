use crate::aggregator::Platform;
use crate::reader::{Scope, ViewKind};
use crate::utils::config::{ReaderConfig, DEFAULT_TOPDOWN_PREFIX};
use std::path::PathBuf;

/// Arguments for the view command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ViewArgs {
    /// Run directory or workbook
    pub source: PathBuf,

    pub scope: Scope,

    pub kind: ViewKind,

    /// Row allow-list (None = all rows)
    pub rows: Option<Vec<String>>,

    /// Column allow-list (None = all columns)
    pub columns: Option<Vec<String>>,

    /// Core list whose per-core columns to keep, with the socket they belong to
    pub cores: Option<(u32, String)>,

    pub reader: ReaderConfig,

    /// Optional JSON export path
    pub output_json: Option<PathBuf>,
}

impl Default for ViewArgs {
    fn default() -> Self {
        Self {
            source: PathBuf::from("."),
            scope: Scope::System,
            kind: ViewKind::Summary,
            rows: None,
            columns: None,
            cores: None,
            reader: ReaderConfig::default(),
            output_json: None,
        }
    }
}

/// Arguments for the topdown command
#[derive(Debug, Clone)]
pub struct TopdownArgs {
    pub source: PathBuf,

    pub scope: Scope,

    /// Column whose values are shown
    pub column: String,

    /// Metric prefix; overridden by the platform's prefix when one is given
    pub prefix: String,

    /// Print this platform's breakdown groups instead of the whole tree
    pub platform: Option<Platform>,

    /// Print only this metric's subtree
    pub node: Option<String>,

    pub reader: ReaderConfig,
}

impl Default for TopdownArgs {
    fn default() -> Self {
        Self {
            source: PathBuf::from("."),
            scope: Scope::System,
            column: "aggregated".to_string(),
            prefix: DEFAULT_TOPDOWN_PREFIX.to_string(),
            platform: None,
            node: None,
            reader: ReaderConfig::default(),
        }
    }
}

/// Arguments for the combine command
#[derive(Debug, Clone)]
pub struct CombineArgs {
    /// Run directories or workbooks, labelled by file name
    pub runs: Vec<PathBuf>,

    pub scope: Scope,

    pub column: String,

    pub reader: ReaderConfig,

    pub output_json: Option<PathBuf>,
}
