//! Logical view identifiers and their physical names.

use crate::parser::CoreSet;
use crate::utils::config::{
    CSV_DETAIL_TEMPLATE, CSV_SUMMARY_TEMPLATE, SHEET_DETAIL_TEMPLATE, SHEET_SUMMARY_TEMPLATE,
    TIMESTAMP_COLUMN,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Granularity of a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    System,
    Socket,
    Core,
    Thread,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Socket => "socket",
            Self::Core => "core",
            Self::Thread => "thread",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(Self::System),
            "socket" => Ok(Self::Socket),
            "core" => Ok(Self::Core),
            "thread" => Ok(Self::Thread),
            other => Err(format!("unknown view scope '{}'", other)),
        }
    }
}

/// Aggregated statistics or per-sample rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Summary,
    Detail,
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Summary => f.write_str("summary"),
            Self::Detail => f.write_str("detail"),
        }
    }
}

impl FromStr for ViewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "summary" => Ok(Self::Summary),
            "detail" | "details" => Ok(Self::Detail),
            other => Err(format!("unknown view kind '{}'", other)),
        }
    }
}

/// Maps `(kind, scope)` to a physical resource name
///
/// Templates contain a `{scope}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewNaming {
    pub summary: String,
    pub detail: String,
}

impl ViewNaming {
    pub fn new(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    /// Naming used for directories of EDP csv files
    pub fn csv() -> Self {
        Self::new(CSV_SUMMARY_TEMPLATE, CSV_DETAIL_TEMPLATE)
    }

    /// Naming used for sheets of an EDP workbook
    pub fn sheet() -> Self {
        Self::new(SHEET_SUMMARY_TEMPLATE, SHEET_DETAIL_TEMPLATE)
    }

    pub fn resource_name(&self, kind: ViewKind, scope: Scope) -> String {
        let template = match kind {
            ViewKind::Summary => &self.summary,
            ViewKind::Detail => &self.detail,
        };
        template.replace("{scope}", scope.as_str())
    }
}

/// Row and column allow-lists applied after loading
///
/// `None` on either axis keeps everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    pub rows: Option<Vec<String>>,
    pub columns: Option<Vec<String>>,
}

impl Projection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_rows<I, S>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows = Some(rows.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Keep the per-core columns of `socket` for the given cores
    pub fn with_cores(self, socket: u32, cores: &CoreSet) -> Self {
        self.with_columns(core_columns(socket, cores))
    }

    /// Detail views always carry the timestamp column
    pub(crate) fn for_kind(&self, kind: ViewKind) -> Self {
        let mut projection = self.clone();
        if kind == ViewKind::Detail {
            if let Some(columns) = projection.columns.as_mut() {
                if !columns.iter().any(|c| c.eq_ignore_ascii_case(TIMESTAMP_COLUMN)) {
                    columns.insert(0, TIMESTAMP_COLUMN.to_string());
                }
            }
        }
        projection
    }
}

/// Column label EDP uses for one core
pub fn core_column(socket: u32, core: u32) -> String {
    format!("socket {} core {}", socket, core)
}

/// Column labels for every core of `cores` on `socket`
pub fn core_columns(socket: u32, cores: &CoreSet) -> Vec<String> {
    cores.iter().map(|core| core_column(socket, core)).collect()
}

/// Column label EDP uses for one socket
pub fn socket_column(socket: u32) -> String {
    format!("socket {}", socket)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_naming() {
        let naming = ViewNaming::csv();
        assert_eq!(
            naming.resource_name(ViewKind::Summary, Scope::Socket),
            "__edp_socket_view_summary.csv"
        );
        assert_eq!(
            naming.resource_name(ViewKind::Detail, Scope::Core),
            "__edp_core_view_details.csv"
        );
    }

    #[test]
    fn test_sheet_naming() {
        let naming = ViewNaming::sheet();
        assert_eq!(naming.resource_name(ViewKind::Summary, Scope::System), "system view");
        assert_eq!(
            naming.resource_name(ViewKind::Detail, Scope::Thread),
            "details thread view"
        );
    }

    #[test]
    fn test_detail_projection_gains_timestamp() {
        let projection = Projection::all().with_columns(["socket 0"]);
        let detail = projection.for_kind(ViewKind::Detail);
        assert_eq!(
            detail.columns.unwrap(),
            vec!["timestamp".to_string(), "socket 0".to_string()]
        );

        let summary = projection.for_kind(ViewKind::Summary);
        assert_eq!(summary.columns.unwrap(), vec!["socket 0".to_string()]);
    }

    #[test]
    fn test_core_columns() {
        let cores = CoreSet::parse("0-1").unwrap();
        assert_eq!(
            core_columns(1, &cores),
            vec!["socket 1 core 0".to_string(), "socket 1 core 1".to_string()]
        );
    }
}
