//! Physical backends for views.
//!
//! A view is stored either as one csv file per `(kind, scope)` inside a
//! run directory, or as one sheet per `(kind, scope)` inside a workbook.
//! Both implement `ViewSource`, so readers never branch on storage.

use super::table::RawTable;
use super::view::{Scope, ViewKind, ViewNaming};
use crate::utils::config::CELL_TIMESTAMP_FORMAT;
use crate::utils::error::ViewError;
use calamine::{open_workbook_auto, Data, Range, Reader};
use log::debug;
use std::path::{Path, PathBuf};

/// Loads the raw rows of one view
pub trait ViewSource {
    /// Physical resource name of a view (file or sheet)
    fn resource_name(&self, kind: ViewKind, scope: Scope) -> String;

    /// Read a view fully, releasing any handle before returning
    ///
    /// # Errors
    /// * `ViewError::ResourceNotFound` - file or sheet absent
    fn load_raw(&self, kind: ViewKind, scope: Scope) -> Result<RawTable, ViewError>;

    /// Directory holding the processing marker
    fn marker_dir(&self) -> &Path;
}

/// A directory of EDP csv files
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    root: PathBuf,
    naming: ViewNaming,
}

impl CsvDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_naming(root, ViewNaming::csv())
    }

    pub fn with_naming(root: impl Into<PathBuf>, naming: ViewNaming) -> Self {
        Self {
            root: root.into(),
            naming,
        }
    }

    pub fn view_path(&self, kind: ViewKind, scope: Scope) -> PathBuf {
        self.root.join(self.resource_name(kind, scope))
    }
}

impl ViewSource for CsvDirectory {
    fn resource_name(&self, kind: ViewKind, scope: Scope) -> String {
        self.naming.resource_name(kind, scope)
    }

    fn load_raw(&self, kind: ViewKind, scope: Scope) -> Result<RawTable, ViewError> {
        let path = self.view_path(kind, scope);
        if !path.is_file() {
            return Err(ViewError::ResourceNotFound(path.display().to_string()));
        }

        debug!("Reading csv view: {}", path.display());
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)?;

        let mut records = reader.records();
        let header = match records.next() {
            Some(record) => record?.iter().map(str::to_string).collect(),
            None => Vec::new(),
        };

        let mut rows = Vec::new();
        for record in records {
            rows.push(record?.iter().map(str::to_string).collect());
        }

        Ok(RawTable { header, rows })
    }

    fn marker_dir(&self) -> &Path {
        &self.root
    }
}

/// A workbook with one sheet per view
#[derive(Debug, Clone)]
pub struct Workbook {
    path: PathBuf,
    marker_dir: PathBuf,
    naming: ViewNaming,
}

impl Workbook {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_naming(path, ViewNaming::sheet())
    }

    pub fn with_naming(path: impl Into<PathBuf>, naming: ViewNaming) -> Self {
        let path = path.into();
        let marker_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            path,
            marker_dir,
            naming,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ViewSource for Workbook {
    fn resource_name(&self, kind: ViewKind, scope: Scope) -> String {
        self.naming.resource_name(kind, scope)
    }

    fn load_raw(&self, kind: ViewKind, scope: Scope) -> Result<RawTable, ViewError> {
        if !self.path.is_file() {
            return Err(ViewError::ResourceNotFound(self.path.display().to_string()));
        }

        let sheet = self.resource_name(kind, scope);
        debug!("Reading sheet '{}' from {}", sheet, self.path.display());

        let mut workbook = open_workbook_auto(&self.path)?;
        let Some(actual) = workbook
            .sheet_names()
            .into_iter()
            .find(|name| name.eq_ignore_ascii_case(&sheet))
        else {
            return Err(ViewError::ResourceNotFound(format!(
                "{}[{}]",
                self.path.display(),
                sheet
            )));
        };

        let range = workbook.worksheet_range(&actual)?;
        Ok(raw_from_range(&range))
    }

    fn marker_dir(&self) -> &Path {
        &self.marker_dir
    }
}

/// Convert a sheet range into raw rows, first row as header
pub fn raw_from_range(range: &Range<Data>) -> RawTable {
    let mut rows = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
    let header = rows.next().unwrap_or_default();
    RawTable {
        header,
        rows: rows.collect(),
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        Data::Float(value) => value.to_string(),
        Data::Int(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(date) => match date.as_datetime() {
            Some(moment) => moment.format(CELL_TIMESTAMP_FORMAT).to_string(),
            None => date.to_string(),
        },
        Data::DateTimeIso(text) | Data::DurationIso(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_from_range() {
        let mut range: Range<Data> = Range::new((0, 0), (2, 1));
        range.set_value((0, 0), Data::String("name".to_string()));
        range.set_value((0, 1), Data::String("aggregated".to_string()));
        range.set_value((1, 0), Data::String("metric_a".to_string()));
        range.set_value((1, 1), Data::Float(0.5));
        range.set_value((2, 0), Data::String("metric_b".to_string()));
        range.set_value((2, 1), Data::Int(7));

        let raw = raw_from_range(&range);
        assert_eq!(raw.header, vec!["name", "aggregated"]);
        assert_eq!(raw.rows[0], vec!["metric_a", "0.5"]);
        assert_eq!(raw.rows[1], vec!["metric_b", "7"]);
    }

    #[test]
    fn test_iso_cells_keep_their_text() {
        let mut range: Range<Data> = Range::new((0, 0), (1, 1));
        range.set_value((0, 0), Data::String("#".to_string()));
        range.set_value((0, 1), Data::String("timestamp".to_string()));
        range.set_value((1, 0), Data::Int(1));
        range.set_value((1, 1), Data::DateTimeIso("2024-03-01T10:00:00".to_string()));

        let raw = raw_from_range(&range);
        assert_eq!(raw.rows[0], vec!["1", "2024-03-01T10:00:00"]);
    }

    #[test]
    fn test_missing_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvDirectory::new(dir.path());
        assert!(matches!(
            source.load_raw(ViewKind::Summary, Scope::System),
            Err(ViewError::ResourceNotFound(_))
        ));
    }

    #[test]
    fn test_missing_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let source = Workbook::new(dir.path().join("edp.xlsx"));
        assert!(matches!(
            source.load_raw(ViewKind::Summary, Scope::System),
            Err(ViewError::ResourceNotFound(_))
        ));
        assert_eq!(source.marker_dir(), dir.path());
    }
}
