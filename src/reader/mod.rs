//! Loading of EDP views from csv directories or workbooks.
//!
//! This module handles:
//! - Naming views per `(kind, scope)`
//! - Reading raw rows from either storage backend
//! - Numeric coercion and projection
//! - Per-reader caching of materialized tables

pub mod source;
pub mod table;
pub mod view;

// Re-export main types
pub use source::{CsvDirectory, ViewSource, Workbook};
pub use table::{Cell, MetricRow, MetricTable, RawTable};
pub use view::{core_column, core_columns, socket_column, Projection, Scope, ViewKind, ViewNaming};

use crate::utils::config::{ReaderConfig, WORKBOOK_EXTENSIONS};
use crate::utils::error::ViewError;
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Reads views from one EDP run, caching each materialized table
pub struct ViewReader {
    source: Box<dyn ViewSource>,
    config: ReaderConfig,
    cache: HashMap<(ViewKind, Scope), MetricTable>,
}

impl ViewReader {
    /// Create a reader over any backend
    pub fn new(source: Box<dyn ViewSource>, config: ReaderConfig) -> Self {
        Self {
            source,
            config,
            cache: HashMap::new(),
        }
    }

    /// Create a reader, choosing the backend from the path
    ///
    /// A directory selects csv files; a workbook extension selects sheets.
    ///
    /// # Errors
    /// * `ViewError::ResourceNotFound` - path does not exist
    /// * `ViewError::UnsupportedSource` - file is not a known workbook type
    pub fn open(path: impl AsRef<Path>, config: ReaderConfig) -> Result<Self, ViewError> {
        let path = path.as_ref();

        if path.is_dir() {
            info!("Reading csv views from {}", path.display());
            return Ok(Self::new(Box::new(CsvDirectory::new(path)), config));
        }

        if !path.exists() {
            return Err(ViewError::ResourceNotFound(path.display().to_string()));
        }

        let is_workbook = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                WORKBOOK_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            });

        if is_workbook {
            info!("Reading workbook views from {}", path.display());
            Ok(Self::new(Box::new(Workbook::new(path)), config))
        } else {
            Err(ViewError::UnsupportedSource(path.to_path_buf()))
        }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Load a view, reusing the cached table when present
    ///
    /// # Errors
    /// * `ViewError::ResourceNotFound` - file or sheet absent
    /// * `ViewError::SourceIncomplete` - marker required but absent
    pub fn load(
        &mut self,
        scope: Scope,
        kind: ViewKind,
        projection: Option<&Projection>,
    ) -> Result<MetricTable, ViewError> {
        let key = (kind, scope);
        if !self.cache.contains_key(&key) {
            let table = self.materialize(kind, scope)?;
            self.cache.insert(key, table);
        } else {
            debug!("Using cached {} {} view", scope, kind);
        }

        let table = &self.cache[&key];
        Ok(match projection {
            Some(projection) => table.project(&projection.for_kind(kind)),
            None => table.clone(),
        })
    }

    /// Re-read a view from storage and replace its cache entry
    ///
    /// The previous entry stays in place if the read fails.
    pub fn refresh(
        &mut self,
        scope: Scope,
        kind: ViewKind,
        projection: Option<&Projection>,
    ) -> Result<MetricTable, ViewError> {
        debug!("Refreshing {} {} view", scope, kind);
        let table = self.materialize(kind, scope)?;
        self.cache.insert((kind, scope), table);
        self.load(scope, kind, projection)
    }

    /// Drop every cached table
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    pub fn system_view(&mut self) -> Result<MetricTable, ViewError> {
        self.load(Scope::System, ViewKind::Summary, None)
    }

    pub fn socket_view(&mut self) -> Result<MetricTable, ViewError> {
        self.load(Scope::Socket, ViewKind::Summary, None)
    }

    pub fn core_view(&mut self) -> Result<MetricTable, ViewError> {
        self.load(Scope::Core, ViewKind::Summary, None)
    }

    pub fn thread_view(&mut self) -> Result<MetricTable, ViewError> {
        self.load(Scope::Thread, ViewKind::Summary, None)
    }

    /// Path of the processing marker when it exists
    pub fn raw_data_file(&self) -> Option<PathBuf> {
        let path = self.marker_path();
        path.is_file().then_some(path)
    }

    fn marker_path(&self) -> PathBuf {
        self.source.marker_dir().join(&self.config.marker_name)
    }

    fn materialize(&self, kind: ViewKind, scope: Scope) -> Result<MetricTable, ViewError> {
        let raw = self.source.load_raw(kind, scope)?;

        if self.config.require_marker {
            let marker = self.marker_path();
            if !marker.is_file() {
                return Err(ViewError::SourceIncomplete(marker));
            }
        }

        let mut table = MetricTable::from_raw(raw)?;
        if kind == ViewKind::Detail && self.config.forward_fill {
            table.forward_fill();
        }

        debug!(
            "Loaded {} {} view from '{}': {} rows",
            scope,
            kind,
            self.source.resource_name(kind, scope),
            table.len()
        );

        Ok(table)
    }
}
