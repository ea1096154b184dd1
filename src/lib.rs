//! EMON Studio
//!
//! Reading and decomposing EMON/EDP post-processed performance metrics.
//!
//! This crate provides the core implementation for the
//! `emon-studio` CLI tool:
//!
//! - [`reader`] loads system/socket/core/thread views from a directory of
//!   CSV files or a single workbook, with projection and caching
//! - [`aggregator`] rebuilds the top-down metric tree from dotted names
//! - [`parser`] handles CPU core lists, metric formula catalogs and timestamps
//! - [`output`] exports tables as JSON or aligned text
//!
//! ## Getting Started
//!
//! ```bash
//! emon-studio view ./run --scope core --cores 0-3
//! emon-studio topdown ./run --platform icx
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod reader;
pub mod utils;
