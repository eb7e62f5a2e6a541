//! Report renderers for HTML, CSV and JSON.
//!
//! # Submodules
//!
//! - [`html`]: The searchable static page
//! - [`csv`]: A spreadsheet-friendly export of the same table
//! - [`json`]: The full [`crate::models::Report`], including diagnostics
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── azure_service_retirements.html
//! ├── azure_service_retirements.csv
//! └── azure_service_retirements.json
//! ```

pub mod csv;
pub mod html;
pub mod json;

use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// A report artifact format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Html,
    Csv,
    Json,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Html => "html",
            Format::Csv => "csv",
            Format::Json => "json",
        }
    }

    /// `{output_dir}/{report_name}.{ext}`
    pub fn path_in(self, output_dir: &Path, report_name: &str) -> PathBuf {
        output_dir.join(format!("{report_name}.{}", self.extension()))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
