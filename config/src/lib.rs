//! Shared configuration module for isoflow
//! Alejandro Gonzales-Irribarren, 2025
//!
//! Universal constants, the error taxonomy, argument checks and
//! the tab-separated table model used by every iso-tool in the
//! isoflow workspace.

use std::path::PathBuf;
use thiserror::Error;

pub mod fns;
pub mod table;

pub use fns::*;
pub use table::{IndexCol, Table};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// classification tables
pub const ASSOCIATED_GENE: &str = "associated_gene";
pub const NOVEL_MARKER: &str = "novel";
pub const NOVEL_SUFFIX: &str = "novel.tsv";

// workflow config
pub const SAMPLETABLE: &str = "sampletable";
pub const RUN: &str = "run";
pub const SAMPLE: &str = "sample";
pub const DEFAULT_WORKDIR: &str = ".";

// extensions
pub const TABLE_EXTENSIONS: [&str; 4] = ["txt", "tsv", "tab", "gz"];
pub const YAML_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

// tokens read as missing values by common tabular tools
pub const NA_VALUES: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// error taxonomy for every iso-tool
#[derive(Debug, Error)]
pub enum IsoError {
    #[error("IO error: could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Config parse error in {path:?}: {msg}")]
    ConfigParse { path: PathBuf, msg: String },
    #[error("Schema error in {path:?}: {msg}")]
    Schema { path: PathBuf, msg: String },
    #[error("Expansion error: {0}")]
    Expansion(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl IsoError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IsoError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn config_parse(path: impl Into<PathBuf>, msg: impl ToString) -> Self {
        IsoError::ConfigParse {
            path: path.into(),
            msg: msg.to_string(),
        }
    }

    pub fn schema(path: impl Into<PathBuf>, msg: impl ToString) -> Self {
        IsoError::Schema {
            path: path.into(),
            msg: msg.to_string(),
        }
    }
}

/// argument checker for all subcommands
pub trait ArgCheck {
    fn check(&self) -> Result<(), IsoError> {
        self.validate_args()
    }

    fn validate_args(&self) -> Result<(), IsoError> {
        if self.get_inputs().is_empty() {
            let err = "No input files provided".to_string();
            return Err(IsoError::InvalidInput(err));
        }

        for input in self.get_inputs() {
            validate(input, self.get_extensions())?;
        }

        Ok(())
    }

    fn get_inputs(&self) -> Vec<&PathBuf>;
    fn get_extensions(&self) -> &[&str];
}

/// true if a raw cell would be read as a missing value
#[inline(always)]
pub fn is_missing(cell: &str) -> bool {
    NA_VALUES.contains(&cell)
}
