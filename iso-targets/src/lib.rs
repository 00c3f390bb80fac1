//! iso-targets: resolve workflow targets from config and pattern files
//! Alejandro Gonzales-Irribarren, 2025
//!
//! Reads a workflow config, the sample table it points to and a
//! patterns file of filename templates, and expands the templates into
//! the concrete target paths a workflow engine is expected to build.

use anyhow::Result;
use config::ArgCheck;

pub mod cli;
pub mod core;
pub mod expand;
pub mod fill;
pub mod utils;

pub use crate::core::{write_targets, SeqConfig};
pub use crate::expand::{fill_patterns, TargetMap, Template};
pub use crate::fill::{FillContext, FillValue, Layer};

pub fn lib_iso_targets(args: Vec<String>) -> Result<TargetMap> {
    let args = cli::Args::from(args);
    args.check()?;

    write_targets(args)
}
