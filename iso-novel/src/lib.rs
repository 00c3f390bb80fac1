//! iso-novel: report novel genes from isoform classification tables
//! Alejandro Gonzales-Irribarren, 2025
//!
//! Keeps the isoforms whose `associated_gene` carries the novel-gene
//! marker and prints their identifiers, sorted, one per line.

use anyhow::Result;
use config::ArgCheck;

pub mod cli;
pub mod core;

pub use crate::core::{
    find_novel_genes, load_and_filter, load_and_filter_with, report, report_to, sorted_ids,
    NovelFilter,
};

pub fn lib_iso_novel(args: Vec<String>) -> Result<Vec<Vec<String>>> {
    let args = cli::Args::from(args);
    args.check()?;

    find_novel_genes(args)
}
