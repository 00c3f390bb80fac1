//! Core module for reporting novel genes in isoform classification tables
//! Alejandro Gonzales-Irribarren, 2025
//!
//! Reads one or more SQANTI-like classification tables, keeps the
//! isoforms whose associated gene is marked as novel and prints their
//! identifiers in sorted order. Shapes of the filtered tables are
//! logged, and the tables themselves can be written to an output
//! directory for inspection.

use clap::Parser;
use config::ArgCheck;
use log::{error, info, Level};
use simple_logger::init_with_level;

use iso_novel::{cli::Args, find_novel_genes};

fn main() {
    let start = std::time::Instant::now();
    init_with_level(Level::Info).unwrap();

    let args: Args = Args::parse();

    args.check().unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    find_novel_genes(args).unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    let elapsed = start.elapsed();
    info!("Elapsed time: {:.3?}", elapsed);
}
