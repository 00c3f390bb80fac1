//! Core module for resolving workflow targets
//! Alejandro Gonzales-Irribarren, 2025
//!
//! Loads a workflow config and its sample table, merges them into a
//! fill context and expands every filename template of the patterns
//! file. The resulting target map is printed as JSON [same shape as
//! the patterns file] or as a flat list of paths.

use clap::Parser;
use config::ArgCheck;
use log::{error, info, Level};
use simple_logger::init_with_level;

use iso_targets::{cli::Args, write_targets};

fn main() {
    let start = std::time::Instant::now();
    init_with_level(Level::Info).unwrap();

    let args: Args = Args::parse();

    args.check().unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    write_targets(args).unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    let elapsed = start.elapsed();
    info!("Elapsed time: {:.3?}", elapsed);
}
