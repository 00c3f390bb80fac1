/// isoflow: glue tools for long-read sequencing workflows
///
/// This is the entry point for the isoflow CLI.
/// It is responsible for parsing the CLI arguments
/// and executing the appropriate subcommand [iso-tool].
///
/// This wrapper offers 2 different subcommands:
/// - iso-novel
/// - iso-targets
///
/// iso-novel reports the isoforms of a classification table
/// whose associated gene is marked as novel; iso-targets expands
/// the pattern templates of a workflow into concrete target paths
/// using the workflow config and its sample table. Both share the
/// hidden 'config' crate with universal constants and errors.
///
/// To get help on the subcommands, you can run:
///
/// ```shell
/// isoflow iso-novel -- --help
/// ```
///
use clap::{Args, Parser, Subcommand};
use isoflow::{lib, Tool};
use log::{error, info, Level};
use simple_logger::init_with_level;

const HELP: &str = r#"
Usage: isoflow iso-novel -- --classification <PATHS> [--exclude <PREFIX>] [--outdir <DIR>]
       isoflow iso-targets -- --config <PATH> --patterns <PATH> [--workdir <DIR>] [--flatten]

 Options:
  -- <ARGS>...                Arguments forwarded to the iso-tool
  -h, --help                  Print help
"#;

#[derive(Parser)]
#[command(name = "isoflow")]
#[command(about = "isoflow: glue tools for long-read sequencing workflows")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Alejandro Gonzales-Irribarren, 2025")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "iso-novel")]
    Novel(IsoArgs),
    #[command(name = "iso-targets")]
    Targets(IsoArgs),
}

#[derive(Args)]
struct IsoArgs {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, help = HELP)]
    args: Vec<String>,
}

fn main() {
    let start = std::time::Instant::now();
    init_with_level(Level::Info).unwrap();
    let cli = Cli::parse();

    init();

    let (tool, args) = match cli.command {
        Commands::Novel(args) => (Tool::Novel, args.args),
        Commands::Targets(args) => (Tool::Targets, args.args),
    };

    lib(tool, args).unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    let elapsed = start.elapsed();
    info!("Elapsed time: {:.3?}", elapsed);
}

fn init() {
    let message = format!(
        r#"

        isoflow: glue tools for long-read sequencing workflows

        this is the entry point for the isoflow CLI
        and it is responsible for parsing the CLI arguments
        for each iso-tool:

        - iso-novel
        - iso-targets

        > version: {}
        > author: alejandro gonzales-irribarren, 2025
        > repository: github.com/alejandrogzi/isoflow

        for any bug, please open an issue on the repository.

        * to get help on the subcommands, run:
            isoflow <SUBCOMMAND> -- --help

        "#,
        env!("CARGO_PKG_VERSION")
    );

    eprintln!("{}", message);
}
