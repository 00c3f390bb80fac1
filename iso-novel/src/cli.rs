use clap::Parser;
use config::{ArgCheck, IsoError, NOVEL_MARKER, TABLE_EXTENSIONS};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(
        short = 'c',
        long = "classification",
        required = true,
        value_name = "PATHS",
        value_delimiter = ',',
        num_args = 1..,
        help = "Paths to isoform classification table(s) delimited by comma"
    )]
    pub classification: Vec<PathBuf>,

    #[arg(
        short = 'm',
        long = "marker",
        required = false,
        value_name = "MARKER",
        default_value = NOVEL_MARKER,
        help = "Case-sensitive substring marking novel genes in associated_gene"
    )]
    pub marker: String,

    #[arg(
        short = 'x',
        long = "exclude",
        required = false,
        value_name = "PREFIX",
        help = "Also drop rows whose associated_gene contains this gene-id prefix [e.g. FBgn]"
    )]
    pub exclude: Option<String>,

    #[arg(
        short = 'o',
        long = "outdir",
        required = false,
        value_name = "PATH",
        help = "Output directory for the filtered tables [<name>.novel.tsv]"
    )]
    pub outdir: Option<PathBuf>,
}

impl Args {
    pub fn from(args: Vec<String>) -> Self {
        let mut full_args = vec![env!("CARGO_PKG_NAME").to_string()];
        full_args.extend(args);

        Args::parse_from(full_args)
    }
}

impl ArgCheck for Args {
    fn validate_args(&self) -> Result<(), IsoError> {
        if self.marker.is_empty() {
            return Err(IsoError::InvalidInput(
                "ERROR: --marker must not be empty".to_string(),
            ));
        }

        if matches!(&self.exclude, Some(x) if x.is_empty()) {
            return Err(IsoError::InvalidInput(
                "ERROR: --exclude must not be empty".to_string(),
            ));
        }

        for input in self.get_inputs() {
            config::validate(input, self.get_extensions())?;
        }

        Ok(())
    }

    fn get_inputs(&self) -> Vec<&PathBuf> {
        self.classification.iter().collect()
    }

    fn get_extensions(&self) -> &[&str] {
        &TABLE_EXTENSIONS
    }
}
