use clap::{ArgAction, Parser};
use config::{ArgCheck, IsoError, DEFAULT_WORKDIR, YAML_EXTENSIONS};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(
        short = 'c',
        long = "config",
        required = true,
        value_name = "PATH",
        help = "Path to workflow config YAML [must define 'sampletable']"
    )]
    pub config: PathBuf,

    #[arg(
        short = 'p',
        long = "patterns",
        required = true,
        value_name = "PATH",
        help = "Path to patterns YAML with filename templates"
    )]
    pub patterns: PathBuf,

    #[arg(
        short = 'w',
        long = "workdir",
        required = false,
        value_name = "DIR",
        default_value = DEFAULT_WORKDIR,
        help = "Workflow directory used to resolve a relative sample table path"
    )]
    pub workdir: PathBuf,

    #[arg(
        short = 'o',
        long = "output",
        required = false,
        value_name = "PATH",
        help = "Write targets to this file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'f',
        long = "flatten",
        help = "Print every target path on its own line instead of JSON",
        action = ArgAction::SetTrue
    )]
    pub flatten: bool,
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
        if !self.workdir.is_dir() {
            return Err(IsoError::InvalidInput(format!(
                "ERROR: workdir {:?} is not a directory",
                self.workdir
            )));
        }

        for input in self.get_inputs() {
            config::validate(input, self.get_extensions())?;
        }

        Ok(())
    }

    fn get_inputs(&self) -> Vec<&PathBuf> {
        vec![&self.config, &self.patterns]
    }

    fn get_extensions(&self) -> &[&str] {
        &YAML_EXTENSIONS
    }
}
