use anyhow::Result;
use log::info;

use iso_novel::lib_iso_novel;
use iso_targets::lib_iso_targets;

/// iso-tools reachable from the isoflow entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Novel,
    Targets,
}

impl Tool {
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Novel => "iso-novel",
            Tool::Targets => "iso-targets",
        }
    }
}

/// forward the trailing arguments to the selected iso-tool
///
/// # Arguments
///
/// * `tool` - the iso-tool to run
/// * `args` - arguments as they would be given to the standalone binary
///
/// # Example
///
/// ```rust, no_run
/// use isoflow::{lib, Tool};
///
/// let args = vec![
///     "--classification".to_string(),
///     "w1118_testi1.collapsed_classification.txt".to_string(),
/// ];
///
/// lib(Tool::Novel, args).unwrap();
/// ```
pub fn lib(tool: Tool, args: Vec<String>) -> Result<()> {
    info!("INFO: running {} with args: {:?}", tool.name(), &args);

    match tool {
        Tool::Novel => {
            let reports = lib_iso_novel(args)?;
            let total = reports.iter().map(Vec::len).sum::<usize>();
            info!(
                "INFO: {} novel isoforms across {} table(s)",
                total,
                reports.len()
            );
        }
        Tool::Targets => {
            let targets = lib_iso_targets(args)?;
            info!("INFO: {} targets resolved", targets.flatten().len());
        }
    }

    Ok(())
}
