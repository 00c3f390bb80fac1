//! Core module for resolving workflow targets
//! Alejandro Gonzales-Irribarren, 2025
//!
//! `SeqConfig` takes care of the common tasks around a workflow's
//! config and patterns files: it reads the config, loads the sample
//! table it points to, merges both into a fill context and expands the
//! pattern templates into the concrete targets a workflow engine has
//! to build. Construction either succeeds completely or returns the
//! first error; there is no partially built object.

use anyhow::Result;
use config::{IndexCol, IsoError, Table, RUN, SAMPLE, SAMPLETABLE};
use log::{info, warn};
use serde_yaml::{Mapping, Value};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::cli::Args;
use crate::expand::{fill_patterns, TargetMap};
use crate::fill::FillContext;
use crate::utils::{load_mapping, load_yaml};

const INLINE_CONFIG: &str = "<inline config>";

#[derive(Debug, Clone)]
pub struct SeqConfig {
    config: Mapping,
    sampletable: Table,
    runs: Vec<String>,
    samples: Vec<String>,
    patterns: Value,
    fill: FillContext,
    targets: TargetMap,
}

impl SeqConfig {
    /// read config and patterns from disk; the sample table path is
    /// resolved against `workdir` when relative
    pub fn new<C, P, W>(config: C, patterns: P, workdir: W) -> Result<Self, IsoError>
    where
        C: AsRef<Path>,
        P: AsRef<Path>,
        W: AsRef<Path>,
    {
        let origin = config.as_ref();
        info!("INFO: loading workflow config from {:?}", origin);

        let config = load_mapping(origin)?;
        Self::build(config, origin, patterns.as_ref(), workdir.as_ref())
    }

    /// same as `new` for an already loaded config mapping
    pub fn from_config<P, W>(config: Mapping, patterns: P, workdir: W) -> Result<Self, IsoError>
    where
        P: AsRef<Path>,
        W: AsRef<Path>,
    {
        Self::build(
            config,
            Path::new(INLINE_CONFIG),
            patterns.as_ref(),
            workdir.as_ref(),
        )
    }

    fn build(
        config: Mapping,
        origin: &Path,
        patterns: &Path,
        workdir: &Path,
    ) -> Result<Self, IsoError> {
        let table_path = sampletable_path(&config, origin, workdir)?;
        info!("INFO: loading sample table from {:?}", table_path);

        let sampletable = Table::from_tsv(&table_path, IndexCol::Range)?;
        sampletable.require(&[RUN, SAMPLE])?;

        let runs = owned_column(&sampletable, RUN)?;
        let samples = owned_column(&sampletable, SAMPLE)?;

        info!("INFO: loading patterns from {:?}", patterns);
        let patterns = load_yaml(patterns)?;

        let fill = FillContext::new(&config, &sampletable);
        for key in fill.shadowed() {
            warn!(
                "WARN: sample table column '{}' overrides the config key of the same name",
                key
            );
        }

        let targets = fill_patterns(&patterns, &fill)?;
        info!(
            "INFO: {} runs, {} targets",
            runs.len(),
            targets.flatten().len()
        );

        Ok(Self {
            config,
            sampletable,
            runs,
            samples,
            patterns,
            fill,
            targets,
        })
    }

    pub fn config(&self) -> &Mapping {
        &self.config
    }

    pub fn sampletable(&self) -> &Table {
        &self.sampletable
    }

    /// `run` column in file order
    pub fn runs(&self) -> &[String] {
        &self.runs
    }

    /// `sample` column in file order
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn patterns(&self) -> &Value {
        &self.patterns
    }

    pub fn fill(&self) -> &FillContext {
        &self.fill
    }

    pub fn targets(&self) -> &TargetMap {
        &self.targets
    }
}

fn sampletable_path(config: &Mapping, origin: &Path, workdir: &Path) -> Result<PathBuf, IsoError> {
    let value = config.get(SAMPLETABLE).ok_or_else(|| {
        IsoError::schema(origin, format!("missing required key '{}'", SAMPLETABLE))
    })?;

    let raw = value.as_str().ok_or_else(|| {
        IsoError::schema(origin, format!("'{}' must be a path string", SAMPLETABLE))
    })?;

    let path = PathBuf::from(raw);
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(workdir.join(path))
    }
}

fn owned_column(table: &Table, column: &str) -> Result<Vec<String>, IsoError> {
    table
        .column(column)
        .map(|values| values.into_iter().map(str::to_string).collect())
        .ok_or_else(|| IsoError::schema(table.source(), format!("missing column '{}'", column)))
}

/// resolve targets and write them as JSON or as a flat list
pub fn write_targets(args: Args) -> Result<TargetMap> {
    let seq = SeqConfig::new(&args.config, &args.patterns, &args.workdir)?;
    let targets = seq.targets().clone();

    let rendered = if args.flatten {
        let mut lines = targets.flatten().join("\n");
        lines.push('\n');
        lines
    } else {
        let mut json = serde_json::to_string_pretty(&targets)?;
        json.push('\n');
        json
    };

    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| IsoError::io(path, e))?;
            let mut writer = BufWriter::new(file);
            writer.write_all(rendered.as_bytes())?;
            writer.flush()?;
            info!("INFO: targets written to {:?}", path);
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(rendered.as_bytes())?;
            handle.flush()?;
        }
    }

    Ok(targets)
}
