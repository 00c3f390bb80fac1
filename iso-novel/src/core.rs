//! Core module for reporting novel genes in isoform classification tables
//! Alejandro Gonzales-Irribarren, 2025
//!
//! Reads a SQANTI-like classification table (one row per isoform,
//! first column as identifier), keeps the isoforms whose
//! `associated_gene` carries the novel-gene marker and reports their
//! identifiers in sorted order. Columns left without a single value
//! after the selection are dropped; surviving cells are untouched.

use anyhow::Result;
use config::{
    is_missing, write_lines, IndexCol, IsoError, Table, ASSOCIATED_GENE, NOVEL_MARKER,
    NOVEL_SUFFIX,
};
use log::info;

use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::cli::Args;

/// row predicate over the associated_gene field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NovelFilter {
    pub marker: String,
    pub exclude: Option<String>,
}

impl Default for NovelFilter {
    fn default() -> Self {
        Self {
            marker: NOVEL_MARKER.to_string(),
            exclude: None,
        }
    }
}

impl NovelFilter {
    pub fn new(marker: impl Into<String>, exclude: Option<String>) -> Self {
        Self {
            marker: marker.into(),
            exclude,
        }
    }

    /// literal, case-sensitive substring match; missing genes never match
    #[inline(always)]
    pub fn matches(&self, gene: &str) -> bool {
        if is_missing(gene) || !gene.contains(self.marker.as_str()) {
            return false;
        }

        match &self.exclude {
            Some(prefix) => !gene.contains(prefix.as_str()),
            None => true,
        }
    }
}

/// load a classification table and keep its novel-gene rows
pub fn load_and_filter<P: AsRef<Path>>(path: P) -> Result<Table, IsoError> {
    load_and_filter_with(path, &NovelFilter::default())
}

pub fn load_and_filter_with<P: AsRef<Path>>(
    path: P,
    filter: &NovelFilter,
) -> Result<Table, IsoError> {
    let table = Table::from_tsv(path, IndexCol::First)?;
    table.require(&[ASSOCIATED_GENE])?;

    let selected = table.select(ASSOCIATED_GENE, |gene| filter.matches(gene))?;
    info!(
        "INFO: {} of {} isoforms in {:?} match '{}'",
        selected.shape().0,
        table.shape().0,
        table.source(),
        filter.marker
    );

    Ok(selected.drop_empty_columns())
}

/// row identifiers in ascending lexicographic order
pub fn sorted_ids(table: &Table) -> Vec<String> {
    let mut ids = table.index().to_vec();
    ids.sort();
    ids
}

/// print the sorted identifiers to stdout, one per line
pub fn report(table: &Table) -> Result<Vec<String>, IsoError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    report_to(table, &mut handle).map_err(|e| IsoError::io("<stdout>", e))
}

pub fn report_to<W: Write>(table: &Table, writer: &mut W) -> std::io::Result<Vec<String>> {
    let ids = sorted_ids(table);
    write_lines(&ids, writer)?;
    Ok(ids)
}

/// filtered table name: <name>.novel.tsv, compression suffix dropped
pub fn output_name(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(name);
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);

    PathBuf::from(format!("{}.{}", stem, NOVEL_SUFFIX))
}

fn write_table(table: &Table, outdir: &Path) -> Result<PathBuf, IsoError> {
    create_dir_all(outdir).map_err(|e| IsoError::io(outdir, e))?;

    let path = outdir.join(output_name(table.source()));
    let file = File::create(&path).map_err(|e| IsoError::io(&path, e))?;
    table.write_tsv(BufWriter::new(file))?;

    Ok(path)
}

/// filter every classification table, report identifiers and shapes
pub fn find_novel_genes(args: Args) -> Result<Vec<Vec<String>>> {
    let filter = NovelFilter::new(args.marker, args.exclude);
    info!("INFO: running with filter {:?}", &filter);

    let mut reports = Vec::with_capacity(args.classification.len());

    for path in &args.classification {
        let table = load_and_filter_with(path, &filter)?;

        let (rows, cols) = table.shape();
        info!("INFO: {:?} -> shape ({}, {})", path, rows, cols);

        if let Some(outdir) = &args.outdir {
            let written = write_table(&table, outdir)?;
            info!("INFO: filtered table written to {:?}", written);
        }

        reports.push(report(&table)?);
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "isoform\tchrom\tstructural_category\tassociated_gene\tFL\tRTS_stage";

    fn classification(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix("_classification.txt")
            .tempfile()
            .unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file
    }

    #[test]
    fn test_filter_is_case_sensitive_substring() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "id\tassociated_gene\ng1\tnovel-unknown\ng2\tFBgn001\ng3\tNovel thing\n"
        )
        .unwrap();

        let table = load_and_filter(file.path()).unwrap();
        assert_eq!(table.index(), &["g1"]);
    }

    #[test]
    fn test_marker_is_not_a_regex() {
        let filter = NovelFilter::new("nov.l", None);
        assert!(!filter.matches("novel"));
        assert!(filter.matches("nov.lty"));
    }

    #[test]
    fn test_missing_gene_never_matches() {
        let filter = NovelFilter::new("NA", None);
        assert!(!filter.matches("NA"));
        assert!(!NovelFilter::default().matches(""));
    }

    #[test]
    fn test_exclude_prefix() {
        let filter = NovelFilter::new(NOVEL_MARKER, Some("FBgn".to_string()));
        assert!(filter.matches("novelGene_12"));
        assert!(!filter.matches("FBgn0031208_novel"));
        assert!(NovelFilter::default().matches("FBgn0031208_novel"));
    }

    #[test]
    fn test_drops_all_missing_columns_only() {
        let file = classification(&[
            "PB.1.1\tchr2L\tnovel_not_in_catalog\tnovelGene_1\t5\tNA",
            "PB.2.1\tchr2L\tfull-splice_match\tFBgn0031208\t10\tTRUE",
            "PB.3.1\tchr3R\tintergenic\tnovelGene_2\tNA\tNA",
        ]);

        let table = load_and_filter(file.path()).unwrap();
        assert_eq!(table.index(), &["PB.1.1", "PB.3.1"]);
        assert_eq!(
            table.columns(),
            &["chrom", "structural_category", "associated_gene", "FL"]
        );
        assert_eq!(table.get("PB.3.1", "FL"), Some("NA"));
        assert_eq!(table.shape(), (2, 4));
    }

    #[test]
    fn test_stray_quote_keeps_following_rows() {
        let file = classification(&[
            "PB.1.1\tchr2L\t\"5' fragment\tnovelGene_1\t5\tNA",
            "PB.2.1\tchr2L\tintergenic\tnovelGene_2\t3\tNA",
            "PB.3.1\tchr3R\tgenic\tFBgn0031208\t1\tNA",
        ]);

        let table = load_and_filter(file.path()).unwrap();
        assert_eq!(table.index(), &["PB.1.1", "PB.2.1"]);
        assert_eq!(
            table.get("PB.1.1", "structural_category"),
            Some("\"5' fragment")
        );
    }

    #[test]
    fn test_load_and_filter_is_idempotent() {
        let file = classification(&[
            "PB.9.1\tchrX\tantisense\tnovelGene_9\t1\tNA",
            "PB.4.2\tchr4\tgenic\tFBgn0002\t2\tNA",
        ]);

        let first = load_and_filter(file.path()).unwrap();
        let second = load_and_filter(file.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_associated_gene_is_schema_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "isoform\tchrom\nPB.1.1\tchr2L\n").unwrap();

        let err = load_and_filter(file.path()).unwrap_err();
        assert!(matches!(err, IsoError::Schema { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_and_filter("no/such/classification.txt").unwrap_err();
        assert!(matches!(err, IsoError::Io { .. }));
    }

    #[test]
    fn test_report_sorted_one_per_line() {
        let file = classification(&[
            "PB.10.1\tchr2L\tintergenic\tnovelGene_3\t1\tNA",
            "PB.1.1\tchr2L\tintergenic\tnovelGene_1\t1\tNA",
            "PB.2.1\tchr2L\tintergenic\tnovelGene_2\t1\tNA",
        ]);
        let table = load_and_filter(file.path()).unwrap();

        let mut out = Vec::new();
        let ids = report_to(&table, &mut out).unwrap();

        assert_eq!(ids, vec!["PB.1.1", "PB.10.1", "PB.2.1"]);
        assert_eq!(String::from_utf8(out).unwrap(), "PB.1.1\nPB.10.1\nPB.2.1\n");
    }

    #[test]
    fn test_output_name() {
        assert_eq!(
            output_name(Path::new("sqanti/w1118.collapsed_classification.txt")),
            PathBuf::from("w1118.collapsed_classification.novel.tsv")
        );
        assert_eq!(
            output_name(Path::new("w1118_classification.txt.gz")),
            PathBuf::from("w1118_classification.novel.tsv")
        );
    }
}
