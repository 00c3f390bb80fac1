//! Tab-separated table model shared by the iso-tools
//! Alejandro Gonzales-Irribarren, 2025
//!
//! A `Table` keeps every cell as the raw string found in the file.
//! Missing values are never rewritten: whether a cell is missing
//! is decided by `is_missing` at the point where it matters (column
//! pruning, filtering), so selected rows always keep their original
//! values. Tables are either indexed by their first column (isoform
//! classification tables) or by row order (sample tables).

use csv::{QuoteStyle, ReaderBuilder, StringRecord, WriterBuilder};
use hashbrown::HashSet;

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{is_missing, open_reader, IsoError};

const TAB: u8 = b'\t';

/// how rows are identified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexCol {
    /// the first column holds the row identifier
    First,
    /// rows are identified by their 0-based position
    Range,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    source: PathBuf,
    mode: IndexCol,
    index_name: String,
    columns: Vec<String>,
    index: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// read a tab-separated file with a header row
    ///
    /// Quotes carry no meaning: a `"` is kept as part of its cell. Rows
    /// shorter than the header are padded with empty (missing) cells;
    /// rows longer than the header are a schema error.
    pub fn from_tsv<P: AsRef<Path>>(path: P, mode: IndexCol) -> Result<Self, IsoError> {
        let path = path.as_ref();
        let reader = open_reader(path)?;

        let mut rdr = ReaderBuilder::new()
            .delimiter(TAB)
            .has_headers(true)
            .quoting(false)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers().map_err(|e| csv_error(path, e))?.clone();
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(IsoError::schema(path, "missing header row"));
        }

        let (index_name, columns) = split_header(&headers, mode);
        check_duplicates(path, &columns)?;

        let mut index = Vec::new();
        let mut rows = Vec::new();

        let width = headers.len();
        for (n, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| csv_error(path, e))?;
            if record.len() > width {
                return Err(IsoError::schema(
                    path,
                    format!(
                        "row {} has {} fields, header has {}",
                        n + 1,
                        record.len(),
                        width
                    ),
                ));
            }

            let mut fields = record
                .iter()
                .map(str::to_string)
                .chain(std::iter::repeat(String::new()))
                .take(width);

            match mode {
                IndexCol::First => index.push(fields.next().unwrap_or_default()),
                IndexCol::Range => index.push(n.to_string()),
            }

            rows.push(fields.collect());
        }

        log::info!(
            "INFO: read {} rows x {} columns from {:?}",
            rows.len(),
            columns.len(),
            path
        );

        Ok(Self {
            source: path.to_path_buf(),
            mode,
            index_name,
            columns,
            index,
            rows,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// row identifiers, in file order
    pub fn index(&self) -> &[String] {
        &self.index
    }

    /// (rows, columns), index column excluded
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.position(column).is_some()
    }

    /// fail with a schema error naming every absent column
    pub fn require(&self, columns: &[&str]) -> Result<(), IsoError> {
        let missing = columns
            .iter()
            .filter(|c| !self.has_column(c))
            .map(|c| format!("'{}'", c))
            .collect::<Vec<_>>();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(IsoError::schema(
                &self.source,
                format!("missing required column(s) {}", missing.join(", ")),
            ))
        }
    }

    /// all values of a column, in row order
    pub fn column(&self, column: &str) -> Option<Vec<&str>> {
        let idx = self.position(column)?;
        Some(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// cell lookup by row identifier and column name
    pub fn get(&self, id: &str, column: &str) -> Option<&str> {
        let col = self.position(column)?;
        let row = self.index.iter().position(|i| i == id)?;
        Some(self.rows[row][col].as_str())
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.index
            .iter()
            .map(String::as_str)
            .zip(self.rows.iter().map(Vec::as_slice))
    }

    /// keep the rows whose value in `column` satisfies `keep`
    pub fn select<F>(&self, column: &str, keep: F) -> Result<Table, IsoError>
    where
        F: Fn(&str) -> bool,
    {
        let idx = self
            .position(column)
            .ok_or_else(|| IsoError::schema(&self.source, format!("missing column '{}'", column)))?;

        let (index, rows) = self
            .index
            .iter()
            .zip(self.rows.iter())
            .filter(|(_, row)| keep(&row[idx]))
            .map(|(id, row)| (id.clone(), row.clone()))
            .unzip();

        Ok(Table {
            source: self.source.clone(),
            mode: self.mode,
            index_name: self.index_name.clone(),
            columns: self.columns.clone(),
            index,
            rows,
        })
    }

    /// drop every column whose values are all missing
    pub fn drop_empty_columns(self) -> Table {
        let keep = (0..self.columns.len())
            .filter(|&c| self.rows.iter().any(|row| !is_missing(&row[c])))
            .collect::<Vec<_>>();

        if keep.len() == self.columns.len() {
            return self;
        }

        let dropped = self.columns.len() - keep.len();
        log::info!("INFO: dropping {} all-missing column(s)", dropped);

        let columns = keep.iter().map(|&c| self.columns[c].clone()).collect();
        let rows = self
            .rows
            .into_iter()
            .map(|row| keep.iter().map(|&c| row[c].clone()).collect())
            .collect();

        Table {
            source: self.source,
            mode: self.mode,
            index_name: self.index_name,
            columns,
            index: self.index,
            rows,
        }
    }

    /// every column as a (name, values) pair, in header order
    pub fn to_lists(&self) -> Vec<(String, Vec<String>)> {
        self.columns
            .iter()
            .enumerate()
            .map(|(c, name)| {
                let values = self.rows.iter().map(|row| row[c].clone()).collect();
                (name.clone(), values)
            })
            .collect()
    }

    pub fn write_tsv<W: Write>(&self, writer: W) -> Result<(), IsoError> {
        let mut wtr = WriterBuilder::new()
            .delimiter(TAB)
            .quote_style(QuoteStyle::Never)
            .from_writer(writer);
        let indexed = self.mode == IndexCol::First;

        let mut header = Vec::with_capacity(self.columns.len() + 1);
        if indexed {
            header.push(self.index_name.as_str());
        }
        header.extend(self.columns.iter().map(String::as_str));
        wtr.write_record(&header)
            .map_err(|e| csv_error(&self.source, e))?;

        for (id, row) in self.rows() {
            let mut record = Vec::with_capacity(row.len() + 1);
            if indexed {
                record.push(id);
            }
            record.extend(row.iter().map(String::as_str));
            wtr.write_record(&record)
                .map_err(|e| csv_error(&self.source, e))?;
        }

        wtr.flush().map_err(|e| IsoError::io(&self.source, e))
    }
}

fn split_header(headers: &StringRecord, mode: IndexCol) -> (String, Vec<String>) {
    let mut names = headers.iter().map(str::to_string);

    match mode {
        IndexCol::First => (names.next().unwrap_or_default(), names.collect()),
        IndexCol::Range => (String::new(), names.collect()),
    }
}

fn check_duplicates(path: &Path, columns: &[String]) -> Result<(), IsoError> {
    let mut seen = HashSet::new();
    for column in columns {
        if !seen.insert(column.as_str()) {
            return Err(IsoError::schema(
                path,
                format!("duplicate column '{}'", column),
            ));
        }
    }

    Ok(())
}

fn csv_error(path: &Path, err: csv::Error) -> IsoError {
    let msg = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => IsoError::io(path, e),
        _ => IsoError::schema(path, msg),
    }
}
