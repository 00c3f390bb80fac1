use flate2::read::MultiGzDecoder;

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use crate::IsoError;

/// argument validation
pub fn validate(arg: &PathBuf, extensions: &[&str]) -> Result<(), IsoError> {
    if !arg.exists() {
        return Err(IsoError::InvalidInput(format!(
            "ERROR: {:?} does not exist",
            arg
        )));
    }

    if !arg.is_file() {
        return Err(IsoError::InvalidInput(format!(
            "ERROR: {:?} is not a file",
            arg
        )));
    }

    match arg.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if extensions.contains(&ext) => (),
        _ => {
            return Err(IsoError::InvalidInput(format!(
                "ERROR: file {:?} has none of the expected extensions {:?}",
                arg, extensions
            )))
        }
    }

    match std::fs::metadata(arg) {
        Ok(metadata) if metadata.len() == 0 => Err(IsoError::InvalidInput(format!(
            "ERROR: file {:?} is empty",
            arg
        ))),
        Ok(_) => Ok(()),
        Err(e) => Err(IsoError::io(arg, e)),
    }
}

/// open a plain or gzip-compressed file for reading
pub fn open_reader<P: AsRef<Path>>(path: P) -> Result<Box<dyn Read>, IsoError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IsoError::io(path, e))?;

    match path.extension() {
        Some(ext) if ext == "gz" => Ok(Box::new(MultiGzDecoder::new(BufReader::new(file)))),
        _ => Ok(Box::new(BufReader::new(file))),
    }
}

/// read a whole file into a string
pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String, IsoError> {
    let path = path.as_ref();
    let mut contents = String::new();

    open_reader(path)?
        .read_to_string(&mut contents)
        .map_err(|e| IsoError::io(path, e))?;

    Ok(contents)
}

/// write a collection to any writer, one item per line
pub fn write_lines<W, T>(data: &[T], writer: &mut W) -> std::io::Result<()>
where
    W: Write,
    T: AsRef<str>,
{
    for line in data.iter() {
        writeln!(writer, "{}", line.as_ref())?;
    }

    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    #[test]
    fn test_validate_rejects_missing_and_empty_files() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.tsv");
        assert!(matches!(
            validate(&missing, &["tsv"]),
            Err(IsoError::InvalidInput(_))
        ));

        let empty = dir.path().join("empty.tsv");
        File::create(&empty).unwrap();
        assert!(validate(&empty, &["tsv"]).is_err());

        let wrong = dir.path().join("table.bed");
        std::fs::write(&wrong, "a\tb\n").unwrap();
        assert!(validate(&wrong, &["tsv"]).is_err());

        let good = dir.path().join("table.tsv");
        std::fs::write(&good, "a\tb\n").unwrap();
        assert!(validate(&good, &["tsv"]).is_ok());
    }

    #[test]
    fn test_open_reader_decompresses_gz() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.tsv.gz");

        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(b"id\tassociated_gene\n").unwrap();
        encoder.finish().unwrap();

        assert_eq!(read_to_string(&path).unwrap(), "id\tassociated_gene\n");
    }

    #[test]
    fn test_open_reader_missing_file_is_io_error() {
        let err = open_reader("definitely/not/here.tsv").err().unwrap();
        assert!(matches!(err, IsoError::Io { .. }));
    }

    #[test]
    fn test_write_lines_flushes_one_item_per_line() {
        let mut out = Vec::new();
        write_lines(&["a", "b"], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a\nb\n");
    }
}
