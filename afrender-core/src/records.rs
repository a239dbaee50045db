//! Record source: identifiers read from a delimited table, in row order.
//!
//! Lines starting with the comment byte are skipped (including before the
//! header). Only whole-line comments are recognised.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::LoadError;
use crate::types::{Identifier, Record};

/// How to parse the input table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    /// Header name of the identifier column.
    pub column: String,
    pub delimiter: u8,
    pub comment: Option<u8>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            column: "uid".to_string(),
            delimiter: b'\t',
            comment: Some(b'#'),
        }
    }
}

/// Lazy iterator of [`Record`]s. Restart by opening the table again.
pub struct RecordSource<R: Read = File> {
    path: PathBuf,
    reader: csv::Reader<R>,
    column: usize,
    row: csv::StringRecord,
    next_index: usize,
}

impl RecordSource<File> {
    /// Open `path` and resolve the identifier column from its header.
    pub fn open(path: &Path, options: &TableOptions) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, path, options)
    }
}

impl<R: Read> RecordSource<R> {
    /// Build a source over any reader; `origin` is used in error messages.
    pub fn from_reader(reader: R, origin: &Path, options: &TableOptions) -> Result<Self, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .comment(options.comment)
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers = reader.headers().map_err(|source| LoadError::Csv {
            path: origin.to_path_buf(),
            source,
        })?;
        let column = headers
            .iter()
            .position(|h| h.trim() == options.column)
            .ok_or_else(|| LoadError::MissingColumn {
                path: origin.to_path_buf(),
                column: options.column.clone(),
                available: headers.iter().collect::<Vec<_>>().join(", "),
            })?;

        Ok(Self {
            path: origin.to_path_buf(),
            reader,
            column,
            row: csv::StringRecord::new(),
            next_index: 0,
        })
    }

}

impl<R: Read> Iterator for RecordSource<R> {
    type Item = Result<Record, LoadError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.row) {
            Ok(false) => None,
            Ok(true) => {
                let index = self.next_index;
                self.next_index += 1;
                // Blank cells stay records; the fetch stage rejects them.
                let value = self.row.get(self.column).unwrap_or("").trim();
                Some(Ok(Record {
                    index,
                    id: Identifier::from(value),
                }))
            }
            Err(source) => Some(Err(LoadError::Csv {
                path: self.path.clone(),
                source,
            })),
        }
    }
}

/// Read every record up front. Any malformed row fails the whole load.
pub fn load_records(path: &Path, options: &TableOptions) -> Result<Vec<Record>, LoadError> {
    RecordSource::open(path, options)?.collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn source(text: &str, options: &TableOptions) -> Result<Vec<Record>, LoadError> {
        RecordSource::from_reader(text.as_bytes(), Path::new("mem.tsv"), options)?.collect()
    }

    #[test]
    fn yields_rows_in_order_with_indexes() {
        let text = "uid\tname\nP12345\talpha\nQ9XYZ1\tbeta\n";
        let records = source(text, &TableOptions::default()).unwrap();
        assert_eq!(
            records,
            vec![
                Record { index: 0, id: Identifier::from("P12345") },
                Record { index: 1, id: Identifier::from("Q9XYZ1") },
            ]
        );
    }

    #[test]
    fn comment_lines_are_skipped_and_not_counted() {
        let text = "# exported 2025-06-15\nuid\n# note\nA1\nB2\n";
        let records = source(text, &TableOptions::default()).unwrap();
        let ids: Vec<_> = records.iter().map(|r| (r.index, r.id.as_str())).collect();
        assert_eq!(ids, vec![(0, "A1"), (1, "B2")]);
    }

    #[test]
    fn duplicates_are_kept() {
        let records = source("uid\nA\nA\n", &TableOptions::default()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, records[1].id);
    }

    #[test]
    fn missing_column_lists_available_headers() {
        let err = source("entry\tname\nA\tb\n", &TableOptions::default()).unwrap_err();
        match err {
            LoadError::MissingColumn { column, available, .. } => {
                assert_eq!(column, "uid");
                assert_eq!(available, "entry, name");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ragged_row_is_malformed() {
        let err = source("uid\tname\nA\tb\nB\n", &TableOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Csv { .. }));
    }

    #[test]
    fn blank_identifier_keeps_its_row() {
        let records = source("uid\tname\nA\tx\n \ty\nB\tz\n", &TableOptions::default()).unwrap();
        let ids: Vec<_> = records.iter().map(|r| (r.index, r.id.as_str())).collect();
        assert_eq!(ids, vec![(0, "A"), (1, ""), (2, "B")]);
    }

    #[rstest]
    #[case(b',', "uid,organism\nP1,human\n")]
    #[case(b';', "uid;organism\nP1;human\n")]
    #[case(b'\t', "uid\torganism\nP1\thuman\n")]
    fn delimiter_is_configurable(#[case] delimiter: u8, #[case] text: &str) {
        let options = TableOptions { delimiter, ..TableOptions::default() };
        let records = source(text, &options).unwrap();
        assert_eq!(records[0].id, Identifier::from("P1"));
    }

    #[test]
    fn column_name_is_configurable() {
        let options = TableOptions { column: "accession".to_string(), ..TableOptions::default() };
        let records = source("name\taccession\nfoo\tO00001\n", &options).unwrap();
        assert_eq!(records[0].id, Identifier::from("O00001"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load_records(&dir.path().join("absent.tsv"), &TableOptions::default())
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
