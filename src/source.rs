use std::{fs::File, io::Read, path::Path};

use csv::StringRecord;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{
    error::{LoadError, TransformError},
    models::{InvalidRowPolicy, REQUIRED_COLUMNS, RawRow, Title},
    transform,
};

/// Row counts from one pass over a source.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ExtractSummary {
    pub rows_read: usize,
    pub rejected: usize,
}

/// A CSV file of catalog titles whose header has been checked.
pub struct TitleSource<R> {
    reader: csv::Reader<R>,
    headers: StringRecord,
}

impl TitleSource<File> {
    pub fn open(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path)
            .map_err(|source| LoadError::Open { path: path.to_path_buf(), source })?;
        Self::from_reader(file)
    }
}

impl<R: Read> TitleSource<R> {
    pub fn from_reader(reader: R) -> Result<Self, LoadError> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers: StringRecord = reader.headers()?.iter().map(normalize_header).collect();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(LoadError::MissingColumn(column));
            }
        }

        Ok(Self { reader, headers })
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    /// Yields `(line, row)` lazily; lines are 1-based and count the header.
    pub fn rows(self) -> impl Iterator<Item = (usize, Result<RawRow, csv::Error>)> {
        let headers = self.headers;
        self.reader.into_records().enumerate().map(move |(idx, record)| {
            let line = record.as_ref().ok().and_then(|r| r.position()).map_or(idx + 2, |p| p.line() as usize);
            (line, record.map(|r| RawRow::from_record(&headers, &r)))
        })
    }

    /// Transforms every row and pushes the results into `tx`, blocking while
    /// the channel is full. Runs on a blocking thread.
    pub fn send_titles(
        self,
        tx: mpsc::Sender<Title>,
        current_year: i32,
        policy: InvalidRowPolicy,
    ) -> Result<ExtractSummary, LoadError> {
        let mut summary = ExtractSummary::default();

        for (line, record) in self.rows() {
            summary.rows_read += 1;

            let outcome = record
                .map_err(TransformError::from)
                .and_then(|row| transform::transform_row(&row, current_year));

            match outcome {
                Ok(title) => {
                    if tx.blocking_send(title).is_err() {
                        debug!(line, "title consumer went away, stopping reader");
                        break;
                    }
                },
                Err(err) => match policy {
                    InvalidRowPolicy::Skip => {
                        warn!(line, error = %err, "skipping invalid row");
                        summary.rejected += 1;
                    },
                    InvalidRowPolicy::Abort => {
                        return Err(LoadError::InvalidRow { line, source: err });
                    },
                },
            }
        }

        Ok(summary)
    }
}

fn normalize_header(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').to_string()
}
