use std::collections::BTreeMap;

use csv::StringRecord;
use jiff::civil::Date;

use crate::{error::LoadError, store::MAX_ROWS_PER_INSERT};

/// Columns the loader transforms. Everything else is carried in `Title::fields`.
pub const TITLE: &str = "title";
pub const DURATION: &str = "duration";
pub const DATE_ADDED: &str = "date_added";
pub const RELEASE_YEAR: &str = "release_year";

pub const MAX_BATCH_SIZE: usize = MAX_ROWS_PER_INSERT;
pub const MAX_IN_FLIGHT: usize = 64;
/// Upper bound on titles buffered between the CSV reader and the writers.
pub const MAX_CHANNEL_CAPACITY: usize = 65_536;

pub const REQUIRED_COLUMNS: [&str; 4] = [TITLE, DURATION, DATE_ADDED, RELEASE_YEAR];

/// One CSV row as column name -> raw string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRow(BTreeMap<String, String>);

impl RawRow {
    pub fn from_record(headers: &StringRecord, record: &StringRecord) -> Self {
        Self(headers.iter().zip(record.iter()).map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(String::as_str)
    }

    /// Columns other than the transformed ones.
    pub fn passthrough(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .filter(|(k, _)| !REQUIRED_COLUMNS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Title {
    pub title: String,
    /// Minutes. Seasons are approximated, see `transform::MINUTES_PER_SEASON`.
    pub duration: i32,
    pub date_added: Option<Date>,
    pub release_year: i32,
    /// Years between release and the load that produced this record.
    pub content_age: i32,
    pub fields: BTreeMap<String, String>,
}

impl Title {
    pub fn kind(&self) -> Option<&str> {
        self.fields.get("type").map(String::as_str).filter(|s| !s.is_empty())
    }
}

/// A title as read back from the store.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredTitle {
    pub id: i32,
    pub title: Title,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum InvalidRowPolicy {
    #[default]
    Skip,
    Abort,
}

impl std::str::FromStr for InvalidRowPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "abort" => Ok(Self::Abort),
            other => anyhow::bail!("unknown invalid-row policy {other:?}, expected skip or abort"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct LoadOptions {
    pub batch_size: usize,
    pub max_in_flight: usize,
    pub invalid_rows: InvalidRowPolicy,
    pub current_year: i32,
}

impl LoadOptions {
    pub fn for_year(current_year: i32) -> Self {
        Self { batch_size: 100, max_in_flight: 4, invalid_rows: InvalidRowPolicy::Skip, current_year }
    }

    /// Checks the write settings and returns the reader-to-writer channel size.
    pub fn channel_capacity(&self) -> Result<usize, LoadError> {
        if !(1..=MAX_BATCH_SIZE).contains(&self.batch_size) {
            return Err(LoadError::InvalidOptions(format!(
                "batch size {} must be between 1 and {MAX_BATCH_SIZE}",
                self.batch_size
            )));
        }
        if !(1..=MAX_IN_FLIGHT).contains(&self.max_in_flight) {
            return Err(LoadError::InvalidOptions(format!(
                "max in-flight batches {} must be between 1 and {MAX_IN_FLIGHT}",
                self.max_in_flight
            )));
        }
        self.batch_size
            .checked_mul(self.max_in_flight)
            .map(|n| n.min(MAX_CHANNEL_CAPACITY))
            .ok_or_else(|| LoadError::InvalidOptions("channel capacity overflows".to_string()))
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LoadReport {
    pub cleared: u64,
    pub rows_read: usize,
    pub inserted: usize,
    pub rejected: usize,
}
