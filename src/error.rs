use chrono::{NaiveDate, Weekday};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Facility '{facility_id}' has invalid hours of operation on {day}: '{value}' is not a time of day")]
    InvalidHoursData { facility_id: String, day: Weekday, value: String },

    #[error("Facility '{facility_id}' has no open day within {days_scanned} days starting {start}")]
    NoOpenDayFound { facility_id: String, start: NaiveDate, days_scanned: u32 },

    #[error("Seed store '{path}' is unusable: {reason}")]
    SeedStoreError { path: String, reason: String },

    #[error("Facility record at position {index} has no facility_id")]
    MissingIdentifier { index: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
