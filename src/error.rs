use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueryError>;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("No data available: {0}")]
    NoData(&'static str),

    #[error("Invalid date '{0}': expected a zero-padded YYYY-MM-DD date")]
    InvalidDate(String),

    #[error("Stored date '{0}' is not a valid YYYY-MM-DD date")]
    CorruptDate(String),

    #[error("Date {0} has no date 365 days before it")]
    DateOutOfRange(NaiveDate),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

