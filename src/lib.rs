//! Household budget turns the operations of a shared household budget into
//! financial summaries and chart-ready datasets.
//!
//! The core of the library is [aggregation]: pure functions that total
//! operations, order them by recency, bucket them by month and break down the
//! current month's expenses by category. Around it sit [intake], which
//! validates operation lists exported from the budget service, [report],
//! which renders the derived values as a static HTML dashboard, and [export],
//! which writes the monthly series as CSV.

#![warn(missing_docs)]

pub mod aggregation;
mod charts;
pub mod config;
pub mod export;
mod html;
pub mod intake;
pub mod month;
pub mod operation;
pub mod report;
pub mod timezone;

pub use config::ReportConfig;
pub use intake::{IntakePolicy, IntakeReport, MalformedOperation, MalformedReason};
pub use operation::{Category, Member, Operation, OperationKind};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An operation record failed validation and the intake policy does not
    /// allow skipping it.
    #[error(transparent)]
    MalformedOperation(#[from] MalformedOperation),

    /// The input was not valid JSON, or not a list of operations.
    #[error("could not parse the operations JSON: {0}")]
    InvalidJson(String),

    /// A file could not be read or written.
    ///
    /// Callers should pass in the path and the original error as a string.
    #[error("I/O error: {0}")]
    Io(String),

    /// The CSV export could not be written.
    #[error("could not write CSV: {0}")]
    CsvError(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::InvalidJson(value.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        tracing::error!("an unhandled CSV error occurred: {}", value);
        Error::CsvError(value.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value.to_string())
    }
}
