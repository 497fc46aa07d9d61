//! Defines the crate level error type.

use time::Month;

/// The errors that may occur while building dashboard metrics.
///
/// Only structurally invalid input produces an error. Missing display fields
/// and degenerate scopes (zero totals, single-month windows) are handled with
/// fallbacks and neutral results instead.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A month position does not refer to a slot in the series.
    #[error("month position {index} is outside the series of {len} months")]
    MonthOutOfRange {
        /// The requested position.
        index: usize,
        /// The number of slots in the series.
        len: usize,
    },

    /// The requested calendar month is not part of the series.
    #[error("{month} {year} is not part of the month series")]
    MonthNotInSeries {
        /// The requested year.
        year: i32,
        /// The requested month.
        month: Month,
    },

    /// The upstream payload contains the same calendar month more than once.
    ///
    /// This usually indicates a data-quality issue in the backend, so the
    /// series is rejected rather than picking one of the duplicates.
    #[error("{month} {year} appears more than once in the month series")]
    DuplicateMonth {
        /// The year of the duplicated month.
        year: i32,
        /// The duplicated month.
        month: Month,
    },

    /// Neither the short month code nor the month label could be parsed.
    #[error("could not parse a calendar month from \"{0}\"")]
    InvalidMonthCode(String),

    /// A metric record has no field that can be used as its entity key.
    #[error("a metric in {month} has no id, slug or name to key it by")]
    MissingEntityKey {
        /// The label of the month containing the record.
        month: String,
    },

    /// A calendar date could not be constructed.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// The canonical timezone name is not known.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// The number formatter rejected the currency symbol.
    #[error("\"{0}\" cannot be used as a currency symbol")]
    InvalidCurrencySymbol(String),

    /// The dimension name is not one of `category`, `merchant` or `bank`.
    #[error("unknown dimension \"{0}\", expected category, merchant or bank")]
    InvalidDimension(String),

    /// A JSON document could not be parsed.
    ///
    /// Callers should pass in the original error as a string.
    #[error("could not parse JSON: {0}")]
    InvalidPayload(String),

    /// A file could not be read.
    #[error("could not read {path}: {reason}")]
    Io {
        /// The path of the file.
        path: String,
        /// The underlying error message.
        reason: String,
    },
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::InvalidPayload(value.to_string())
    }
}

impl From<time::error::ComponentRange> for Error {
    fn from(value: time::error::ComponentRange) -> Self {
        Error::InvalidDate(value.to_string())
    }
}
