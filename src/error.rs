// src/error.rs
//! Error taxonomy for fetching and extracting portal records.

use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Network or HTTP status failure from the transport, passed through untouched.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Login did not end in a redirect to a known post-login path.
    #[error("authentication failed (redirect location: {})", location.as_deref().unwrap_or("none"))]
    AuthenticationFailure { location: Option<String> },

    #[error("{record}: {label:?} is unrecognized")]
    UnrecognizedField { record: &'static str, label: String },

    #[error("{record}: {label:?} already set")]
    DuplicateField { record: &'static str, label: String },

    /// Composite or fixed-position cell text that does not have the expected shape.
    #[error("{record}: malformed cell at {position}: {reason} ({text:?})")]
    MalformedCell {
        record: &'static str,
        position: String,
        text: String,
        reason: &'static str,
    },

    /// A fragment held a different number of elements than the page layout implies.
    #[error("expected exactly one {selector:?}, found {count}")]
    MissingElement { selector: &'static str, count: usize },

    #[error("{record}: cannot parse date {text:?}")]
    InvalidDate { record: &'static str, text: String },

    #[error("date {date} is implausible relative to {reference}")]
    ImplausibleDate { date: NaiveDate, reference: NaiveDate },

    #[error("environment variable {0} must be set")]
    MissingEnv(&'static str),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("gave up after {0} redirects")]
    TooManyRedirects(usize),

    #[error("export failed: {0}")]
    Export(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScrapeError {
    /// Errors that lenient extraction downgrades to a logged warning.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScrapeError::UnrecognizedField { .. } | ScrapeError::MalformedCell { .. }
        )
    }
}
