use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Failure to obtain or parse the dataset. Fatal at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("fetching {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("fetching {url}: server answered {status}")]
    Status { url: String, status: u16 },

    #[error("reading {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing CSV")]
    Csv(#[from] csv::Error),

    #[error("parsing JSON")]
    Json(#[from] serde_json::Error),

    #[error("record {row} is not a JSON object")]
    NotAnObject { row: usize },

    #[error("record {row}: expected {expected} fields, saw {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("required column '{0}' is missing")]
    MissingColumn(String),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

// ---------------------------------------------------------------------------
// Numeric domains
// ---------------------------------------------------------------------------

/// Errors raised while deriving or using a numeric domain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// No row in scope carries a non-null value. Recoverable: callers keep
    /// their previous bounds.
    #[error("no non-null values of '{column}' in {scope}")]
    Empty { column: String, scope: String },

    /// The log-scale codec needs a strictly positive minimum.
    #[error("log-scale domain needs a positive minimum, got {min}")]
    Invalid { min: f64 },
}

/// Umbrella error for [`crate::pipeline::Dashboard::initialize`].
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
