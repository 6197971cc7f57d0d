use thiserror::Error;

/*-------------------------------------------------------------------------------------------------
  Errors and Results
-------------------------------------------------------------------------------------------------*/

// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the query-and-render pipeline. Every error aborts the operation that
/// raised it; nothing is written to the output sink on failure.
#[derive(Debug, Error)]
pub enum Error {
    /// The IP ranges document is missing required structure.
    #[error("malformed IP ranges document: {0}")]
    MalformedDocument(String),

    /// An unknown prefix match mode was requested.
    #[error("unsupported prefix match mode: {0:?} (expected prefix, substr, or regex)")]
    UnsupportedMatchMode(String),

    /// The prefix pattern is not a valid regular expression.
    #[error("invalid prefix pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// An unknown output format code was requested.
    #[error("unsupported output format: {0:?}")]
    UnsupportedFormat(String),

    /// A formatter received input it cannot render.
    #[error("the {0} format only renders IP range data")]
    InvalidInput(&'static str),

    /// An operation was invoked on render data of the wrong shape.
    #[error("{0} is only valid for IP range data")]
    InvalidOperation(&'static str),

    /// A service has no entry in the destination port table.
    #[error("no destination ports defined for service {0:?}")]
    UnknownService(String),

    /// The format code is reserved but has no implementation yet.
    #[error("the {0} format is not implemented")]
    NotImplemented(&'static str),

    #[error("failed to retrieve the IP ranges: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON rendering failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML rendering failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
}
