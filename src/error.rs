use std::path::PathBuf;
use thiserror::Error;

/// Failure to fetch one dealer page
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, TLS or body decoding failure
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The per-request timeout elapsed
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// The server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Failure to turn a page into vehicle records
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid {field} selector `{selector}`: {message}")]
    InvalidSelector {
        field: &'static str,
        selector: String,
        message: String,
    },
}

/// Snapshot file access errors
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// No snapshot has been written yet
    #[error("no snapshot at {0}")]
    NotFound(PathBuf),

    #[error("failed to read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write snapshot {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Email delivery errors
#[derive(Debug, Error)]
pub enum SendError {
    #[error("email transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("email API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },
}

/// Errors raised while loading configuration at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),

    #[error("site `{location}` has an invalid URL `{url}`: {source}")]
    InvalidUrl {
        location: String,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("site `{location}`: {source}")]
    InvalidSelector {
        location: String,
        #[source]
        source: ParseError,
    },

    #[error("duplicate site location `{0}`")]
    DuplicateLocation(String),

    #[error("interval_secs must be greater than zero")]
    ZeroInterval,

    #[error("request_timeout_secs must be greater than zero")]
    ZeroTimeout,
}
