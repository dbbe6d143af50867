use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for all operations in the `mfr` application.
///
/// This enum uses `thiserror` to neatly wrap various kinds of errors that can occur,
/// from I/O issues to encoding resolution problems.
#[derive(Error, Debug)]
pub enum Error {
    /// An error related to file system I/O.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An encoding name (or code page) that is not in the codec table.
    ///
    /// This is fatal for the whole invocation: neither operation can proceed
    /// without a known read/write encoding.
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    /// Bytes that cannot be decoded under the resolved encoding.
    /// Recorded per file; the batch continues.
    #[error("{}: invalid byte sequence for {encoding}", .path.display())]
    Decode {
        path: PathBuf,
        encoding: &'static str,
    },

    /// Text containing characters the target encoding cannot represent.
    /// Recorded per file; the batch continues.
    #[error("{}: character not representable in {encoding}", .path.display())]
    Encode {
        path: PathBuf,
        encoding: &'static str,
    },

    /// A general configuration-related error (empty inputs, bad request).
    #[error("Config error: {0}")]
    Config(String),

    /// An error that occurred while parsing a YAML table or list file.
    #[error("Config parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An error from the `ignore` crate, which is used for directory traversal.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// An error that occurred while building the Rayon thread pool.
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// An error related to persisting a temporary file.
    #[error("Tempfile error: {0}")]
    TempFile(#[from] tempfile::PersistError),

    /// An error related to CSV report serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An error related to JSON report serialization.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, mfr::errors::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Config(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Config(s.to_string())
    }
}
