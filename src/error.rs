//! Application-wide error types.
//!
//! Library modules return the typed [`Error`] via `thiserror`; the CLI layer
//! wraps everything in `anyhow` for reporting.
//!
//! The taxonomy follows the load pipeline's failure model: duplicate keys are
//! *not* errors (the storage layer reports them as a typed skip), malformed
//! input is fatal, and I/O or database failures propagate unchanged.

use std::path::PathBuf;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A record that cannot be parsed into the expected shape.
    ///
    /// Fatal on purpose: a garbled source file aborts the run rather than
    /// silently loading corrupt rows.
    #[error("Malformed record in {path}: {message}")]
    Malformed { path: PathBuf, message: String },
}

impl Error {
    /// Create a malformed-record error.
    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display_names_file() {
        let err = Error::malformed("/data/log_data/2018-11-01-events.json", "line 4: bad ts");
        let msg = err.to_string();
        assert!(msg.contains("2018-11-01-events.json"));
        assert!(msg.contains("line 4"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
