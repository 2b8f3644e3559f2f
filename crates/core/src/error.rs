//! Error types for stls-core
//!
//! `Error` is the fatal error type: anything that stops a command outright,
//! including failure to resolve the queried root. Per-entry listing failures
//! are never fatal and use [`crate::classify::EntryError`] instead.

use thiserror::Error;

/// Result type alias for stls-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for stls-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid path format
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Alias not found
    #[error("Alias not found: {0}")]
    AliasNotFound(String),

    /// Alias already exists
    #[error("Alias already exists: {0}")]
    AliasExists(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network error (retryable)
    #[error("Network error: {0}")]
    Network(String),

    /// The queried location could not be resolved to a file or directory
    #[error("Unable to resolve '{location}': {source}")]
    RootResolution {
        location: String,
        #[source]
        source: Box<Error>,
    },

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Attach the queried location to a resolution failure.
    pub fn root_resolution(location: impl Into<String>, source: Error) -> Self {
        Error::RootResolution {
            location: location.into(),
            source: Box::new(source),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidPath(_) => 2,                        // UsageError
            Error::Config(_) => 2,                             // UsageError
            Error::InvalidUrl(_) => 2,                         // UsageError
            Error::Network(_) => 3,                            // NetworkError
            Error::Auth(_) => 4,                               // AuthError
            Error::NotFound(_) | Error::AliasNotFound(_) => 5, // NotFound
            Error::AliasExists(_) => 6,                        // Conflict
            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => 5,
                std::io::ErrorKind::PermissionDenied => 4,
                _ => 1,
            },
            Error::RootResolution { source, .. } => source.exit_code(),
            _ => 1, // GeneralError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::InvalidPath("test".into()).exit_code(), 2);
        assert_eq!(Error::Config("test".into()).exit_code(), 2);
        assert_eq!(Error::Network("test".into()).exit_code(), 3);
        assert_eq!(Error::Auth("test".into()).exit_code(), 4);
        assert_eq!(Error::NotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::AliasNotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::AliasExists("test".into()).exit_code(), 6);
        assert_eq!(Error::General("test".into()).exit_code(), 1);
    }

    #[test]
    fn test_io_error_exit_codes() {
        let err = Error::from(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(err.exit_code(), 5);

        let err = Error::from(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_root_resolution_keeps_location_and_code() {
        let err = Error::root_resolution("/missing/dir", Error::NotFound("/missing/dir".into()));
        assert_eq!(err.exit_code(), 5);
        let msg = err.to_string();
        assert!(msg.contains("/missing/dir"));
        assert!(msg.starts_with("Unable to resolve"));
    }

    #[test]
    fn test_error_display() {
        let err = Error::AliasNotFound("minio".into());
        assert_eq!(err.to_string(), "Alias not found: minio");

        let err = Error::InvalidPath("/bad/path".into());
        assert_eq!(err.to_string(), "Invalid path: /bad/path");
    }
}
