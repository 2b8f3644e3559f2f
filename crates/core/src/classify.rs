//! Per-entry listing failures
//!
//! Listing sources report failures for individual entries as [`EntryError`]
//! values inside the stream. [`classify`] maps every such error to exactly one
//! [`ErrorCategory`]; none of them is fatal to the listing as a whole.

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::DisplayRecord;

/// Raw failure reported by a listing source for one entry
#[derive(Error, Debug)]
pub enum EntryError {
    #[error("broken symbolic link: {path}")]
    BrokenSymlink { path: String },

    #[error("too many levels of symbolic links: {path}")]
    TooManySymlinkLevels { path: String },

    #[error("path not found: {path}")]
    PathNotFound { path: String },

    #[error("insufficient permission: {path}")]
    InsufficientPermission { path: String },

    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Error returned by a remote backend, with its service error code if any
    #[error("{message}")]
    Backend {
        code: Option<String>,
        message: String,
    },
}

impl EntryError {
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        EntryError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn backend(code: Option<&str>, message: impl Into<String>) -> Self {
        EntryError::Backend {
            code: code.map(str::to_string),
            message: message.into(),
        }
    }
}

/// Closed set of per-entry failure kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    BrokenLink,
    TooManySymlinkLevels,
    PathNotFound,
    InsufficientPermission,
    Other,
}

impl ErrorCategory {
    /// Message reported next to the failing entry
    pub const fn message(self) -> &'static str {
        match self {
            ErrorCategory::BrokenLink => "Unable to list broken link.",
            ErrorCategory::TooManySymlinkLevels => "Unable to list too many levels link.",
            ErrorCategory::PathNotFound
            | ErrorCategory::InsufficientPermission
            | ErrorCategory::Other => "Unable to list folder.",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorCategory::BrokenLink => "broken link",
            ErrorCategory::TooManySymlinkLevels => "too many symlink levels",
            ErrorCategory::PathNotFound => "path not found",
            ErrorCategory::InsufficientPermission => "insufficient permission",
            ErrorCategory::Other => "other",
        };
        f.write_str(name)
    }
}

/// Map a per-entry failure to its category. Total: unknown kinds are `Other`.
pub fn classify(error: &EntryError) -> ErrorCategory {
    match error {
        EntryError::BrokenSymlink { .. } => ErrorCategory::BrokenLink,
        EntryError::TooManySymlinkLevels { .. } => ErrorCategory::TooManySymlinkLevels,
        EntryError::PathNotFound { .. } => ErrorCategory::PathNotFound,
        EntryError::InsufficientPermission { .. } => ErrorCategory::InsufficientPermission,
        EntryError::Io { source, .. } => classify_io(source),
        EntryError::Backend { code, .. } => match code.as_deref() {
            Some("NoSuchKey" | "NoSuchBucket" | "NotFound") => ErrorCategory::PathNotFound,
            Some("AccessDenied" | "Forbidden" | "AllAccessDisabled") => {
                ErrorCategory::InsufficientPermission
            }
            _ => ErrorCategory::Other,
        },
    }
}

fn classify_io(err: &io::Error) -> ErrorCategory {
    if is_symlink_loop(err) {
        return ErrorCategory::TooManySymlinkLevels;
    }

    match err.kind() {
        io::ErrorKind::NotFound => ErrorCategory::PathNotFound,
        io::ErrorKind::PermissionDenied => ErrorCategory::InsufficientPermission,
        _ => ErrorCategory::Other,
    }
}

#[cfg(unix)]
pub(crate) fn is_symlink_loop(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::ELOOP)
}

#[cfg(not(unix))]
pub(crate) fn is_symlink_loop(_err: &io::Error) -> bool {
    false
}

/// Result of processing one listed item: a record or a classified failure
#[derive(Debug)]
pub enum ListingOutcome {
    Record(DisplayRecord),
    Failed {
        category: ErrorCategory,
        error: EntryError,
    },
}

impl ListingOutcome {
    pub fn failed(error: EntryError) -> Self {
        ListingOutcome::Failed {
            category: classify(&error),
            error,
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self, ListingOutcome::Record(_))
    }
}
