//! Listed entries
//!
//! An [`Entry`] is one item handed over by a listing source. The core never
//! mutates an entry it receives; trimming derives a new one.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Separator used by object stores and unix filesystems
pub const SLASH: char = '/';

/// One listed item: a file or a folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Full path as reported by the backend, using backend-native separators
    pub path: String,

    /// Whether this is a directory/prefix
    pub is_dir: bool,

    /// Size in bytes (0 for directories)
    pub size: u64,

    /// Last modification instant
    pub modified: Timestamp,

    /// Path separator of the backend that produced this entry
    pub separator: char,
}

/// The directory or prefix a listing was invoked against.
///
/// Same shape as an [`Entry`]; its `is_dir` flag decides whether entries are
/// trimmed at all.
pub type QueriedRoot = Entry;

impl Entry {
    /// Create a new file entry with a `/` separator
    pub fn file(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
            size,
            modified: Timestamp::UNIX_EPOCH,
            separator: SLASH,
        }
    }

    /// Create a new directory entry with a `/` separator
    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
            size: 0,
            modified: Timestamp::UNIX_EPOCH,
            separator: SLASH,
        }
    }

    pub fn with_modified(mut self, modified: Timestamp) -> Self {
        self.modified = modified;
        self
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Copy of this entry pointing at a different path
    pub fn with_path(&self, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..self.clone()
        }
    }
}
