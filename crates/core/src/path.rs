//! Location parsing
//!
//! A location is either a remote path of the form `alias[/bucket[/key]]`,
//! where `alias` is a configured alias, or a local filesystem path.

use crate::alias::is_valid_alias_name;
use crate::error::{Error, Result};

/// A parsed remote location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePath {
    /// Alias name
    pub alias: String,
    /// Bucket name (empty for the alias root, where buckets are listed)
    pub bucket: String,
    /// Object key or prefix (empty for bucket root)
    pub key: String,
}

impl RemotePath {
    /// Create a new RemotePath
    pub fn new(
        alias: impl Into<String>,
        bucket: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            alias: alias.into(),
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Whether this points at the alias itself, above any bucket
    pub fn is_alias_root(&self) -> bool {
        self.bucket.is_empty()
    }

    /// Whether the key has directory semantics (empty or ending in `/`)
    pub fn is_dir(&self) -> bool {
        self.key.is_empty() || self.key.ends_with('/')
    }

    /// Backend path used for trimming: `/`, `/bucket/` or `/bucket/key`
    pub fn object_path(&self) -> String {
        if self.bucket.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/{}", self.bucket, self.key)
        }
    }
}

impl std::fmt::Display for RemotePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.bucket.is_empty(), self.key.is_empty()) {
            (true, _) => write!(f, "{}/", self.alias),
            (false, true) => write!(f, "{}/{}", self.alias, self.bucket),
            (false, false) => write!(f, "{}/{}/{}", self.alias, self.bucket, self.key),
        }
    }
}

/// Parsed location that can be either local or remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedPath {
    /// Local filesystem path, kept verbatim
    Local(String),
    /// Remote S3 path
    Remote(RemotePath),
}

impl ParsedPath {
    /// Check if this is a remote path
    pub fn is_remote(&self) -> bool {
        matches!(self, ParsedPath::Remote(_))
    }

    /// Check if this is a local path
    pub fn is_local(&self) -> bool {
        matches!(self, ParsedPath::Local(_))
    }

    /// Get the remote path if this is a remote path
    pub fn as_remote(&self) -> Option<&RemotePath> {
        match self {
            ParsedPath::Remote(p) => Some(p),
            ParsedPath::Local(_) => None,
        }
    }

    /// Get the local path if this is a local path
    pub fn as_local(&self) -> Option<&str> {
        match self {
            ParsedPath::Local(p) => Some(p),
            ParsedPath::Remote(_) => None,
        }
    }
}

/// Parse a location string
///
/// Local paths are anything that:
/// - Starts with / (absolute path)
/// - Starts with . (relative path such as ./ or ../)
/// - Starts with a Windows drive letter
/// - Does not begin with a known alias
pub fn parse_path(path: &str, is_alias: impl Fn(&str) -> bool) -> Result<ParsedPath> {
    if path.is_empty() {
        return Err(Error::InvalidPath("Path cannot be empty".into()));
    }

    if path.starts_with('/') || path.starts_with('.') || has_drive_prefix(path) {
        return Ok(ParsedPath::Local(path.to_string()));
    }

    let mut parts = path.splitn(3, '/');
    let alias = parts.next().unwrap_or_default();
    if !is_valid_alias_name(alias) || !is_alias(alias) {
        return Ok(ParsedPath::Local(path.to_string()));
    }

    let bucket = parts.next().unwrap_or_default();
    let key = parts.next().unwrap_or_default();
    if bucket.is_empty() && !key.is_empty() {
        return Err(Error::InvalidPath(format!(
            "Bucket name cannot be empty in '{path}'"
        )));
    }

    Ok(ParsedPath::Remote(RemotePath::new(alias, bucket, key)))
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(alias: &str) -> bool {
        alias == "minio"
    }

    #[test]
    fn test_parse_remote_path() {
        let path = parse_path("minio/bucket/file.txt", known).unwrap();
        assert!(path.is_remote());

        let remote = path.as_remote().unwrap();
        assert_eq!(remote.alias, "minio");
        assert_eq!(remote.bucket, "bucket");
        assert_eq!(remote.key, "file.txt");
        assert!(!remote.is_dir());
        assert_eq!(remote.object_path(), "/bucket/file.txt");
    }

    #[test]
    fn test_parse_remote_path_dir() {
        let path = parse_path("minio/bucket/dir/", known).unwrap();
        let remote = path.as_remote().unwrap();
        assert_eq!(remote.key, "dir/");
        assert!(remote.is_dir());
        assert_eq!(remote.object_path(), "/bucket/dir/");
    }

    #[test]
    fn test_parse_remote_path_bucket_only() {
        let path = parse_path("minio/bucket", known).unwrap();
        let remote = path.as_remote().unwrap();
        assert_eq!(remote.bucket, "bucket");
        assert_eq!(remote.key, "");
        assert!(remote.is_dir());
        assert_eq!(remote.object_path(), "/bucket/");
    }

    #[test]
    fn test_parse_alias_root() {
        for input in ["minio", "minio/"] {
            let remote = parse_path(input, known).unwrap().as_remote().cloned().unwrap();
            assert!(remote.is_alias_root());
            assert_eq!(remote.object_path(), "/");
            assert_eq!(remote.to_string(), "minio/");
        }
    }

    #[test]
    fn test_parse_empty_bucket_with_key() {
        assert!(parse_path("minio//key", known).is_err());
    }

    #[test]
    fn test_parse_local_paths() {
        for input in ["/home/user/file.txt", "./file.txt", "../dir", ".", "C:\\data"] {
            let path = parse_path(input, known).unwrap();
            assert!(path.is_local(), "{input}");
            assert_eq!(path.as_local(), Some(input));
        }
    }

    #[test]
    fn test_unknown_alias_is_local() {
        let path = parse_path("docs/readme.md", known).unwrap();
        assert_eq!(path.as_local(), Some("docs/readme.md"));
    }

    #[test]
    fn test_parse_empty_path() {
        assert!(parse_path("", known).is_err());
    }

    #[test]
    fn test_remote_path_display() {
        let path = RemotePath::new("minio", "bucket", "key/file.txt");
        assert_eq!(path.to_string(), "minio/bucket/key/file.txt");
    }
}
