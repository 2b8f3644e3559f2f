//! Local filesystem listing
//!
//! Directories are listed in name order. Recursive listings walk depth-first
//! and emit files only; symlinked directories are reported but never entered,
//! so link cycles cannot make the walk loop.

use std::fs::Metadata;
use std::io;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use jiff::Timestamp;
use tokio::fs;

use crate::classify::{EntryError, is_symlink_loop};
use crate::entry::{Entry, QueriedRoot};
use crate::error::{Error, Result};
use crate::traits::{ListItem, ListOptions, ListingSource, RootResolver};

/// Listing source and root resolver for a local path
#[derive(Debug, Clone)]
pub struct LocalFs {
    root: PathBuf,
}

impl LocalFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl RootResolver for LocalFs {
    async fn resolve(&self, location: &str) -> Result<QueriedRoot> {
        let metadata = fs::metadata(location).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::NotFound(location.to_string()),
            _ => Error::Io(e),
        })?;

        let mut path = location.to_string();
        if metadata.is_dir() && !path.ends_with(std::path::is_separator) {
            path.push(MAIN_SEPARATOR);
        }
        Ok(entry_from(path, &metadata))
    }
}

impl ListingSource for LocalFs {
    fn list(&self, options: ListOptions) -> BoxStream<'_, ListItem> {
        let walk = Walk::new(self.root.clone(), options.recursive);
        stream::unfold(walk, |mut walk| async move {
            let item = walk.next_item().await?;
            Some((item, walk))
        })
        .boxed()
    }
}

enum Pending {
    Visit(PathBuf),
    Failed(EntryError),
}

struct Walk {
    start: Option<PathBuf>,
    // Reversed: the next item to visit is on top.
    stack: Vec<Pending>,
    recursive: bool,
}

impl Walk {
    fn new(root: PathBuf, recursive: bool) -> Self {
        Self {
            start: Some(root),
            stack: Vec::new(),
            recursive,
        }
    }

    async fn next_item(&mut self) -> Option<ListItem> {
        if let Some(root) = self.start.take() {
            match fs::metadata(&root).await {
                Ok(metadata) if metadata.is_dir() => {
                    if let Err(e) = self.push_children(&root).await {
                        return Some(Err(e));
                    }
                }
                Ok(metadata) => return Some(Ok(entry_from(display(&root), &metadata))),
                Err(e) => return Some(Err(io_error(&root, e))),
            }
        }

        while let Some(pending) = self.stack.pop() {
            let path = match pending {
                Pending::Visit(path) => path,
                Pending::Failed(e) => return Some(Err(e)),
            };

            let (metadata, is_link) = match stat(&path).await {
                Ok(stat) => stat,
                Err(e) => return Some(Err(e)),
            };

            if self.recursive && metadata.is_dir() && !is_link {
                if let Err(e) = self.push_children(&path).await {
                    return Some(Err(e));
                }
                continue;
            }

            return Some(Ok(entry_from(display(&path), &metadata)));
        }

        None
    }

    async fn push_children(&mut self, dir: &Path) -> std::result::Result<(), EntryError> {
        let mut read_dir = fs::read_dir(dir).await.map_err(|e| io_error(dir, e))?;
        let mut children = Vec::new();
        let mut failures = Vec::new();
        loop {
            match read_dir.next_entry().await {
                Ok(Some(child)) => children.push(child.path()),
                Ok(None) => break,
                Err(e) => {
                    failures.push(Pending::Failed(io_error(dir, e)));
                    break;
                }
            }
        }
        children.sort();

        self.stack.extend(failures);
        self.stack
            .extend(children.into_iter().rev().map(Pending::Visit));
        Ok(())
    }
}

/// Metadata of `path`, following symlinks; the flag tells whether it was one
async fn stat(path: &Path) -> std::result::Result<(Metadata, bool), EntryError> {
    let link_metadata = fs::symlink_metadata(path)
        .await
        .map_err(|e| io_error(path, e))?;
    if !link_metadata.file_type().is_symlink() {
        return Ok((link_metadata, false));
    }

    match fs::metadata(path).await {
        Ok(metadata) => Ok((metadata, true)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(EntryError::BrokenSymlink {
            path: display(path),
        }),
        Err(e) if is_symlink_loop(&e) => Err(EntryError::TooManySymlinkLevels {
            path: display(path),
        }),
        Err(e) => Err(io_error(path, e)),
    }
}

fn entry_from(path: String, metadata: &Metadata) -> Entry {
    let is_dir = metadata.is_dir();
    Entry {
        path,
        is_dir,
        size: if is_dir { 0 } else { metadata.len() },
        modified: metadata
            .modified()
            .ok()
            .and_then(|t| Timestamp::try_from(t).ok())
            .unwrap_or(Timestamp::UNIX_EPOCH),
        separator: MAIN_SEPARATOR,
    }
}

fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn io_error(path: &Path, err: io::Error) -> EntryError {
    EntryError::io(display(path), err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{ErrorCategory, classify};
    use crate::trim::Trimmer;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.txt"), b"hello").unwrap();
        std::fs::write(dir.path().join("a.txt"), b"").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("c.txt"), b"abc").unwrap();
        dir
    }

    async fn collect(fs: &LocalFs, recursive: bool) -> Vec<ListItem> {
        fs.list(ListOptions {
            recursive,
            include_incomplete: false,
        })
        .collect()
        .await
    }

    async fn relative_keys(dir: &TempDir, recursive: bool) -> Vec<String> {
        let location = dir.path().to_string_lossy().into_owned();
        let local = LocalFs::new(dir.path());
        let root = local.resolve(&location).await.unwrap();
        let trimmer = Trimmer::new(&root);
        collect(&local, recursive)
            .await
            .into_iter()
            .map(|item| trimmer.trim(&item.unwrap()))
            .collect()
    }

    #[tokio::test]
    async fn test_resolve_directory_appends_separator() {
        let dir = fixture();
        let location = dir.path().to_string_lossy().into_owned();
        let root = LocalFs::new(dir.path()).resolve(&location).await.unwrap();
        assert!(root.is_dir);
        assert!(root.path.ends_with(MAIN_SEPARATOR));
        assert_eq!(root.separator, MAIN_SEPARATOR);
    }

    #[tokio::test]
    async fn test_resolve_file() {
        let dir = fixture();
        let file = dir.path().join("b.txt");
        let location = file.to_string_lossy().into_owned();
        let root = LocalFs::new(&file).resolve(&location).await.unwrap();
        assert!(!root.is_dir);
        assert_eq!(root.size, 5);
        assert_eq!(root.path, location);
    }

    #[tokio::test]
    async fn test_resolve_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        let location = missing.to_string_lossy().into_owned();
        let err = LocalFs::new(&missing).resolve(&location).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_sorted_non_recursive() {
        let dir = fixture();
        let keys = relative_keys(&dir, false).await;
        assert_eq!(keys, vec!["a.txt", "b.txt", "sub"]);
    }

    #[tokio::test]
    async fn test_list_recursive_emits_files_depth_first() {
        let dir = fixture();
        let keys = relative_keys(&dir, true).await;
        let expected_nested = format!("sub{MAIN_SEPARATOR}c.txt");
        assert_eq!(keys, vec!["a.txt".to_string(), "b.txt".to_string(), expected_nested]);
    }

    #[tokio::test]
    async fn test_list_single_file() {
        let dir = fixture();
        let file = dir.path().join("b.txt");
        let items = collect(&LocalFs::new(&file), false).await;
        assert_eq!(items.len(), 1);
        let entry = items.into_iter().next().unwrap().unwrap();
        assert_eq!(entry.size, 5);
        assert!(!entry.is_dir);
    }

    #[tokio::test]
    async fn test_list_missing_root_yields_error_item() {
        let dir = TempDir::new().unwrap();
        let items = collect(&LocalFs::new(dir.path().join("gone")), false).await;
        assert_eq!(items.len(), 1);
        let err = items.into_iter().next().unwrap().unwrap_err();
        assert_eq!(classify(&err), ErrorCategory::PathNotFound);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_broken_symlink_is_reported_and_listing_continues() {
        let dir = fixture();
        std::os::unix::fs::symlink(dir.path().join("nowhere"), dir.path().join("dangling"))
            .unwrap();

        let items = collect(&LocalFs::new(dir.path()), false).await;
        assert_eq!(items.len(), 4);
        let categories: Vec<Option<ErrorCategory>> = items
            .iter()
            .map(|item| item.as_ref().err().map(classify))
            .collect();
        assert_eq!(
            categories,
            vec![None, None, Some(ErrorCategory::BrokenLink), None]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_loop_is_reported() {
        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(dir.path().join("b"), dir.path().join("a")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("a"), dir.path().join("b")).unwrap();

        let items = collect(&LocalFs::new(dir.path()), true).await;
        assert_eq!(items.len(), 2);
        for item in &items {
            let err = item.as_ref().unwrap_err();
            assert_eq!(classify(err), ErrorCategory::TooManySymlinkLevels);
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_recursive_does_not_follow_directory_links() {
        let dir = fixture();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("sub").join("up")).unwrap();

        let keys = relative_keys(&dir, true).await;
        let link = format!("sub{MAIN_SEPARATOR}up");
        assert!(keys.contains(&link));
        assert_eq!(keys.len(), 4);
    }
}
