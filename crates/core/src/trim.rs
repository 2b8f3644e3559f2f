//! Relative display paths
//!
//! Listing sources report full backend paths (`/bucket/dir/sub/file.txt`).
//! For display, each entry is made relative to the parent of the queried
//! root: the root's path up to and including its last separator is removed.
//! With the usual directory roots (`/bucket/dir/`) that leaves the entry
//! relative to the root itself, while intermediate directories of recursive
//! listings stay visible (`sub/file.txt`).

use crate::entry::{Entry, QueriedRoot};

/// Trimming rule derived once from a queried root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trimmer {
    rule: Rule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Rule {
    /// Root is a single file: nothing to be relative to
    Passthrough,
    /// Root is the namespace top (`/`): drop it from the front
    Namespace(String),
    /// Drop a leading separator, then the root's parent prefix
    Parent { prefix: String },
}

impl Trimmer {
    pub fn new(root: &QueriedRoot) -> Self {
        let sep = root.separator;
        let rule = if !root.is_dir {
            Rule::Passthrough
        } else if root.path.len() == sep.len_utf8() && root.path.starts_with(sep) {
            Rule::Namespace(root.path.clone())
        } else {
            // A root without any separator has an empty parent prefix.
            let upto = root.path.rfind(sep).map_or(0, |idx| idx + sep.len_utf8());
            let parent = &root.path[..upto];
            let prefix = parent.strip_prefix(sep).unwrap_or(parent);
            Rule::Parent {
                prefix: prefix.to_string(),
            }
        };
        Self { rule }
    }

    /// Relative display path of `entry`
    pub fn trim(&self, entry: &Entry) -> String {
        match &self.rule {
            Rule::Passthrough => entry.path.clone(),
            Rule::Namespace(root) => strip(&entry.path, root).to_string(),
            Rule::Parent { prefix } => {
                let path = entry
                    .path
                    .strip_prefix(entry.separator)
                    .unwrap_or(&entry.path);
                strip(path, prefix).to_string()
            }
        }
    }

    /// New entry carrying the trimmed path; `entry` is left untouched
    pub fn trim_entry(&self, entry: &Entry) -> Entry {
        entry.with_path(self.trim(entry))
    }

    /// Whether entries pass through unchanged (the root is a file)
    pub fn is_passthrough(&self) -> bool {
        matches!(self.rule, Rule::Passthrough)
    }
}

/// Relative display path of `entry` with respect to `root`
pub fn trim(root: &QueriedRoot, entry: &Entry) -> String {
    Trimmer::new(root).trim(entry)
}

fn strip<'a>(path: &'a str, prefix: &str) -> &'a str {
    path.strip_prefix(prefix).unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(path: &str) -> QueriedRoot {
        Entry::dir(path)
    }

    #[test]
    fn test_file_root_passthrough() {
        let file_root = Entry::file("/bucket/report.csv", 10);
        for path in ["/bucket/report.csv", "other/x", "", "/"] {
            assert_eq!(trim(&file_root, &Entry::file(path, 1)), path);
        }
        assert!(Trimmer::new(&file_root).is_passthrough());
    }

    #[test]
    fn test_root_is_separator() {
        let r = root("/");
        assert_eq!(trim(&r, &Entry::file("/bucket/file.txt", 1)), "bucket/file.txt");
        assert_eq!(trim(&r, &Entry::dir("/bucket/")), "bucket/");
    }

    #[test]
    fn test_nested_recursive() {
        let entry = Entry::file("data/sub/file.txt", 1);
        assert_eq!(trim(&root("data/"), &entry), "sub/file.txt");
        assert_eq!(trim(&root("data/sub/"), &entry), "file.txt");
    }

    #[test]
    fn test_leading_separator_on_both_sides() {
        let r = root("/bucket/dir/");
        assert_eq!(trim(&r, &Entry::file("/bucket/dir/a.txt", 1)), "a.txt");
        assert_eq!(trim(&r, &Entry::file("/bucket/dir/sub/b.txt", 1)), "sub/b.txt");
        assert_eq!(trim(&r, &Entry::dir("/bucket/dir/sub/")), "sub/");
    }

    #[test]
    fn test_root_without_trailing_separator_keeps_own_name() {
        let r = root("/bucket/dir");
        assert_eq!(trim(&r, &Entry::file("/bucket/dir/a.txt", 1)), "dir/a.txt");
    }

    #[test]
    fn test_root_without_any_separator_acts_like_empty_root() {
        let entry = Entry::file("photos/cat.png", 1);
        assert_eq!(trim(&root("photos"), &entry), "photos/cat.png");
        assert_eq!(trim(&root(""), &entry), "photos/cat.png");

        let absolute = Entry::file("/photos/cat.png", 1);
        assert_eq!(
            trim(&root("photos"), &absolute),
            trim(&root(""), &absolute)
        );
    }

    #[test]
    fn test_unrelated_entry_left_unchanged() {
        let r = root("/bucket/dir/");
        assert_eq!(trim(&r, &Entry::file("elsewhere/x", 1)), "elsewhere/x");
    }

    #[test]
    fn test_trimming_is_idempotent() {
        let r = root("/bucket/dir/");
        let trimmer = Trimmer::new(&r);
        for path in ["/bucket/dir/a.txt", "/bucket/dir/sub/b.txt", "/bucket/dir/sub/"] {
            let once = trimmer.trim_entry(&Entry::file(path, 1));
            let twice = trimmer.trim(&once);
            assert_eq!(once.path, twice, "path {path}");
        }
    }

    #[test]
    fn test_backslash_backend() {
        let r = Entry::dir("C:\\data\\").with_separator('\\');
        let entry = Entry::file("C:\\data\\sub\\x.txt", 1).with_separator('\\');
        assert_eq!(trim(&r, &entry), "sub\\x.txt");

        let top = Entry::dir("\\").with_separator('\\');
        let entry = Entry::file("\\logs\\app.log", 1).with_separator('\\');
        assert_eq!(trim(&top, &entry), "logs\\app.log");
    }

    #[test]
    fn test_trim_entry_does_not_mutate_input() {
        let r = root("/bucket/");
        let entry = Entry::file("/bucket/a.txt", 5);
        let trimmed = Trimmer::new(&r).trim_entry(&entry);
        assert_eq!(entry.path, "/bucket/a.txt");
        assert_eq!(trimmed.path, "a.txt");
        assert_eq!(trimmed.size, 5);
    }

    #[test]
    fn test_trimmer_matches_free_function() {
        let roots = [root("/"), root("/b/"), root("b/c/"), root("x"), Entry::file("f", 1)];
        let entries = [
            Entry::file("/b/c/d.txt", 1),
            Entry::dir("b/c/"),
            Entry::file("", 0),
        ];
        for r in &roots {
            let trimmer = Trimmer::new(r);
            for e in &entries {
                assert_eq!(trimmer.trim(e), trim(r, e));
            }
        }
    }
}
