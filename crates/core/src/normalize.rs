//! Platform separator normalization for display keys

use serde::{Deserialize, Serialize};

/// How separators are rendered in display keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeparatorStyle {
    /// `/`, used everywhere but Windows
    #[default]
    Slash,
    /// `\`, Windows console style
    Backslash,
}

impl SeparatorStyle {
    /// Style of the platform this binary was built for
    pub const fn native() -> Self {
        if cfg!(windows) {
            SeparatorStyle::Backslash
        } else {
            SeparatorStyle::Slash
        }
    }

    pub const fn separator(self) -> char {
        match self {
            SeparatorStyle::Slash => '/',
            SeparatorStyle::Backslash => '\\',
        }
    }
}

impl std::str::FromStr for SeparatorStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "native" => Ok(Self::native()),
            "slash" | "/" => Ok(Self::Slash),
            "backslash" | "\\" => Ok(Self::Backslash),
            other => Err(format!(
                "unknown separator style '{other}', expected native, slash or backslash"
            )),
        }
    }
}

/// Render `raw` with the separators of `style`.
///
/// Trailing separators are dropped; directories get exactly one back.
pub fn normalize(raw: &str, is_dir: bool, style: SeparatorStyle) -> String {
    let sep = style.separator();
    let mut path = match style {
        SeparatorStyle::Backslash => raw.replace('/', "\\"),
        SeparatorStyle::Slash => raw.to_string(),
    };
    let trimmed_len = path.trim_end_matches(sep).len();
    path.truncate(trimmed_len);
    if is_dir {
        path.push(sep);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slash_file_drops_trailing_separator() {
        assert_eq!(normalize("dir/file.txt", false, SeparatorStyle::Slash), "dir/file.txt");
        assert_eq!(normalize("dir/file.txt/", false, SeparatorStyle::Slash), "dir/file.txt");
    }

    #[test]
    fn test_slash_dir_gets_single_separator() {
        assert_eq!(normalize("dir/sub", true, SeparatorStyle::Slash), "dir/sub/");
        assert_eq!(normalize("dir/sub/", true, SeparatorStyle::Slash), "dir/sub/");
        assert_eq!(normalize("dir/sub///", true, SeparatorStyle::Slash), "dir/sub/");
    }

    #[test]
    fn test_backslash_rewrites_every_separator() {
        assert_eq!(
            normalize("a/b/c.txt", false, SeparatorStyle::Backslash),
            "a\\b\\c.txt"
        );
        assert_eq!(normalize("a/b/", false, SeparatorStyle::Backslash), "a\\b");
        assert_eq!(normalize("a/b/", true, SeparatorStyle::Backslash), "a\\b\\");
        assert_eq!(normalize("a\\b", true, SeparatorStyle::Backslash), "a\\b\\");
    }

    #[test]
    fn test_same_path_both_styles() {
        let raw = "photos/2024/";
        assert_eq!(normalize(raw, true, SeparatorStyle::Slash), "photos/2024/");
        assert_eq!(normalize(raw, true, SeparatorStyle::Backslash), "photos\\2024\\");
    }

    #[test]
    fn test_slash_style_keeps_backslashes_in_names() {
        assert_eq!(normalize("odd\\name", false, SeparatorStyle::Slash), "odd\\name");
    }

    #[test]
    fn test_empty_and_root_paths() {
        assert_eq!(normalize("", false, SeparatorStyle::Slash), "");
        assert_eq!(normalize("", true, SeparatorStyle::Slash), "/");
        assert_eq!(normalize("/", true, SeparatorStyle::Slash), "/");
    }

    #[test]
    fn test_separator_style_from_str() {
        assert_eq!("slash".parse::<SeparatorStyle>().unwrap(), SeparatorStyle::Slash);
        assert_eq!(
            "backslash".parse::<SeparatorStyle>().unwrap(),
            SeparatorStyle::Backslash
        );
        assert_eq!(
            "native".parse::<SeparatorStyle>().unwrap(),
            SeparatorStyle::native()
        );
        assert!("colon".parse::<SeparatorStyle>().is_err());
    }
}
