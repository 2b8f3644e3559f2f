//! Display records
//!
//! A [`DisplayRecord`] is what a printer receives for every listed entry that
//! could be enumerated. It has two renderings:
//!
//! - structured: JSON with the stable field names `type`, `lastModified`,
//!   `size` and `key`
//! - human: `[YYYY-MM-DD HH:MM:SS TZ] <size> <key>`, split into tagged
//!   [`Segment`]s so a printer can style each part

use jiff::Zoned;
use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};

use crate::entry::Entry;
use crate::error::Result;
use crate::normalize::{SeparatorStyle, normalize};

/// strftime layout of the human timestamp
pub const PRINT_DATE: &str = "%Y-%m-%d %H:%M:%S %Z";

/// Whether a record is a file or a folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
}

impl EntryKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Folder => "folder",
        }
    }
}

/// Normalized, printable form of one listed entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayRecord {
    #[serde(rename = "type")]
    pub kind: EntryKind,

    /// Modification time in the formatter's time zone
    #[serde(rename = "lastModified")]
    pub last_modified: Zoned,

    /// Size in bytes
    pub size: u64,

    /// Path relative to the queried location; folders end with a separator
    pub key: String,
}

/// Tag attached to each part of the human rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentTag {
    Time,
    Size,
    Dir,
    File,
}

/// One styled part of the human rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub tag: SegmentTag,
    pub text: String,
}

impl DisplayRecord {
    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }

    /// Human rendering in field order: time, size, kind-tagged key
    pub fn segments(&self) -> [Segment; 3] {
        let time = format!("[{}] ", self.last_modified.strftime(PRINT_DATE));
        let size = format!(
            "{:>6} ",
            humansize::format_size(self.size, humansize::BINARY)
        );
        let key_tag = match self.kind {
            EntryKind::Folder => SegmentTag::Dir,
            EntryKind::File => SegmentTag::File,
        };
        [
            Segment {
                tag: SegmentTag::Time,
                text: time,
            },
            Segment {
                tag: SegmentTag::Size,
                text: size,
            },
            Segment {
                tag: key_tag,
                text: self.key.clone(),
            },
        ]
    }

    /// Structured rendering
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a structured rendering back into a record
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl std::fmt::Display for DisplayRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for segment in self.segments() {
            f.write_str(&segment.text)?;
        }
        Ok(())
    }
}

/// Turns (already trimmed) entries into display records
#[derive(Debug, Clone)]
pub struct RecordFormatter {
    style: SeparatorStyle,
    time_zone: TimeZone,
}

impl RecordFormatter {
    pub fn new(style: SeparatorStyle, time_zone: TimeZone) -> Self {
        Self { style, time_zone }
    }

    /// Platform separators and the system time zone
    pub fn native() -> Self {
        Self::new(SeparatorStyle::native(), TimeZone::system())
    }

    pub fn style(&self) -> SeparatorStyle {
        self.style
    }

    pub fn format(&self, entry: &Entry) -> DisplayRecord {
        DisplayRecord {
            kind: if entry.is_dir {
                EntryKind::Folder
            } else {
                EntryKind::File
            },
            last_modified: entry.modified.to_zoned(self.time_zone.clone()),
            size: entry.size,
            key: normalize(&entry.path, entry.is_dir, self.style),
        }
    }
}

impl Default for RecordFormatter {
    fn default() -> Self {
        Self::native()
    }
}
