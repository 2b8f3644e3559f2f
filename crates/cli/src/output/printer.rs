//! Listing printer
//!
//! Receives display records from the listing driver and writes them out,
//! one line per record: colorized segments in human mode, one JSON object
//! per line in JSON mode. Entry failures go to the error stream.

use std::io::{self, Stderr, Stdout, Write};

use console::Style;
use serde::Serialize;
use tracing::debug;

use stls_core::{DisplayRecord, EntryError, ErrorCategory, ListingSummary, SegmentTag, Sink};

use super::{Formatter, OutputConfig};

/// Totals printed by `ls --summarize`
#[derive(Debug, Serialize)]
struct SummaryOutput {
    files: usize,
    folders: usize,
    errors: usize,
    total_size_bytes: u64,
    total_size_human: String,
}

impl From<&ListingSummary> for SummaryOutput {
    fn from(summary: &ListingSummary) -> Self {
        Self {
            files: summary.files,
            folders: summary.folders,
            errors: summary.errors,
            total_size_bytes: summary.total_size,
            total_size_human: humansize::format_size(summary.total_size, humansize::BINARY),
        }
    }
}

/// Sink writing listing output to a pair of streams
pub struct Printer<W = Stdout, E = Stderr> {
    formatter: Formatter,
    out: W,
    err: E,
}

impl Printer {
    /// Printer writing to the process stdout and stderr
    pub fn stdout(config: OutputConfig) -> Self {
        Self::new(config, io::stdout(), io::stderr())
    }
}

impl<W: Write, E: Write> Printer<W, E> {
    pub fn new(config: OutputConfig, out: W, err: E) -> Self {
        Self {
            formatter: Formatter::new(config),
            out,
            err,
        }
    }

    /// Give back the underlying writers
    pub fn into_inner(self) -> (W, E) {
        (self.out, self.err)
    }

    /// Print listing totals
    pub fn summary(&mut self, summary: &ListingSummary) {
        if self.formatter.is_quiet() {
            return;
        }

        let output = SummaryOutput::from(summary);
        if self.formatter.is_json() {
            match serde_json::to_string(&output) {
                Ok(line) => self.write_out(&line),
                Err(e) => self.write_err("Unable to marshal into JSON.", Some(&e.to_string())),
            }
            return;
        }

        let mut line = format!(
            "\nTotal: {} files, {} folders, {}",
            output.files, output.folders, output.total_size_human
        );
        if output.errors > 0 {
            line.push_str(&format!(", {} errors", output.errors));
        }
        self.write_out(&line);
    }

    fn render_human(&self, record: &DisplayRecord) -> String {
        let colors = self.formatter.colors_enabled();
        record
            .segments()
            .iter()
            .map(|segment| {
                if colors {
                    segment_style(segment.tag)
                        .force_styling(true)
                        .apply_to(&segment.text)
                        .to_string()
                } else {
                    segment.text.clone()
                }
            })
            .collect()
    }

    fn write_out(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{line}") {
            debug!(error = %e, "failed to write listing output");
        }
    }

    fn write_err(&mut self, message: &str, cause: Option<&str>) {
        let line = self.formatter.error_line(message, cause);
        if let Err(e) = writeln!(self.err, "{line}") {
            debug!(error = %e, "failed to write error output");
        }
    }
}

impl<W: Write, E: Write> Sink for Printer<W, E> {
    fn record(&mut self, record: &DisplayRecord) {
        if self.formatter.is_quiet() {
            return;
        }

        if self.formatter.is_json() {
            match record.to_json() {
                Ok(line) => self.write_out(&line),
                Err(e) => self.write_err("Unable to marshal into JSON.", Some(&e.to_string())),
            }
        } else {
            let line = self.render_human(record);
            self.write_out(&line);
        }
    }

    fn entry_error(&mut self, category: ErrorCategory, error: &EntryError) {
        self.write_err(category.message(), Some(&error.to_string()));
    }
}

fn segment_style(tag: SegmentTag) -> Style {
    match tag {
        SegmentTag::Time => Style::new().green(),
        SegmentTag::Size => Style::new().yellow(),
        SegmentTag::Dir => Style::new().cyan().bold(),
        SegmentTag::File => Style::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::ColorChoice;
    use jiff::Timestamp;
    use jiff::tz::TimeZone;
    use stls_core::{Entry, RecordFormatter, SeparatorStyle};

    fn records() -> Vec<DisplayRecord> {
        let formatter = RecordFormatter::new(SeparatorStyle::Slash, TimeZone::UTC);
        let modified: Timestamp = "2024-03-01T12:30:00Z".parse().unwrap();
        vec![
            formatter.format(&Entry::dir("photos/").with_modified(modified)),
            formatter.format(&Entry::file("notes.txt", 2048).with_modified(modified)),
        ]
    }

    fn print(config: OutputConfig) -> (String, String) {
        let mut printer = Printer::new(config, Vec::new(), Vec::new());
        for record in records() {
            printer.record(&record);
        }
        let (out, err) = printer.into_inner();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    fn plain() -> OutputConfig {
        OutputConfig {
            no_color: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_human_output() {
        let (out, err) = print(plain());
        insta::assert_snapshot!(out, @r"
        [2024-03-01 12:30:00 UTC]    0 B photos/
        [2024-03-01 12:30:00 UTC]  2 KiB notes.txt
        ");
        assert!(err.is_empty());
    }

    #[test]
    fn test_json_lines_output() {
        let (out, _) = print(OutputConfig {
            json: true,
            ..Default::default()
        });
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["type"], "folder");
        assert_eq!(first["key"], "photos/");
        assert_eq!(first["size"], 0);

        let second = DisplayRecord::from_json(lines[1]).unwrap();
        assert_eq!(second.key, "notes.txt");
        assert_eq!(second.size, 2048);
    }

    #[test]
    fn test_colored_output_keeps_text() {
        let (out, _) = print(OutputConfig {
            color: ColorChoice::Always,
            ..Default::default()
        });
        assert!(out.contains('\u{1b}'));
        assert_eq!(console::strip_ansi_codes(&out), print(plain()).0);
    }

    #[test]
    fn test_quiet_suppresses_records_but_not_errors() {
        let mut printer = Printer::new(
            OutputConfig {
                quiet: true,
                no_color: true,
                ..Default::default()
            },
            Vec::new(),
            Vec::new(),
        );
        for record in records() {
            printer.record(&record);
        }
        printer.entry_error(
            ErrorCategory::BrokenLink,
            &EntryError::BrokenSymlink {
                path: "/data/dangling".into(),
            },
        );

        let (out, err) = printer.into_inner();
        assert!(out.is_empty());
        let err = String::from_utf8(err).unwrap();
        assert!(err.starts_with("✗ Unable to list broken link."));
        assert!(err.contains("/data/dangling"));
    }

    #[test]
    fn test_summary_human() {
        let mut printer = Printer::new(plain(), Vec::new(), Vec::new());
        printer.summary(&ListingSummary {
            records: 3,
            folders: 1,
            files: 2,
            total_size: 3072,
            errors: 1,
            cancelled: false,
        });
        let (out, _) = printer.into_inner();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\nTotal: 2 files, 1 folders, 3 KiB, 1 errors\n"
        );
    }

    #[test]
    fn test_summary_json() {
        let mut printer = Printer::new(
            OutputConfig {
                json: true,
                ..Default::default()
            },
            Vec::new(),
            Vec::new(),
        );
        printer.summary(&ListingSummary {
            records: 2,
            folders: 0,
            files: 2,
            total_size: 1024,
            errors: 0,
            cancelled: false,
        });
        let (out, _) = printer.into_inner();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["files"], 2);
        assert_eq!(value["total_size_bytes"], 1024);
        assert_eq!(value["total_size_human"], "1 KiB");
    }
}
