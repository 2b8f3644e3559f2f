//! Output formatter for human-readable and JSON messages
//!
//! Ensures consistent status and error output across all commands.

use console::style;
use serde::Serialize;

use super::OutputConfig;

/// Formatter for CLI messages
///
/// Handles both human-readable and JSON output formats based on configuration.
/// When JSON mode is enabled, all output is strict JSON without colors.
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
}

impl Formatter {
    /// Create a new formatter with the given configuration
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Check if JSON output mode is enabled
    pub fn is_json(&self) -> bool {
        self.config.json
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.config.quiet
    }

    /// Check if colors are enabled
    pub fn colors_enabled(&self) -> bool {
        self.config.colors_enabled()
    }

    /// Output a success message
    pub fn success(&self, message: &str) {
        if self.config.quiet || self.config.json {
            return;
        }

        if self.colors_enabled() {
            println!("{} {message}", style("✓").green().force_styling(true));
        } else {
            println!("✓ {message}");
        }
    }

    /// Render an error line without printing it
    ///
    /// `cause` is appended in human mode and kept as its own field in JSON.
    pub fn error_line(&self, message: &str, cause: Option<&str>) -> String {
        if self.config.json {
            let error = match cause {
                Some(cause) => serde_json::json!({ "error": message, "cause": cause }),
                None => serde_json::json!({ "error": message }),
            };
            return error.to_string();
        }

        let text = match cause {
            Some(cause) => format!("{message} {cause}"),
            None => message.to_string(),
        };
        if self.colors_enabled() {
            format!("{} {text}", style("✗").red().force_styling(true))
        } else {
            format!("✗ {text}")
        }
    }

    /// Output an error message
    ///
    /// Errors are always printed, even in quiet mode.
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.error_line(message, None));
    }

    /// Output a warning message
    pub fn warning(&self, message: &str) {
        if self.config.quiet || self.config.json {
            return;
        }

        if self.colors_enabled() {
            eprintln!("{} {message}", style("⚠").yellow().force_styling(true));
        } else {
            eprintln!("⚠ {message}");
        }
    }

    /// Output JSON directly
    pub fn json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!(
                "{}",
                self.error_line("Unable to marshal into JSON.", Some(&e.to_string()))
            ),
        }
    }

    /// Print a line of text (respects quiet mode)
    pub fn println(&self, message: &str) {
        if self.config.quiet {
            return;
        }
        println!("{message}");
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}
