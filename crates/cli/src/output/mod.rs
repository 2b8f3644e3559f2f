//! Output formatting utilities
//!
//! This module provides formatters for CLI output in both human-readable
//! and JSON formats, and the printer that receives listing records.

mod formatter;
mod printer;

pub use formatter::Formatter;
pub use printer::Printer;

use stls_core::Defaults;

/// When to colorize human output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorChoice {
    /// Colorize when the terminal supports it
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Parse a `[defaults] color` value, falling back to `Auto`
    pub fn from_config(value: &str) -> Self {
        match value {
            "always" => Self::Always,
            "never" => Self::Never,
            _ => Self::Auto,
        }
    }
}

/// Output configuration derived from CLI flags
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Use JSON output format
    pub json: bool,
    /// Disable colored output
    pub no_color: bool,
    /// Suppress non-error output
    pub quiet: bool,
    /// Color mode from the configuration file
    pub color: ColorChoice,
}

impl OutputConfig {
    /// Fill in settings the flags left unset from the configuration defaults.
    ///
    /// Flags can only switch JSON output on and colors off, so they always
    /// win over the configuration.
    pub fn with_defaults(mut self, defaults: &Defaults) -> Self {
        self.json |= defaults.json();
        self.color = ColorChoice::from_config(&defaults.color);
        self
    }

    /// Whether human output should be colorized
    pub fn colors_enabled(&self) -> bool {
        if self.json || self.no_color {
            return false;
        }
        match self.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => console::colors_enabled(),
        }
    }
}
