//! The per-run diagnostic log shown on the options surface.

use std::fmt;

// ============================================================================
// LogLevel
// ============================================================================

/// Severity of a run log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Progress.
    Info,
    /// Unexpected but recoverable.
    Warning,
    /// The failure that ended the run.
    Error,
}

impl LogLevel {
    /// Line prefix, e.g. `[INFO]: `.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Info => "[INFO]: ",
            Self::Warning => "[WARNING]: ",
            Self::Error => "[ERROR]: ",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

// ============================================================================
// RunLog
// ============================================================================

/// Append-only list of log lines for one run.
///
/// Lines are only recorded while enabled, which follows the `debug` option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunLog {
    enabled: bool,
    lines: Vec<String>,
}

impl RunLog {
    /// Creates an empty log.
    #[inline]
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            lines: Vec::new(),
        }
    }

    /// Turns recording on or off. Recorded lines are kept.
    #[inline]
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns `true` if lines are being recorded.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Appends a line. Returns `false` if recording is off.
    pub fn push(&mut self, level: LogLevel, message: &str) -> bool {
        if !self.enabled {
            return false;
        }
        self.lines.push(format!("{}{message}", level.prefix()));
        true
    }

    /// Recorded lines, oldest first.
    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of recorded lines.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if nothing was recorded.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
