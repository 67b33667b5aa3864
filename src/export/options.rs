//! User-editable run options.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::history::{StepPacing, TabScope, WaitPolicy};

// ============================================================================
// Constants
// ============================================================================

/// Default delay after every navigation step, in milliseconds.
pub const DEFAULT_PAGE_LOAD_WAIT_MS: u64 = 5000;

/// Option keys accepted by [`RunOptions::set`], in display order.
pub const OPTION_KEYS: [&str; 7] = [
    "debug",
    "prettyJson",
    "currentWinOnly",
    "earlyBreak",
    "dryRun",
    "pageLoadTime",
    "loadTimeout",
];

// ============================================================================
// RunOptions
// ============================================================================

/// Options read once at the start of a run.
///
/// Serialized with the field names the options surface has always
/// persisted. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    /// Record the run log.
    pub debug: bool,

    /// Indent the exported JSON with four spaces.
    #[serde(rename = "prettyJson")]
    pub pretty_json: bool,

    /// Visit only the tabs of the focused window.
    #[serde(rename = "currentWinOnly")]
    pub current_window_only: bool,

    /// Stop after the first tab.
    #[serde(rename = "earlyBreak")]
    pub early_break: bool,

    /// Produce placeholder URLs without touching any tab.
    #[serde(rename = "dryRun")]
    pub dry_run: bool,

    /// Fixed delay after every navigation step, in milliseconds.
    #[serde(rename = "pageLoadTime")]
    pub page_load_wait_ms: u64,

    /// Upper bound on a single load wait, in milliseconds. `None` waits forever.
    #[serde(rename = "loadTimeout")]
    pub load_timeout_ms: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            debug: false,
            pretty_json: false,
            current_window_only: true,
            early_break: false,
            dry_run: false,
            page_load_wait_ms: DEFAULT_PAGE_LOAD_WAIT_MS,
            load_timeout_ms: None,
        }
    }
}

impl RunOptions {
    /// Delay after every navigation step.
    #[inline]
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.page_load_wait_ms)
    }

    /// Load-wait policy derived from `loadTimeout`.
    #[inline]
    #[must_use]
    pub fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy::default().with_timeout(self.load_timeout_ms.map(Duration::from_millis))
    }

    /// Step pacing for the scanners.
    #[inline]
    #[must_use]
    pub fn pacing(&self) -> StepPacing {
        StepPacing {
            settle_delay: self.settle_delay(),
            wait: self.wait_policy(),
        }
    }

    /// Tabs the run enumerates.
    #[inline]
    #[must_use]
    pub fn scope(&self) -> TabScope {
        TabScope::from_current_window_only(self.current_window_only)
    }

    /// Sets one option from its persisted key and a text value.
    ///
    /// Booleans accept `true`/`false`, `on`/`off`, `yes`/`no` and `1`/`0`.
    /// `loadTimeout` also accepts `none` to disable the limit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an unknown key or a value that
    /// does not parse for that key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "debug" => self.debug = parse_bool(key, value)?,
            "prettyJson" => self.pretty_json = parse_bool(key, value)?,
            "currentWinOnly" => self.current_window_only = parse_bool(key, value)?,
            "earlyBreak" => self.early_break = parse_bool(key, value)?,
            "dryRun" => self.dry_run = parse_bool(key, value)?,
            "pageLoadTime" => self.page_load_wait_ms = parse_millis(key, value)?,
            "loadTimeout" => {
                self.load_timeout_ms = match value.trim() {
                    "none" | "null" | "" => None,
                    text => match parse_millis(key, text)? {
                        0 => {
                            return Err(Error::invalid_argument(
                                "loadTimeout must be greater than zero",
                            ));
                        }
                        ms => Some(ms),
                    },
                }
            }
            _ => {
                return Err(Error::invalid_argument(format!(
                    "unknown option '{key}', expected one of: {}",
                    OPTION_KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for RunOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "debug          = {}", self.debug)?;
        writeln!(f, "prettyJson     = {}", self.pretty_json)?;
        writeln!(f, "currentWinOnly = {}", self.current_window_only)?;
        writeln!(f, "earlyBreak     = {}", self.early_break)?;
        writeln!(f, "dryRun         = {}", self.dry_run)?;
        writeln!(f, "pageLoadTime   = {}", self.page_load_wait_ms)?;
        match self.load_timeout_ms {
            Some(ms) => write!(f, "loadTimeout    = {ms}"),
            None => write!(f, "loadTimeout    = none"),
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => Err(Error::invalid_argument(format!(
            "{key} expects a boolean, got '{other}'"
        ))),
    }
}

fn parse_millis(key: &str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| {
        Error::invalid_argument(format!(
            "{key} expects milliseconds as a whole number, got '{value}'"
        ))
    })
}

// ============================================================================
// Tests
// ============================================================================
