//! State owned by a single export run.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use tracing::{error, info, warn};

use crate::error::{Error, Result, Stage};
use crate::storage::{self, LOGS_KEY, SettingsStore};

use super::log::{LogLevel, RunLog};
use super::options::RunOptions;

// ============================================================================
// RunPhase
// ============================================================================

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Not started.
    Idle,
    /// Querying the tab list.
    EnumeratingTabs,
    /// Working on the tab at this enumeration index.
    ProcessingTab(usize),
    /// Serializing and delivering the dataset.
    Exporting,
    /// Finished successfully.
    Done,
    /// Ended by a failure.
    Aborted,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::EnumeratingTabs => f.write_str("enumerating_tabs"),
            Self::ProcessingTab(index) => write!(f, "processing_tab({index})"),
            Self::Exporting => f.write_str("exporting"),
            Self::Done => f.write_str("done"),
            Self::Aborted => f.write_str("aborted"),
        }
    }
}

// ============================================================================
// RunContext
// ============================================================================

/// Options, log and phase of one run, threaded through the pipeline.
///
/// Created when a run starts and dropped when it ends, so nothing leaks
/// into the next run.
pub struct RunContext<'a> {
    options: RunOptions,
    log: RunLog,
    phase: RunPhase,
    store: &'a dyn SettingsStore,
}

impl<'a> RunContext<'a> {
    /// Creates a context with default options and an empty, disabled log.
    #[must_use]
    pub fn new(store: &'a dyn SettingsStore) -> Self {
        let options = RunOptions::default();
        Self {
            log: RunLog::new(options.debug),
            options,
            phase: RunPhase::Idle,
            store,
        }
    }

    /// Options in effect.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Installs the loaded options; logging follows their `debug` flag.
    pub fn set_options(&mut self, options: RunOptions) {
        self.log.set_enabled(options.debug);
        self.options = options;
    }

    /// Current phase.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Moves to `phase`.
    #[inline]
    pub fn enter(&mut self, phase: RunPhase) {
        tracing::debug!(from = %self.phase, to = %phase, "Run phase changed");
        self.phase = phase;
    }

    /// Recorded log.
    #[inline]
    #[must_use]
    pub fn log(&self) -> &RunLog {
        &self.log
    }

    /// Writes the (possibly empty) log to the store.
    ///
    /// # Errors
    ///
    /// Fails if the store rejects the write.
    pub async fn persist_log(&self) -> Result<()> {
        storage::save(self.store, LOGS_KEY, self.log.lines()).await
    }

    /// Logs progress.
    pub async fn info(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        info!("{message}");
        self.record(LogLevel::Info, message).await;
    }

    /// Logs an anomaly that does not stop the run.
    pub async fn warn(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        warn!("{message}");
        self.record(LogLevel::Warning, message).await;
    }

    /// Logs a failure.
    pub async fn error(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        error!("{message}");
        self.record(LogLevel::Error, message).await;
    }

    /// Logs `err`, marks the run aborted and tags the error with `stage`.
    pub async fn abort(&mut self, stage: Stage, err: Error) -> Error {
        self.error(err.to_string()).await;
        self.enter(RunPhase::Aborted);
        Error::aborted(stage, err)
    }

    /// Passes `result` through, aborting at `stage` on error.
    pub async fn check<T>(&mut self, stage: Stage, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => Err(self.abort(stage, e).await),
        }
    }

    async fn record(&mut self, level: LogLevel, message: &str) {
        if !self.log.push(level, message) {
            return;
        }
        // A log that cannot be saved must not end the run.
        if let Err(e) = self.persist_log().await {
            warn!(error = %e, "Failed to persist run log");
        }
    }
}

impl fmt::Debug for RunContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunContext")
            .field("options", &self.options)
            .field("log_lines", &self.log.len())
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
