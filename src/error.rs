//! Error types for the tab history exporter.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use tabs_hist_export::{Result, Error};
//!
//! async fn example(tab: &Tab) -> Result<()> {
//!     tab.back().await?;
//!     let info = tab.info().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`], [`Error::InvalidArgument`] |
//! | Connection | [`Error::Connection`], [`Error::ConnectionTimeout`], [`Error::ConnectionClosed`] |
//! | Protocol | [`Error::Protocol`], [`Error::RequestTimeout`] |
//! | Navigation | [`Error::TabNotFound`], [`Error::Timeout`] |
//! | Run | [`Error::Aborted`], [`Error::RunInProgress`] |
//! | Persistence | [`Error::Storage`], [`Error::Export`] |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::WebSocket`] |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;
use tokio::sync::oneshot::error::RecvError;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::identifiers::{RequestId, TabId};

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Stage
// ============================================================================

/// Pipeline step in which an export run was aborted.
///
/// Each stage carries the message shown to the user when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Loading persisted run options.
    LoadOptions,
    /// Persisting default run options.
    SaveOptions,
    /// Enumerating target tabs.
    EnumerateTabs,
    /// Bringing a tab to the foreground.
    ActivateTab,
    /// Stepping back to the earliest history entry.
    ScanBackward,
    /// Stepping forward to the latest history entry.
    ScanForward,
    /// Returning the tab to its original entry.
    RestorePosition,
    /// Serializing and delivering the dataset.
    Export,
}

impl Stage {
    /// Returns the user-visible notification message for this stage.
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::LoadOptions => "Could not get options, using defaults.",
            Self::SaveOptions => "Could not save options.",
            Self::EnumerateTabs => "Could not get tabs.",
            Self::ActivateTab => {
                "Could not activate tab.\n(Activating all tabs manually one by one could help this.)"
            }
            Self::ScanBackward => "Could not go back in tab history.",
            Self::ScanForward => "Could not go forward in tab history.",
            Self::RestorePosition => "Could not go back to tab's original page.",
            Self::Export => "Could not start download.",
        }
    }

    /// Returns the short stage name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoadOptions => "load_options",
            Self::SaveOptions => "save_options",
            Self::EnumerateTabs => "enumerate_tabs",
            Self::ActivateTab => "activate_tab",
            Self::ScanBackward => "scan_backward",
            Self::ScanForward => "scan_forward",
            Self::RestorePosition => "restore_position",
            Self::Export => "export",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when driver or CLI configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Invalid argument.
    ///
    /// Returned when an option key or value cannot be parsed.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// WebSocket connection failed.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// Connection timeout waiting for extension.
    ///
    /// Returned when extension does not connect within timeout period.
    #[error("Connection timeout after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// WebSocket connection closed unexpectedly.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Protocol violation or error response from the extension.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    /// Command request timeout.
    #[error("Request {request_id} timed out after {timeout_ms}ms")]
    RequestTimeout {
        /// The request ID that timed out.
        request_id: RequestId,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // Navigation Errors
    // ========================================================================
    /// Tab not found.
    #[error("Tab not found: {tab_id}")]
    TabNotFound {
        /// The missing tab ID.
        tab_id: TabId,
    },

    /// Operation timeout.
    ///
    /// Returned when a page load does not complete within the configured limit.
    #[error("Timeout after {timeout_ms}ms: {operation}")]
    Timeout {
        /// Description of the operation that timed out.
        operation: String,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // Run Errors
    // ========================================================================
    /// An export run was aborted at the given stage.
    #[error("Export aborted at {stage}: {source}")]
    Aborted {
        /// The pipeline step that failed.
        stage: Stage,
        /// Underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// An export run is already active.
    #[error("An export run is already in progress")]
    RunInProgress,

    // ========================================================================
    // Persistence Errors
    // ========================================================================
    /// Settings store failure.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage failure.
        message: String,
    },

    /// Export delivery failure.
    #[error("Export error: {message}")]
    Export {
        /// Description of the export failure.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    /// Channel receive error.
    #[error("Channel closed")]
    ChannelClosed(#[from] RecvError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid argument error.
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a connection timeout error.
    #[inline]
    pub fn connection_timeout(timeout_ms: u64) -> Self {
        Self::ConnectionTimeout { timeout_ms }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates a request timeout error.
    #[inline]
    pub fn request_timeout(request_id: RequestId, timeout_ms: u64) -> Self {
        Self::RequestTimeout {
            request_id,
            timeout_ms,
        }
    }

    /// Creates a tab not found error.
    #[inline]
    pub fn tab_not_found(tab_id: TabId) -> Self {
        Self::TabNotFound { tab_id }
    }

    /// Creates a timeout error.
    #[inline]
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Wraps an error with the pipeline stage it aborted.
    #[inline]
    pub fn aborted(stage: Stage, source: Error) -> Self {
        Self::Aborted {
            stage,
            source: Box::new(source),
        }
    }

    /// Creates a storage error.
    #[inline]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates an export error.
    #[inline]
    pub fn export(message: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ConnectionTimeout { .. } | Self::Timeout { .. } | Self::RequestTimeout { .. }
        )
    }

    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::ConnectionTimeout { .. }
                | Self::ConnectionClosed
                | Self::WebSocket(_)
        )
    }

    /// Returns `true` if a run failed while persisting or delivering the export.
    #[inline]
    #[must_use]
    pub fn is_export_error(&self) -> bool {
        match self {
            Self::Export { .. } => true,
            Self::Aborted { stage, .. } => *stage == Stage::Export,
            _ => false,
        }
    }

    /// Returns the aborted stage, if this error ended an export run.
    #[inline]
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Aborted { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
