//! WebSocket protocol message types.
//!
//! This module defines the message format for communication between
//! local end (Rust) and remote end (Extension).
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | `Request` | Local → Remote | Command request |
//! | `Response` | Remote → Local | Command response |
//!
//! The extension opens the conversation with a READY response carrying the
//! nil request id, its initial tab id and its session id.
//!
//! # Command Naming
//!
//! Commands follow `module.methodName` format:
//!
//! - `tabs.query`
//! - `browsingContext.goBack`
//! - `notifications.create`

// ============================================================================
// Submodules
// ============================================================================

/// Command definitions organized by module.
pub mod command;

/// Request and Response message types.
pub mod request;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::{
    BrowsingContextCommand, Command, LoadStatus, NotificationsCommand, SessionCommand, TabInfo,
    TabsCommand,
};
pub use request::{Request, Response, ResponseType};
