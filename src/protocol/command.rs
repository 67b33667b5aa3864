//! Command definitions organized by module.
//!
//! Commands follow `module.methodName` format.
//!
//! # Command Modules
//!
//! | Module | Commands |
//! |--------|----------|
//! | `tabs` | Query, activate, inspect tabs |
//! | `browsingContext` | History navigation |
//! | `notifications` | Desktop notifications |
//! | `session` | Status |

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::identifiers::TabId;

// ============================================================================
// Command Wrapper
// ============================================================================

/// All protocol commands organized by module.
///
/// This enum wraps module-specific command enums for unified serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Command {
    /// Tabs module commands.
    Tabs(TabsCommand),
    /// BrowsingContext module commands.
    BrowsingContext(BrowsingContextCommand),
    /// Notifications module commands.
    Notifications(NotificationsCommand),
    /// Session module commands.
    Session(SessionCommand),
}

// ============================================================================
// Tabs Commands
// ============================================================================

/// Tabs module commands for enumeration and activation.
///
/// The target tab is the request's `tabId`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum TabsCommand {
    /// List tabs in enumeration order.
    #[serde(rename = "tabs.query")]
    Query {
        /// Restrict to the focused window.
        #[serde(rename = "currentWindow")]
        current_window: bool,
    },

    /// Make the target tab active.
    #[serde(rename = "tabs.activate")]
    Activate,

    /// Read the target tab's URL and load status.
    #[serde(rename = "tabs.get")]
    Get,
}

// ============================================================================
// BrowsingContext Commands
// ============================================================================

/// BrowsingContext module commands for history navigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum BrowsingContextCommand {
    /// Navigate back in history.
    #[serde(rename = "browsingContext.goBack")]
    GoBack,

    /// Navigate forward in history.
    #[serde(rename = "browsingContext.goForward")]
    GoForward,
}

// ============================================================================
// Notifications Commands
// ============================================================================

/// Notifications module commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum NotificationsCommand {
    /// Show a basic notification. Reusing an id replaces the previous one.
    #[serde(rename = "notifications.create")]
    Create {
        /// Notification id.
        id: String,
        /// Title line.
        title: String,
        /// Body text.
        message: String,
    },
}

// ============================================================================
// Session Commands
// ============================================================================

/// Session module commands for connection management.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum SessionCommand {
    /// Get session status.
    #[serde(rename = "session.status")]
    Status,
}

// ============================================================================
// Tab Data
// ============================================================================

/// Load status reported by the browser for a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadStatus {
    /// Page is still loading.
    #[serde(rename = "loading")]
    Pending,
    /// Page finished loading.
    #[serde(rename = "complete")]
    Complete,
}

impl LoadStatus {
    /// Returns `true` once loading has finished.
    #[inline]
    #[must_use]
    pub fn is_complete(self) -> bool {
        self == Self::Complete
    }
}

/// Tab snapshot returned by `tabs.query`, `tabs.activate` and `tabs.get`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabInfo {
    /// Tab ID. May differ from the requested id after activation.
    #[serde(rename = "tabId")]
    pub tab_id: TabId,
    /// Current URL.
    #[serde(default)]
    pub url: String,
    /// Page title.
    #[serde(default)]
    pub title: String,
    /// Load status.
    pub status: LoadStatus,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_query_serialization() {
        let command = Command::Tabs(TabsCommand::Query {
            current_window: true,
        });
        let value = serde_json::to_value(&command).expect("serialize");

        assert_eq!(
            value,
            json!({"method": "tabs.query", "params": {"currentWindow": true}})
        );
    }

    #[test]
    fn test_unit_command_serialization() {
        let command = Command::BrowsingContext(BrowsingContextCommand::GoBack);
        let json = serde_json::to_string(&command).expect("serialize");
        assert!(json.contains("browsingContext.goBack"));
    }

    #[test]
    fn test_notification_serialization() {
        let command = Command::Notifications(NotificationsCommand::Create {
            id: "ERROR_NOTIFICATION_ID".into(),
            title: "Export | ERROR".into(),
            message: "Could not get tabs.".into(),
        });
        let value = serde_json::to_value(&command).expect("serialize");

        assert_eq!(value["method"], "notifications.create");
        assert_eq!(value["params"]["id"], "ERROR_NOTIFICATION_ID");
    }

    #[test]
    fn test_tab_info_parsing() {
        let info: TabInfo = serde_json::from_value(json!({
            "tabId": 3,
            "url": "https://example.com/",
            "title": "Example",
            "status": "loading"
        }))
        .expect("parse");

        assert_eq!(info.tab_id.as_u32(), 3);
        assert_eq!(info.status, LoadStatus::Pending);
        assert!(!info.status.is_complete());
    }

    #[test]
    fn test_tab_info_defaults_missing_url() {
        let info: TabInfo =
            serde_json::from_value(json!({"tabId": 1, "status": "complete"})).expect("parse");
        assert_eq!(info.url, "");
        assert!(info.status.is_complete());
    }
}
