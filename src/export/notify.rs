//! User-visible notifications.

use std::fmt;

use async_trait::async_trait;
use tracing::info;

// ============================================================================
// Notification
// ============================================================================

/// Kind of notification.
///
/// Each kind has a stable id, so a newer notification replaces an older one
/// of the same kind instead of stacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notification {
    /// A run failed.
    Error,
    /// The export could not be downloaded and was left in the store.
    DownloadUnavailable,
    /// The options surface must be visited before the first run.
    EnsureOptionsVisit,
}

impl Notification {
    /// Stable notification id.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Error => "ERROR_NOTIFICATION_ID",
            Self::DownloadUnavailable => "ANDROID_DOWNLOAD_NOTIFICATION",
            Self::EnsureOptionsVisit => "ENSURE_OPTIONS_VISIT",
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ============================================================================
// Notifier
// ============================================================================

/// Fire-and-forget delivery of notifications.
///
/// Implementations swallow their own failures; a notification that cannot
/// be shown never changes the outcome of a run.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Shows a notification.
    async fn notify(&self, kind: Notification, title: &str, message: &str);
}

/// Notifier that only writes to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, kind: Notification, title: &str, message: &str) {
        info!(id = kind.id(), title, "{message}");
    }
}

// ============================================================================
// Tests
// ============================================================================
