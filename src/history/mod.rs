//! Tab history traversal.
//!
//! The building blocks an export run drives for each tab:
//!
//! | Step | Function | Moves the tab |
//! |------|----------|---------------|
//! | Wait for load | [`wait_for_load`] | no |
//! | Find earliest entry | [`scan_backward`] | back to entry 0 |
//! | Record entries | [`scan_forward`] | forward to the last entry |
//! | Restore | [`restore_position`] | back to the starting entry |
//!
//! All steps are written against [`TabSource`], implemented by
//! [`Browser`](crate::browser::Browser).

// ============================================================================
// Submodules
// ============================================================================

mod restorer;
mod scanner;
mod source;
mod waiter;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use restorer::{net_displacement, restore_position};
pub use scanner::{ScanResult, StepPacing, scan_backward, scan_forward};
pub use source::{NavigationState, TabScope, TabSource};
pub use waiter::{DEFAULT_POLL_INTERVAL, WaitPolicy, wait_for_load};
