//! Cooperative cancellation for long-running vault operations
//!
//! A caller can hold a [`CancelToken`], hand a clone to a bulk load, and
//! cancel it mid-flight. Cancelled operations resolve with
//! `VaultError::Cancelled` and leave vault state untouched.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{VaultError, VaultResult};

/// A cloneable cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, un-cancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. All clones observe it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Has cancellation been requested?
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Bail out of the current operation if cancellation was requested
    pub fn check(&self) -> VaultResult<()> {
        if self.is_cancelled() {
            Err(VaultError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_token_not_cancelled() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        assert!(token.check().is_ok());
    }

    #[test]
    fn test_cancel_observed_by_clones() {
        let token = CancelToken::new();
        let clone = token.clone();

        token.cancel();

        assert!(clone.is_cancelled());
        assert!(matches!(clone.check(), Err(VaultError::Cancelled)));
    }
}
