//! Error types for the triple store.
//!
//! All errors surface synchronously to the caller; nothing is retried or
//! recovered internally.

use thiserror::Error;

/// A specialized `Result` type for triple store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Defines the errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The store was structurally modified while an iterator was being
    /// stepped. The iterator is terminated; the store itself is unaffected.
    #[error("concurrent modification: store version advanced from {expected} to {found} during iteration")]
    ConcurrentModification {
        /// Store version captured when the iterator was created.
        expected: u64,
        /// Store version observed on the failing step.
        found: u64,
    },

    /// An iterator `remove` was called before the first element was yielded,
    /// after iteration ended, or twice without an intervening step.
    #[error("illegal iterator state: {0}")]
    IllegalState(&'static str),

    /// A fully unconstrained pattern reached a planner entry that requires at
    /// least one concrete term. The public API accepts such patterns and
    /// scans everything instead.
    #[error("planner requires at least one concrete term")]
    WildcardPlan,

    /// The store's internal lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ConcurrentModification {
            expected: 3,
            found: 5,
        };
        assert!(err.to_string().contains("concurrent modification"));
        assert!(err.to_string().contains('3'));
        assert!(err.to_string().contains('5'));

        let err = Error::IllegalState("remove before next");
        assert!(err.to_string().contains("remove before next"));
    }
}
