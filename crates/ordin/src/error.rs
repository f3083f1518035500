//! Error types for symbol allocation.
//!
//! Only the order-preserving allocator can fail in a way the caller is
//! expected to handle: its 64-bit value space is subdivided one bit per tree
//! level, so a sufficiently unbalanced insertion sequence exhausts the bit
//! budget on one branch. Both error variants carry the offending string so
//! the caller can report it or retry after a [`forget`] / [`remap`] cycle.
//!
//! Passing an invalid handle to a resolve operation is a programmer error,
//! not an [`InternError`]; it panics with a diagnostic message.
//!
//! [`forget`]: crate::OrdTable::forget_all
//! [`remap`]: crate::OrdTable::remap_all

use thiserror::Error;

/// Error type for order-preserving interning operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InternError {
    /// The order tree cannot assign a symbol to this string without
    /// violating the ordering invariant.
    ///
    /// Recoverable: forget all symbols, or pre-announce the full expected
    /// workload and remap, then retry.
    #[error("cannot assign an ordered symbol to {string:?}: symbol table is full")]
    TableFull {
        /// The string that could not be accommodated.
        string: String,
    },

    /// A previously interned string failed to reappear while rebuilding the
    /// table during a remap.
    #[error("string {string:?} was lost while remapping its symbol table")]
    RemapFailed {
        /// The string that went missing.
        string: String,
    },
}

impl InternError {
    /// The string the failed operation was processing.
    pub fn string(&self) -> &str {
        match self {
            InternError::TableFull { string } => string,
            InternError::RemapFailed { string } => string,
        }
    }
}

/// Result type alias for interning operations.
pub type InternResult<T> = std::result::Result<T, InternError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_full_display_names_the_string() {
        let err = InternError::TableFull {
            string: "zebra".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"zebra\""));
        assert!(msg.contains("full"));
    }

    #[test]
    fn string_accessor_returns_payload() {
        let err = InternError::RemapFailed {
            string: "lost".to_string(),
        };
        assert_eq!(err.string(), "lost");
    }
}
