//! Error types for the cart engine.
//!
//! Cart mutations never fail - invalid input is normalized and missing lines
//! are no-ops - so the only error type here belongs to the persistence
//! adapter, and even that is contained: the adapter logs and swallows it
//! rather than surfacing it to the store's callers.

use thiserror::Error;

/// A persistence operation failed.
///
/// Never propagated past the storage adapter; the in-memory cart remains
/// authoritative for the rest of the session.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the storage slot failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cart payload could not be serialized.
    #[error("cart payload serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
