use thiserror::Error;

/// Failures reported by `RecencyTable` operations.
///
/// Every variant is returned to the immediate caller; the table never
/// retries, evicts, or substitutes a placeholder value.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableError {
    /// Construction was asked for a table with zero slots.
    #[error("invalid argument: capacity must be positive")]
    InvalidArgument,
    /// A new key could not be placed: every slot holds a live entry.
    #[error("hash table is full")]
    Full,
    #[error("key not found")]
    NotFound,
    /// `get_first`/`get_last` on a table with no live entries.
    #[error("hash table is empty")]
    Empty,
}
