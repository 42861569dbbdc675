//! Errors reported by [`Tree`][crate::Tree] operations.

use thiserror::Error;

/// Everything that can go wrong when talking to a [`Tree`][crate::Tree].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The supplied key couldn't be converted into the tree's key type. The tree is left
    /// untouched.
    #[error("Invalid key type: expected a key convertible to `{expected}`")]
    InvalidKeyType {
        /// Name of the tree's key type.
        expected: &'static str,
    },

    /// No live entry matches the key. Tombstoned entries count as missing.
    #[error("Key not found")]
    NotFound,
}

/// Shorthand for results carrying an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
