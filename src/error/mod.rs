//! Error handling for the ledger
//!
//! This module provides the error types for all ledger operations.

use std::fmt;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Error types for ledger operations
///
/// Chain-validation failures are not represented here; they travel as
/// `core::validation::ChainFault` values so the caller always learns the
/// offending block index.
#[derive(Debug, Clone)]
pub enum LedgerError {
    /// Input that could not be parsed into the expected shape
    MalformedInput(String),
    /// Attempted spend exceeds the computed balance
    InsufficientBalance { required: f64, available: f64 },
    /// Signing key does not match the claimed address
    InvalidKeyPair(String),
    /// Query for a block index that does not exist
    BlockIndexOutOfRange(u64),
    /// Cryptographic operation errors
    Crypto(String),
    /// Mining engine errors
    Mining(String),
    /// Serialization/deserialization errors
    Serialization(String),
    /// File I/O errors
    Io(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::MalformedInput(msg) => write!(f, "Malformed input: {msg}"),
            LedgerError::InsufficientBalance {
                required,
                available,
            } => {
                write!(
                    f,
                    "Insufficient balance: required {required}, available {available}"
                )
            }
            LedgerError::InvalidKeyPair(msg) => write!(f, "Invalid key pair: {msg}"),
            LedgerError::BlockIndexOutOfRange(index) => {
                write!(f, "Block {index} doesn't exist")
            }
            LedgerError::Crypto(msg) => write!(f, "Cryptographic error: {msg}"),
            LedgerError::Mining(msg) => write!(f, "Mining error: {msg}"),
            LedgerError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            LedgerError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}
