//! Key management and signing
//!
//! The ledger core never signs anything itself; it only consumes this
//! module's `sign` / `verify_signature` / `validate_key_pair` contract.

pub mod wallet;

pub use wallet::{validate_key_pair, verify_signature, Wallet};
