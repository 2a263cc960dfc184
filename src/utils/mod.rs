//! Utility functions and helpers
//!
//! Cryptographic digests, encoding helpers, and timestamps used
//! throughout the ledger.

pub mod crypto;

pub use crypto::{
    base58_decode, base58_encode, current_timestamp, ecdsa_p256_sha256_sign_digest,
    ecdsa_p256_sha256_sign_verify, hex_decode, new_key_pair, sha256_digest, sha256_hex,
};
