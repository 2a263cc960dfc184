//! # Pow Ledger - A Single-Writer Proof-of-Work Ledger
//!
//! A minimal in-memory ledger with one logical miner: no networking, no
//! consensus between peers, no persistent chain storage.
//!
//! ## What It Does
//! - **Proof of Work**: parallel nonce search over disjoint worker spaces
//!   with cooperative cancellation on first success
//! - **Transactions**: ECDSA P-256 signed transfers with per-transaction
//!   fees, pooled until selected into a block
//! - **Selection Strategies**: greedy by fee, uniform random, oldest-first
//!   and address-affinity batch selection
//! - **Validation**: full-chain walk checking linkage, Merkle roots,
//!   header hashes and transaction signatures
//! - **Difficulty Control**: a feedback loop steering difficulty and an
//!   artificial throttle toward a target block interval
//!
//! ## How The Code Is Organized
//! - `core/`: blocks, transactions, mining, selection, validation,
//!   difficulty control and the ledger itself
//! - `wallet/`: key management, address generation, signing
//! - `storage/`: the append-only transaction audit log
//! - `config/`: environment-backed settings
//! - `utils/`: digests, encoding helpers, timestamps
//! - `cli/`: command-line interface
//!
//! Start with `main.rs` for the CLI commands, then `core/ledger.rs` for
//! the pool and chain logic.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod storage;
pub mod utils;
pub mod wallet;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt, SelectionModeArg};
pub use config::{Config, GLOBAL_CONFIG};
pub use core::{
    Block, BlockHeader, ChainFault, ChainValidator, DifficultyController, FailureKind, Ledger,
    MerkleTree, MiningEngine, MiningOutcome, MiningPolicy, SelectionMode, Transaction,
    TransactionSelector, BASE_REWARD, DEFAULT_DIFFICULTY, REWARD_SENDER, SOLO_WORKER_TAG,
};
pub use error::{LedgerError, Result};
pub use storage::TransactionLog;
pub use utils::{
    base58_decode, base58_encode, current_timestamp, ecdsa_p256_sha256_sign_digest,
    ecdsa_p256_sha256_sign_verify, new_key_pair, sha256_digest, sha256_hex,
};
pub use wallet::{validate_key_pair, verify_signature, Wallet};
