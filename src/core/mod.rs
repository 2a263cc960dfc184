//! Core ledger functionality
//!
//! This module contains the fundamental ledger components including
//! blocks, transactions, mining, pool selection, chain validation and
//! difficulty control.

pub mod block;
pub mod difficulty;
pub mod ledger;
pub mod merkle;
pub mod mining;
pub mod selection;
pub mod transaction;
pub mod validation;

pub use block::{Block, BlockHeader, BASE_REWARD};
pub use difficulty::{DifficultyController, MiningPolicy, DEFAULT_DIFFICULTY};
pub use ledger::Ledger;
pub use merkle::MerkleTree;
pub use mining::{MiningEngine, MiningOutcome, SOLO_WORKER_TAG};
pub use selection::{SelectionMode, TransactionSelector};
pub use transaction::{Transaction, REWARD_SENDER};
pub use validation::{ChainFault, ChainValidator, FailureKind};
