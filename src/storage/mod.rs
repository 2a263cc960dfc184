//! Operator-facing persistence
//!
//! The ledger is in-memory by design; this module only covers the
//! append-only transaction audit log.

pub mod tx_log;

pub use tx_log::TransactionLog;
