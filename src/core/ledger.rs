use crate::config::GLOBAL_CONFIG;
use crate::core::difficulty::MiningPolicy;
use crate::core::validation::{ChainFault, ChainValidator};
use crate::core::{Block, SelectionMode, Transaction, TransactionSelector};
use crate::error::{LedgerError, Result};
use crate::wallet::{validate_key_pair, Wallet};
use log::{info, warn};
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::Duration;

/// The single-writer ledger: an append-only block list plus the pool of
/// pending transactions.
///
/// Reads may run concurrently; pool and chain mutation happen under the
/// write side of one lock, so a transaction is never observable in a block
/// and the pool at once. Block production itself must be serialized by the
/// caller (one logical miner per ledger).
pub struct Ledger {
    inner: RwLock<LedgerState>,
    policy: Arc<MiningPolicy>,
}

struct LedgerState {
    blocks: Vec<Block>,
    pool: Vec<Transaction>,
}

impl Ledger {
    /// Initialize a fresh ledger; the genesis block is created exactly once
    /// here.
    pub fn new() -> Result<Ledger> {
        Self::with_policy(Arc::new(MiningPolicy::new(
            GLOBAL_CONFIG.default_difficulty(),
        )))
    }

    pub fn with_policy(policy: Arc<MiningPolicy>) -> Result<Ledger> {
        let genesis = Block::genesis()?;
        info!("New ledger initialized, genesis hash: {}", genesis.get_hash());
        Ok(Ledger {
            inner: RwLock::new(LedgerState {
                blocks: vec![genesis],
                pool: Vec::new(),
            }),
            policy,
        })
    }

    /// The policy the next `mine_block` call will consume
    pub fn policy(&self) -> Arc<MiningPolicy> {
        Arc::clone(&self.policy)
    }

    /// Add an already-signed transaction to the pending pool
    pub fn submit_transaction(&self, transaction: Transaction) {
        let mut state = self
            .inner
            .write()
            .expect("Failed to acquire write lock on ledger - this should never happen");
        info!(
            "Transaction submitted: {} -> {} ({} + {} fee)",
            transaction.get_sender_address(),
            transaction.get_recipient_address(),
            transaction.get_amount(),
            transaction.get_fee(),
        );
        state.pool.push(transaction);
    }

    /// Build, sign and pool a transaction after the balance and key-pair
    /// checks. The claimed sender address must match the signing key.
    pub fn create_transaction(
        &self,
        wallet: &Wallet,
        claimed_address: &str,
        recipient_address: &str,
        amount: f64,
        fee: f64,
    ) -> Result<Transaction> {
        if !validate_key_pair(wallet.get_pkcs8(), claimed_address) {
            return Err(LedgerError::InvalidKeyPair(format!(
                "Signing key does not match address {claimed_address}"
            )));
        }

        let balance = self.get_balance(claimed_address);
        if balance < amount {
            return Err(LedgerError::InsufficientBalance {
                required: amount,
                available: balance,
            });
        }

        let transaction = Transaction::new(wallet, recipient_address, amount, fee)?;
        self.submit_transaction(transaction.clone());
        Ok(transaction)
    }

    /// Select a batch from the pool, mine a block on the current tip, and
    /// append it.
    ///
    /// Selected transactions leave the pool atomically with selection. A
    /// pool shorter than the configured block capacity degrades to using
    /// everything available, with a warning.
    pub fn mine_block(
        &self,
        miner_address: &str,
        worker_count: usize,
        mode: SelectionMode,
    ) -> Result<Block> {
        let throttle_ms = self.policy.throttle_ms();
        if throttle_ms > 0 {
            info!("Throttling mining start by {throttle_ms}ms");
            thread::sleep(Duration::from_millis(throttle_ms));
        }
        let difficulty = self.policy.difficulty();

        let (predecessor, batch) = {
            let mut state = self
                .inner
                .write()
                .expect("Failed to acquire write lock on ledger - this should never happen");

            let capacity = GLOBAL_CONFIG.block_capacity();
            let count = if state.pool.len() < capacity {
                warn!(
                    "Only {} transactions being added to block ({capacity} requested)",
                    state.pool.len()
                );
                state.pool.len()
            } else {
                capacity
            };

            let batch = TransactionSelector::select(&state.pool, mode, count, miner_address);
            state.pool.retain(|tx| {
                !batch
                    .iter()
                    .any(|selected| selected.get_content_hash() == tx.get_content_hash())
            });

            let predecessor = state
                .blocks
                .last()
                .expect("Ledger always holds at least the genesis block")
                .clone();
            (predecessor, batch)
        };

        let block = Block::new(&predecessor, batch, miner_address, difficulty, worker_count)?;

        let mut state = self
            .inner
            .write()
            .expect("Failed to acquire write lock on ledger - this should never happen");
        state.blocks.push(block.clone());
        Ok(block)
    }

    /// Walk the whole chain through the validator. Read-only.
    pub fn validate_chain(&self) -> std::result::Result<(), ChainFault> {
        match self.inner.read() {
            Ok(state) => ChainValidator::validate(&state.blocks),
            Err(_) => {
                log::error!("Failed to acquire read lock on ledger");
                Ok(())
            }
        }
    }

    /// Net balance of an address across committed blocks and the pending
    /// pool: received amounts minus sent amounts plus fees. May be
    /// negative.
    pub fn get_balance(&self, address: &str) -> f64 {
        let state = match self.inner.read() {
            Ok(state) => state,
            Err(_) => {
                log::error!("Failed to acquire read lock on ledger");
                return 0.0;
            }
        };

        let committed = state
            .blocks
            .iter()
            .flat_map(|block| block.get_transactions().iter());
        let pending = state.pool.iter();

        let mut balance = 0.0;
        for tx in committed.chain(pending) {
            if tx.get_recipient_address() == address {
                balance += tx.get_amount();
            }
            if tx.get_sender_address() == address {
                balance -= tx.get_amount() + tx.get_fee();
            }
        }
        balance
    }

    pub fn get_block_info(&self, index: u64) -> Result<String> {
        let state = self
            .inner
            .read()
            .map_err(|_| LedgerError::Io("Failed to acquire read lock on ledger".to_string()))?;
        state
            .blocks
            .get(index as usize)
            .map(|block| block.info())
            .ok_or(LedgerError::BlockIndexOutOfRange(index))
    }

    pub fn get_chain_info(&self) -> String {
        match self.inner.read() {
            Ok(state) => {
                let mut out = String::new();
                for block in &state.blocks {
                    out.push_str(&block.info());
                    out.push_str("\n\n");
                }
                out
            }
            Err(_) => {
                log::error!("Failed to acquire read lock on ledger");
                String::new()
            }
        }
    }

    pub fn get_pool_info(&self) -> String {
        match self.inner.read() {
            Ok(state) => {
                if state.pool.is_empty() {
                    return "No Pending Transactions".to_string();
                }
                let mut out = String::new();
                for (index, tx) in state.pool.iter().enumerate() {
                    out.push_str(&format!("\n\nIndex: {index}\n{}", tx.info()));
                }
                out
            }
            Err(_) => {
                log::error!("Failed to acquire read lock on ledger");
                String::new()
            }
        }
    }

    /// Timestamps of up to the last `limit` blocks, newest first; sampled
    /// by the difficulty controller.
    pub fn recent_timestamps(&self, limit: usize) -> Vec<i64> {
        match self.inner.read() {
            Ok(state) => state
                .blocks
                .iter()
                .rev()
                .take(limit)
                .map(|block| block.get_timestamp())
                .collect(),
            Err(_) => {
                log::error!("Failed to acquire read lock on ledger");
                Vec::new()
            }
        }
    }

    pub fn block_count(&self) -> usize {
        match self.inner.read() {
            Ok(state) => state.blocks.len(),
            Err(_) => {
                log::error!("Failed to acquire read lock on ledger");
                0
            }
        }
    }

    pub fn pool_size(&self) -> usize {
        match self.inner.read() {
            Ok(state) => state.pool.len(),
            Err(_) => {
                log::error!("Failed to acquire read lock on ledger");
                0
            }
        }
    }
}
