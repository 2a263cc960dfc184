use crate::core::Transaction;
use crate::error::{LedgerError, Result};
use rand::Rng;
use std::cmp::Ordering;

/// Pool selection policies for assembling a block's transaction batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Highest fee first
    Greedy,
    /// Uniform sample without replacement
    Random,
    /// Oldest timestamp first
    Altruistic,
    /// Transactions involving a chosen address, backfilled from the pool
    Affinity,
}

impl SelectionMode {
    pub fn from_index(index: u8) -> Result<SelectionMode> {
        match index {
            0 => Ok(SelectionMode::Greedy),
            1 => Ok(SelectionMode::Random),
            2 => Ok(SelectionMode::Altruistic),
            3 => Ok(SelectionMode::Affinity),
            _ => Err(LedgerError::MalformedInput(format!(
                "Unknown selection mode: {index}"
            ))),
        }
    }
}

/// Chooses a bounded subset of the pool under one policy
pub struct TransactionSelector;

impl TransactionSelector {
    /// Select exactly `count` transactions from `pool`.
    ///
    /// Requires `count <= pool.len()`; callers clamp first. A full-pool
    /// request returns the pool in its original order regardless of mode.
    /// Mode-specific passes that come up short (possible only for
    /// affinity) are backfilled from the rest of the pool in original
    /// order.
    pub fn select(
        pool: &[Transaction],
        mode: SelectionMode,
        count: usize,
        affinity_address: &str,
    ) -> Vec<Transaction> {
        if count == pool.len() {
            return pool.to_vec();
        }

        let mut selected = match mode {
            SelectionMode::Greedy => {
                let mut ordered = pool.to_vec();
                ordered.sort_by(|a, b| {
                    b.get_fee()
                        .partial_cmp(&a.get_fee())
                        .unwrap_or(Ordering::Equal)
                });
                ordered.truncate(count);
                ordered
            }
            SelectionMode::Random => {
                let mut remaining: Vec<&Transaction> = pool.iter().collect();
                let mut rng = rand::thread_rng();
                let mut picked = Vec::with_capacity(count);
                for _ in 0..count {
                    let idx = rng.gen_range(0..remaining.len());
                    picked.push(remaining.remove(idx).clone());
                }
                picked
            }
            SelectionMode::Altruistic => {
                let mut ordered = pool.to_vec();
                ordered.sort_by_key(|tx| tx.get_timestamp());
                ordered.truncate(count);
                ordered
            }
            SelectionMode::Affinity => {
                let mut picked = Vec::with_capacity(count);
                for tx in pool {
                    if tx.get_sender_address() == affinity_address
                        || tx.get_recipient_address() == affinity_address
                    {
                        picked.push(tx.clone());
                    }
                    if picked.len() == count {
                        break;
                    }
                }
                picked
            }
        };

        if selected.len() < count {
            Self::backfill(pool, &mut selected, count);
        }
        selected
    }

    fn backfill(pool: &[Transaction], selected: &mut Vec<Transaction>, count: usize) {
        for tx in pool {
            if selected.len() == count {
                break;
            }
            let already_selected = selected
                .iter()
                .any(|s| s.get_content_hash() == tx.get_content_hash());
            if !already_selected {
                selected.push(tx.clone());
            }
        }
    }
}
