use crate::core::mining::{MiningEngine, SOLO_WORKER_TAG};
use crate::core::{MerkleTree, Transaction};
use crate::error::Result;
use crate::utils::{current_timestamp, sha256_hex};
use log::info;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Base miner credit before collected fees
pub const BASE_REWARD: f64 = 7.0;

/// The header fields that feed the block hash. Mining varies only the
/// nonce and worker tag against this template.
#[derive(Debug, Clone)]
pub struct BlockHeader {
    pub index: u64,
    pub timestamp: i64,
    pub previous_hash: String,
    pub difficulty: u32,
    pub base_reward: f64,
    pub merkle_root: String,
}

impl BlockHeader {
    /// Hash of the header with a candidate nonce and worker tag.
    /// The hex form of this digest is what the difficulty target inspects.
    pub fn hash_with(&self, nonce: u64, worker_tag: i64) -> String {
        let input = format!(
            "{}{}{}{}{}{}{}{}",
            self.index,
            self.timestamp,
            self.previous_hash,
            nonce,
            worker_tag,
            self.difficulty,
            self.base_reward,
            self.merkle_root,
        );
        sha256_hex(input.as_bytes())
    }
}

/// A mined block: header plus its ordered transaction batch
///
/// Frozen once construction returns; no partially mined block is ever
/// observable outside `Block::new`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    index: u64,
    timestamp: i64,
    previous_hash: String,
    nonce: u64,
    worker_tag: i64,
    miner_address: String,
    difficulty: u32,
    base_reward: f64,
    cumulative_fees: f64,
    merkle_root: String,
    hash: String,
    transactions: Vec<Transaction>,
}

impl Block {
    /// Assemble and mine a block on top of `predecessor`.
    ///
    /// Fees are summed over the selected transactions, the synthetic reward
    /// transaction is appended last, the Merkle root is computed over the
    /// final batch, and the mining engine fills in nonce/worker tag/hash.
    pub fn new(
        predecessor: &Block,
        selected_transactions: Vec<Transaction>,
        miner_address: &str,
        difficulty: u32,
        worker_count: usize,
    ) -> Result<Block> {
        let mut transactions = selected_transactions;
        let cumulative_fees: f64 = transactions.iter().map(|tx| tx.get_fee()).sum();
        let reward = Transaction::new_reward(miner_address, BASE_REWARD + cumulative_fees)?;
        transactions.push(reward);

        let merkle_root = Self::merkle_root_of(&transactions);

        let header = BlockHeader {
            index: predecessor.index + 1,
            timestamp: current_timestamp()?,
            previous_hash: predecessor.hash.clone(),
            difficulty,
            base_reward: BASE_REWARD,
            merkle_root,
        };

        info!(
            "Mining block {} with {} transactions (difficulty: {difficulty}, workers: {worker_count})",
            header.index,
            transactions.len(),
        );
        let started = Instant::now();
        let outcome = MiningEngine::mine(&header, difficulty, worker_count)?;
        info!(
            "Mined block {} in {:.3}s: {} (worker {})",
            header.index,
            started.elapsed().as_secs_f64(),
            outcome.hash,
            outcome.worker_tag,
        );

        Ok(Block {
            index: header.index,
            timestamp: header.timestamp,
            previous_hash: header.previous_hash,
            nonce: outcome.nonce,
            worker_tag: outcome.worker_tag,
            miner_address: miner_address.to_string(),
            difficulty,
            base_reward: BASE_REWARD,
            cumulative_fees,
            merkle_root: header.merkle_root,
            hash: outcome.hash,
            transactions,
        })
    }

    /// The one block with index 0: empty batch, empty previous hash and
    /// Merkle root, hash computed once with the solo worker tag as marker.
    pub fn genesis() -> Result<Block> {
        let header = BlockHeader {
            index: 0,
            timestamp: current_timestamp()?,
            previous_hash: String::new(),
            difficulty: 0,
            base_reward: BASE_REWARD,
            merkle_root: String::new(),
        };
        let hash = header.hash_with(0, SOLO_WORKER_TAG);

        Ok(Block {
            index: 0,
            timestamp: header.timestamp,
            previous_hash: String::new(),
            nonce: 0,
            worker_tag: SOLO_WORKER_TAG,
            miner_address: String::new(),
            difficulty: 0,
            base_reward: BASE_REWARD,
            cumulative_fees: 0.0,
            merkle_root: String::new(),
            hash,
            transactions: Vec::new(),
        })
    }

    fn merkle_root_of(transactions: &[Transaction]) -> String {
        let hashes: Vec<String> = transactions
            .iter()
            .map(|tx| tx.get_content_hash().to_string())
            .collect();
        MerkleTree::root(&hashes)
    }

    /// Rebuild the header template from the stored fields
    pub fn header(&self) -> BlockHeader {
        BlockHeader {
            index: self.index,
            timestamp: self.timestamp,
            previous_hash: self.previous_hash.clone(),
            difficulty: self.difficulty,
            base_reward: self.base_reward,
            merkle_root: self.merkle_root.clone(),
        }
    }

    /// Header hash recomputed from the stored nonce and worker tag
    pub fn recompute_hash(&self) -> String {
        self.header().hash_with(self.nonce, self.worker_tag)
    }

    /// Merkle root recomputed from the stored transaction batch
    pub fn recompute_merkle_root(&self) -> String {
        Self::merkle_root_of(&self.transactions)
    }

    pub fn get_index(&self) -> u64 {
        self.index
    }

    pub fn get_timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn get_previous_hash(&self) -> &str {
        self.previous_hash.as_str()
    }

    pub fn get_nonce(&self) -> u64 {
        self.nonce
    }

    pub fn get_worker_tag(&self) -> i64 {
        self.worker_tag
    }

    pub fn get_miner_address(&self) -> &str {
        self.miner_address.as_str()
    }

    pub fn get_difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn get_base_reward(&self) -> f64 {
        self.base_reward
    }

    pub fn get_cumulative_fees(&self) -> f64 {
        self.cumulative_fees
    }

    pub fn get_merkle_root(&self) -> &str {
        self.merkle_root.as_str()
    }

    pub fn get_hash(&self) -> &str {
        self.hash.as_str()
    }

    pub fn get_transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    /// Human-readable block report for the query surface
    pub fn info(&self) -> String {
        let mut out = format!(
            "== BLOCK START ==\n\
             Block index: {}\t\tTimestamp: {}\n\
             Previous Hash: {}\n\
             Hash: {}\n\
             Merkle Root: {}\n\
             Nonce: {}\n\
             Worker Tag: {}\n\
             Difficulty: {}\n\
             Miner Address: {}\n\
             Reward: {}\t\tCumulative Fees: {}\n\n\
             = TRANSACTIONS =",
            self.index,
            self.timestamp,
            self.previous_hash,
            self.hash,
            self.merkle_root,
            self.nonce,
            self.worker_tag,
            self.difficulty,
            self.miner_address,
            self.base_reward,
            self.cumulative_fees,
        );
        for tx in &self.transactions {
            out.push_str("\n\n");
            out.push_str(&tx.info());
        }
        out.push_str("\n== BLOCK END ==");
        out
    }

    #[cfg(test)]
    pub(crate) fn set_nonce_for_test(&mut self, nonce: u64) {
        self.nonce = nonce;
    }

    #[cfg(test)]
    pub(crate) fn set_merkle_root_for_test(&mut self, merkle_root: String) {
        self.merkle_root = merkle_root;
    }

    #[cfg(test)]
    pub(crate) fn set_previous_hash_for_test(&mut self, previous_hash: String) {
        self.previous_hash = previous_hash;
    }

    #[cfg(test)]
    pub(crate) fn transactions_mut_for_test(&mut self) -> &mut Vec<Transaction> {
        &mut self.transactions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transaction::REWARD_SENDER;

    #[test]
    fn test_genesis_shape() {
        let genesis = Block::genesis().unwrap();
        assert_eq!(genesis.get_index(), 0);
        assert_eq!(genesis.get_previous_hash(), "");
        assert_eq!(genesis.get_merkle_root(), "");
        assert!(genesis.get_transactions().is_empty());
        assert_eq!(genesis.get_worker_tag(), SOLO_WORKER_TAG);
        assert_eq!(genesis.recompute_hash(), genesis.get_hash());
    }

    #[test]
    fn test_mined_block_satisfies_invariants() {
        let genesis = Block::genesis().unwrap();
        let tx = Transaction::new_unsigned("A", "B", 10.0, 1.0, 1000);
        let block = Block::new(&genesis, vec![tx], "miner", 1, 1).unwrap();

        assert_eq!(block.get_index(), 1);
        assert_eq!(block.get_previous_hash(), genesis.get_hash());
        assert!(block.get_hash().starts_with('0'));
        assert_eq!(block.recompute_hash(), block.get_hash());
        assert_eq!(block.recompute_merkle_root(), block.get_merkle_root());
        assert_eq!(block.get_cumulative_fees(), 1.0);

        // Reward transaction is always last: base reward plus fees
        let reward = block.get_transactions().last().unwrap();
        assert_eq!(reward.get_sender_address(), REWARD_SENDER);
        assert_eq!(reward.get_recipient_address(), "miner");
        assert_eq!(reward.get_amount(), BASE_REWARD + 1.0);
        assert_eq!(reward.get_fee(), 0.0);
    }

    #[test]
    fn test_multi_worker_block() {
        let genesis = Block::genesis().unwrap();
        let block = Block::new(&genesis, vec![], "miner", 1, 3).unwrap();
        assert!(block.get_hash().starts_with('0'));
        assert!((1..=3).contains(&block.get_worker_tag()));
        assert_eq!(block.recompute_hash(), block.get_hash());
        // Empty selection still carries the reward transaction
        assert_eq!(block.get_transactions().len(), 1);
        assert_eq!(block.get_cumulative_fees(), 0.0);
    }

    #[test]
    fn test_fee_accumulation() {
        let genesis = Block::genesis().unwrap();
        let txs = vec![
            Transaction::new_unsigned("A", "B", 10.0, 1.5, 1000),
            Transaction::new_unsigned("B", "C", 5.0, 0.5, 1001),
        ];
        let block = Block::new(&genesis, txs, "miner", 0, 1).unwrap();
        assert_eq!(block.get_cumulative_fees(), 2.0);
        let reward = block.get_transactions().last().unwrap();
        assert_eq!(reward.get_amount(), BASE_REWARD + 2.0);
    }
}
