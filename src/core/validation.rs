use crate::core::{Block, MerkleTree};
use crate::wallet::verify_signature;
use std::fmt;

/// The check that failed for a block, in validation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// `previous_hash` does not match the predecessor's hash
    LinkageBroken,
    /// Recomputed Merkle root differs from the stored one
    MerkleMismatch,
    /// Recomputed header hash differs from the stored one
    HashMismatch,
    /// A transaction signature is missing or does not verify
    InvalidTransaction,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::LinkageBroken => write!(f, "broken linkage"),
            FailureKind::MerkleMismatch => write!(f, "Merkle root mismatch"),
            FailureKind::HashMismatch => write!(f, "hash mismatch"),
            FailureKind::InvalidTransaction => write!(f, "invalid transaction"),
        }
    }
}

/// A validation failure with the offending block's index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainFault {
    pub kind: FailureKind,
    pub index: u64,
}

impl fmt::Display for ChainFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid blockchain: {} in block {}", self.kind, self.index)
    }
}

/// Walks a chain verifying linkage, Merkle roots, hashes and signatures
pub struct ChainValidator;

impl ChainValidator {
    /// Validate the whole chain, stopping at the first failing block.
    /// Never mutates anything.
    pub fn validate(blocks: &[Block]) -> Result<(), ChainFault> {
        // A genesis-only chain has nothing to link; its (empty) Merkle
        // root is still checked.
        if blocks.len() <= 1 {
            if let Some(genesis) = blocks.first() {
                Self::check_merkle_root(genesis)?;
            }
            return Ok(());
        }

        for i in 1..blocks.len() {
            let block = &blocks[i];
            if block.get_previous_hash() != blocks[i - 1].get_hash() {
                return Err(ChainFault {
                    kind: FailureKind::LinkageBroken,
                    index: block.get_index(),
                });
            }
            Self::check_merkle_root(block)?;
            if block.recompute_hash() != block.get_hash() {
                return Err(ChainFault {
                    kind: FailureKind::HashMismatch,
                    index: block.get_index(),
                });
            }
            Self::check_transactions(block)?;
        }
        Ok(())
    }

    fn check_merkle_root(block: &Block) -> Result<(), ChainFault> {
        let hashes: Vec<String> = block
            .get_transactions()
            .iter()
            .map(|tx| tx.get_content_hash().to_string())
            .collect();
        if MerkleTree::root(&hashes) != block.get_merkle_root() {
            return Err(ChainFault {
                kind: FailureKind::MerkleMismatch,
                index: block.get_index(),
            });
        }
        Ok(())
    }

    fn check_transactions(block: &Block) -> Result<(), ChainFault> {
        for tx in block.get_transactions() {
            // The synthetic reward transaction carries no signature
            if tx.is_reward() {
                continue;
            }
            let verified = match tx.get_signature() {
                Some(signature) => verify_signature(
                    tx.get_sender_address(),
                    tx.get_content_hash().as_bytes(),
                    signature,
                ),
                None => false,
            };
            if !verified {
                return Err(ChainFault {
                    kind: FailureKind::InvalidTransaction,
                    index: block.get_index(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Transaction;
    use crate::wallet::Wallet;

    fn mined_chain() -> Vec<Block> {
        let wallet = Wallet::new().unwrap();
        let genesis = Block::genesis().unwrap();
        let tx = Transaction::new(&wallet, "recipient", 10.0, 1.0).unwrap();
        let block1 = Block::new(&genesis, vec![tx], "miner", 1, 1).unwrap();
        let block2 = Block::new(&block1, vec![], "miner", 1, 1).unwrap();
        vec![genesis, block1, block2]
    }

    #[test]
    fn test_genesis_only_chain_is_valid() {
        let chain = vec![Block::genesis().unwrap()];
        assert!(ChainValidator::validate(&chain).is_ok());
    }

    #[test]
    fn test_untampered_chain_is_valid() {
        assert!(ChainValidator::validate(&mined_chain()).is_ok());
    }

    #[test]
    fn test_broken_linkage_detected() {
        let mut chain = mined_chain();
        chain[2].set_previous_hash_for_test("bogus".to_string());
        assert_eq!(
            ChainValidator::validate(&chain),
            Err(ChainFault {
                kind: FailureKind::LinkageBroken,
                index: 2,
            })
        );
    }

    #[test]
    fn test_tampered_amount_detected_as_merkle_mismatch() {
        let mut chain = mined_chain();
        chain[1].transactions_mut_for_test()[0].set_amount_for_test(1_000_000.0);
        assert_eq!(
            ChainValidator::validate(&chain),
            Err(ChainFault {
                kind: FailureKind::MerkleMismatch,
                index: 1,
            })
        );
    }

    #[test]
    fn test_tampered_nonce_detected_as_hash_mismatch() {
        let mut chain = mined_chain();
        let nonce = chain[1].get_nonce();
        chain[1].set_nonce_for_test(nonce + 1);
        assert_eq!(
            ChainValidator::validate(&chain),
            Err(ChainFault {
                kind: FailureKind::HashMismatch,
                index: 1,
            })
        );
    }

    #[test]
    fn test_merkle_checked_before_hash() {
        // Tampering the stored root breaks both checks; the Merkle check
        // must win because it runs first.
        let mut chain = mined_chain();
        chain[1].set_merkle_root_for_test("bogus".to_string());
        assert_eq!(
            ChainValidator::validate(&chain),
            Err(ChainFault {
                kind: FailureKind::MerkleMismatch,
                index: 1,
            })
        );
    }

    #[test]
    fn test_unsigned_transaction_detected() {
        let genesis = Block::genesis().unwrap();
        let unsigned = Transaction::new_unsigned("A", "B", 10.0, 1.0, 1000);
        let block = Block::new(&genesis, vec![unsigned], "miner", 0, 1).unwrap();
        let chain = vec![genesis, block];
        assert_eq!(
            ChainValidator::validate(&chain),
            Err(ChainFault {
                kind: FailureKind::InvalidTransaction,
                index: 1,
            })
        );
    }
}
