use crate::error::Result;
use crate::utils::{current_timestamp, sha256_hex};
use crate::wallet::Wallet;
use data_encoding::HEXLOWER;
use serde::{Deserialize, Serialize};

/// Sender marker for the synthetic reward transaction appended to every
/// mined block. Never a real address, never drawn from the pool.
pub const REWARD_SENDER: &str = "MINE-REWARDS";

/// A signed value transfer, immutable after construction
///
/// The content hash covers everything except the signature; the signature
/// is produced exactly once at creation and never refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    sender_address: String,
    recipient_address: String,
    amount: f64,
    fee: f64,
    timestamp: i64,
    content_hash: String,
    signature: Option<Vec<u8>>,
}

impl Transaction {
    /// Create and sign a transaction with the sender's wallet
    pub fn new(wallet: &Wallet, recipient_address: &str, amount: f64, fee: f64) -> Result<Transaction> {
        let sender_address = wallet.address();
        let timestamp = current_timestamp()?;
        let content_hash =
            Self::compute_content_hash(&sender_address, recipient_address, timestamp, amount, fee);
        let signature = wallet.sign(content_hash.as_bytes())?;

        Ok(Transaction {
            sender_address,
            recipient_address: recipient_address.to_string(),
            amount,
            fee,
            timestamp,
            content_hash,
            signature: Some(signature),
        })
    }

    /// The synthetic miner-credit transaction. Carries no signature; the
    /// validator recognizes it by its sender marker.
    pub fn new_reward(miner_address: &str, amount: f64) -> Result<Transaction> {
        let timestamp = current_timestamp()?;
        let content_hash =
            Self::compute_content_hash(REWARD_SENDER, miner_address, timestamp, amount, 0.0);

        Ok(Transaction {
            sender_address: REWARD_SENDER.to_string(),
            recipient_address: miner_address.to_string(),
            amount,
            fee: 0.0,
            timestamp,
            content_hash,
            signature: None,
        })
    }

    fn compute_content_hash(
        sender: &str,
        recipient: &str,
        timestamp: i64,
        amount: f64,
        fee: f64,
    ) -> String {
        sha256_hex(format!("{sender}{recipient}{timestamp}{amount}{fee}").as_bytes())
    }

    /// Recompute the content hash from the stored fields
    pub fn recompute_content_hash(&self) -> String {
        Self::compute_content_hash(
            &self.sender_address,
            &self.recipient_address,
            self.timestamp,
            self.amount,
            self.fee,
        )
    }

    pub fn is_reward(&self) -> bool {
        self.sender_address == REWARD_SENDER
    }

    pub fn get_sender_address(&self) -> &str {
        self.sender_address.as_str()
    }

    pub fn get_recipient_address(&self) -> &str {
        self.recipient_address.as_str()
    }

    pub fn get_amount(&self) -> f64 {
        self.amount
    }

    pub fn get_fee(&self) -> f64 {
        self.fee
    }

    pub fn get_timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn get_content_hash(&self) -> &str {
        self.content_hash.as_str()
    }

    pub fn get_signature(&self) -> Option<&[u8]> {
        self.signature.as_deref()
    }

    /// Human-readable form, mirrored into the transaction log
    pub fn info(&self) -> String {
        let signature = match &self.signature {
            Some(sig) => HEXLOWER.encode(sig.as_slice()),
            None => "null".to_string(),
        };
        format!(
            "[TRANSACTION START]\n\
             Transaction Hash: {}\n\
             Digital Signature: {}\n\
             Timestamp: {}\n\
             Transferred: {}\n\
             Fees: {}\n\
             Sender Address: {}\n\
             Recipient Address: {}\n\
             [TRANSACTION END]",
            self.content_hash,
            signature,
            self.timestamp,
            self.amount,
            self.fee,
            self.sender_address,
            self.recipient_address,
        )
    }

    /// Test-only constructor with a pinned timestamp and no signature
    #[cfg(test)]
    pub(crate) fn new_unsigned(
        sender_address: &str,
        recipient_address: &str,
        amount: f64,
        fee: f64,
        timestamp: i64,
    ) -> Transaction {
        let content_hash =
            Self::compute_content_hash(sender_address, recipient_address, timestamp, amount, fee);
        Transaction {
            sender_address: sender_address.to_string(),
            recipient_address: recipient_address.to_string(),
            amount,
            fee,
            timestamp,
            content_hash,
            signature: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn set_amount_for_test(&mut self, amount: f64) {
        self.amount = amount;
    }
}
