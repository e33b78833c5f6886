use serde::{Deserialize, Serialize};

use super::MINING_SENDER;
use crate::canonical;

/// A value transfer between two blockchain addresses.
///
/// Fields are declared in canonical (sorted) key order; hashing sorts them
/// regardless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub recipient_blockchain_address: String,
    pub sender_blockchain_address: String,
    pub value: f64,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, value: f64) -> Self {
        Self {
            recipient_blockchain_address: recipient.into(),
            sender_blockchain_address: sender.into(),
            value,
        }
    }

    /// Reward paid by the reserved system sender.
    pub fn reward(recipient: impl Into<String>, value: f64) -> Self {
        Self::new(MINING_SENDER, recipient, value)
    }

    pub fn is_reward(&self) -> bool {
        self.sender_blockchain_address == MINING_SENDER
    }

    /// Canonical signing payload (sorted-key JSON of the record).
    pub fn signing_payload(&self) -> Vec<u8> {
        canonical::canonical_bytes(self)
    }

    /// SHA-256 of the signing payload. This is the message a wallet signs.
    pub fn sighash(&self) -> [u8; 32] {
        canonical::sha256(&self.signing_payload())
    }
}

/// A transaction together with the material needed to admit it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub sender_public_key: String,
    pub signature: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signing_payload_is_sorted_json() {
        let tx = Transaction::new("A", "B", 2.0);
        assert_eq!(
            String::from_utf8(tx.signing_payload()).unwrap(),
            r#"{"recipient_blockchain_address": "B", "sender_blockchain_address": "A", "value": 2.0}"#
        );
    }

    #[test]
    fn sighash_tracks_content() {
        let tx = Transaction::new("A", "B", 2.0);
        let tampered = Transaction::new("A", "B", 2.5);
        assert_eq!(tx.sighash(), Transaction::new("A", "B", 2.0).sighash());
        assert_ne!(tx.sighash(), tampered.sighash());
    }

    #[test]
    fn reward_comes_from_reserved_sender() {
        let tx = Transaction::reward("miner", 1.0);
        assert!(tx.is_reward());
        assert!(!Transaction::new("A", "miner", 1.0).is_reward());
    }
}
