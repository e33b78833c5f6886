use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::canonical;
use crate::transaction::Transaction;

/// A single block: a batch of transactions linked to its predecessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub nonce: u64,
    pub previous_hash: String,
    pub timestamp: f64, // Unix seconds (UTC), microsecond precision
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Create a block stamped with the current time.
    pub fn new(nonce: u64, previous_hash: String, transactions: Vec<Transaction>) -> Self {
        Self {
            nonce,
            previous_hash,
            timestamp: now_secs(),
            transactions,
        }
    }

    /// Canonical hash over all four fields.
    pub fn hash(&self) -> String {
        canonical::hash(self)
    }

    pub fn is_genesis_shaped(&self) -> bool {
        self.nonce == 0 && self.previous_hash == canonical::empty_record_hash()
    }
}

fn now_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_covers_every_field() {
        let block = Block::new(7, "prev".into(), vec![Transaction::new("A", "B", 1.0)]);
        let base = block.hash();
        assert_eq!(base, block.clone().hash());

        let mut other = block.clone();
        other.nonce += 1;
        assert_ne!(base, other.hash());

        let mut other = block.clone();
        other.timestamp += 1.0;
        assert_ne!(base, other.hash());

        let mut other = block.clone();
        other.transactions[0].value = 1.5;
        assert_ne!(base, other.hash());

        let mut other = block;
        other.previous_hash.push('x');
        assert_ne!(base, other.hash());
    }

    #[test]
    fn hash_matches_sorted_json_form() {
        let block = Block {
            nonce: 3,
            previous_hash: "abc".into(),
            timestamp: 1.5,
            transactions: vec![],
        };
        let expected = hex::encode(canonical::sha256(
            br#"{"nonce": 3, "previous_hash": "abc", "timestamp": 1.5, "transactions": []}"#,
        ));
        assert_eq!(block.hash(), expected);
    }
}
