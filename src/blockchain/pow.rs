//! Proof-of-work: brute-force nonce search over a candidate record
//! `{nonce, previous_hash, transactions}` (the timestamp is not part of the
//! proof). A nonce is valid when the candidate hash starts with `difficulty`
//! zero hex digits.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::canonical;
use crate::error::{ChainError, Result};
use crate::transaction::Transaction;

/// Attempts between cancellation / deadline checks.
const CHECK_EVERY: u64 = 1024;

/// Hex digits in a SHA-256 digest.
pub const MAX_DIFFICULTY: usize = 64;

#[derive(Serialize)]
struct ProofCandidate<'a> {
    nonce: u64,
    previous_hash: &'a str,
    transactions: &'a [Transaction],
}

#[derive(Serialize)]
struct Linkage<'a> {
    previous_hash: &'a str,
    transactions: &'a [Transaction],
}

/// Hash the candidate record and check its leading zero hex digits.
pub fn valid_proof(
    transactions: &[Transaction],
    previous_hash: &str,
    nonce: u64,
    difficulty: usize,
) -> bool {
    let guess = canonical::hash(&ProofCandidate {
        nonce,
        previous_hash,
        transactions,
    });
    meets_difficulty(&guess, difficulty)
}

pub fn meets_difficulty(hex_digest: &str, difficulty: usize) -> bool {
    hex_digest.len() >= difficulty && hex_digest.bytes().take(difficulty).all(|b| b == b'0')
}

/// A search over one snapshot of (transactions, previous hash).
///
/// The canonical bytes are built once; each attempt only splices the nonce in
/// front (`"nonce"` sorts ahead of the other two keys).
pub struct ProofOfWork {
    difficulty: usize,
    tail: Vec<u8>,
}

impl ProofOfWork {
    pub fn new(transactions: &[Transaction], previous_hash: &str, difficulty: usize) -> Self {
        let linkage = canonical::canonical_bytes(&Linkage {
            previous_hash,
            transactions,
        });
        Self {
            difficulty,
            tail: linkage[1..].to_vec(),
        }
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    fn candidate_digest(&self, nonce: u64) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(b"{\"nonce\": ");
        hasher.update(nonce.to_string().as_bytes());
        hasher.update(b", ");
        hasher.update(&self.tail);
        hasher.finalize().into()
    }

    pub fn is_valid(&self, nonce: u64) -> bool {
        if self.difficulty > MAX_DIFFICULTY {
            return false;
        }
        let digest = self.candidate_digest(nonce);
        (0..self.difficulty).all(|i| {
            let byte = digest[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            nibble == 0
        })
    }

    /// Smallest valid nonce, searching 0, 1, 2, ... without bound.
    pub fn search(&self) -> u64 {
        (0..=u64::MAX)
            .find(|nonce| self.is_valid(*nonce))
            .expect("nonce space exhausted")
    }

    /// Same search as [`ProofOfWork::search`], but gives up once `cancel` fires
    /// or `deadline` passes.
    pub fn run(&self, cancel: &CancellationToken, deadline: Option<Instant>) -> Result<u64> {
        for nonce in 0..=u64::MAX {
            if nonce % CHECK_EVERY == 0 {
                if cancel.is_cancelled() {
                    return Err(ChainError::MiningCancelled { attempts: nonce });
                }
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    return Err(ChainError::MiningTimedOut { attempts: nonce });
                }
            }
            if self.is_valid(nonce) {
                return Ok(nonce);
            }
        }
        Err(ChainError::NonceSpaceExhausted)
    }
}
