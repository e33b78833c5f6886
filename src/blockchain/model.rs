use log::{debug, warn};

use super::pow::{ProofOfWork, valid_proof};
use super::Block;
use crate::canonical;
use crate::error::{ChainError, Result};
use crate::transaction::{SignedTransaction, Transaction};
use crate::wallet::verify_transaction_signature;

/// In-memory ledger: the chain of blocks plus the pool of pending
/// transactions waiting for the next block.
#[derive(Debug)]
pub struct Blockchain {
    chain: Vec<Block>,
    transaction_pool: Vec<Transaction>,
    difficulty: usize,
}

/// A copy of the pool and chain head taken when a proof search starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub transactions: Vec<Transaction>,
    pub previous_hash: String,
}

impl Blockchain {
    /// Initialize a new ledger with its genesis block.
    pub fn new(difficulty: usize) -> Self {
        let mut bc = Self {
            chain: Vec::new(),
            transaction_pool: Vec::new(),
            difficulty,
        };
        bc.create_block(0, canonical::empty_record_hash());
        bc
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn transaction_pool(&self) -> &[Transaction] {
        &self.transaction_pool
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("Blockchain should always have at least the genesis block")
    }

    /// Wrap the whole pool into a new block, append it and reset the pool.
    pub fn create_block(&mut self, nonce: u64, previous_hash: String) -> &Block {
        let transactions = std::mem::take(&mut self.transaction_pool);
        self.append(nonce, previous_hash, transactions)
    }

    fn append(
        &mut self,
        nonce: u64,
        previous_hash: String,
        transactions: Vec<Transaction>,
    ) -> &Block {
        self.chain.push(Block::new(nonce, previous_hash, transactions));
        self.last_block()
    }

    /// Admit a transaction into the pool.
    ///
    /// Rewards from [`crate::transaction::MINING_SENDER`] go in
    /// unconditionally; anything else needs a signature that verifies against
    /// `sender_public_key`. Sender balances are not checked.
    pub fn add_transaction(
        &mut self,
        sender_blockchain_address: &str,
        recipient_blockchain_address: &str,
        value: f64,
        sender_public_key: Option<&str>,
        signature: Option<&str>,
    ) -> bool {
        let transaction = Transaction::new(
            sender_blockchain_address,
            recipient_blockchain_address,
            value,
        );

        if transaction.is_reward() {
            self.transaction_pool.push(transaction);
            return true;
        }

        let verified = match (sender_public_key, signature) {
            (Some(key), Some(sig)) => verify_transaction_signature(key, sig, &transaction),
            _ => Err(ChainError::MissingSignature),
        };
        match verified {
            Ok(()) => {
                debug!(
                    "POOL - admitted {} -> {} ({}), pool size {}",
                    sender_blockchain_address,
                    recipient_blockchain_address,
                    value,
                    self.transaction_pool.len() + 1
                );
                self.transaction_pool.push(transaction);
                true
            }
            Err(e) => {
                warn!(
                    "POOL - rejected {} -> {} ({}): {}",
                    sender_blockchain_address, recipient_blockchain_address, value, e
                );
                false
            }
        }
    }

    pub fn create_transaction(&mut self, signed: &SignedTransaction) -> bool {
        let tx = &signed.transaction;
        self.add_transaction(
            &tx.sender_blockchain_address,
            &tx.recipient_blockchain_address,
            tx.value,
            Some(&signed.sender_public_key),
            Some(&signed.signature),
        )
    }

    /// Smallest nonce proving the current pool against the current head.
    pub fn proof_of_work(&self) -> u64 {
        let previous_hash = self.last_block().hash();
        ProofOfWork::new(&self.transaction_pool, &previous_hash, self.difficulty).search()
    }

    /// Snapshot the pool and head hash for an off-lock proof search.
    pub fn candidate(&self) -> Candidate {
        Candidate {
            transactions: self.transaction_pool.clone(),
            previous_hash: self.last_block().hash(),
        }
    }

    /// Append a block holding exactly the candidate's transactions.
    ///
    /// The pool only grows between blocks, so the candidate must still be its
    /// prefix; anything admitted during the search stays pending.
    pub fn seal(&mut self, candidate: &Candidate, nonce: u64) -> Result<&Block> {
        let n = candidate.transactions.len();
        if self.last_block().hash() != candidate.previous_hash
            || self.transaction_pool.get(..n) != Some(candidate.transactions.as_slice())
        {
            return Err(ChainError::StaleCandidate);
        }
        let transactions: Vec<Transaction> = self.transaction_pool.drain(..n).collect();
        Ok(self.append(nonce, candidate.previous_hash.clone(), transactions))
    }

    /// Withdraw the reward injected for a candidate whose search was abandoned.
    pub fn abandon(&mut self, candidate: &Candidate) {
        let Some(reward) = candidate.transactions.last().filter(|tx| tx.is_reward()) else {
            return;
        };
        let idx = candidate.transactions.len() - 1;
        if self.transaction_pool.get(idx) == Some(reward) {
            self.transaction_pool.remove(idx);
        }
    }

    /// Net amount for an address over every block: credits as recipient,
    /// debits as sender. Recomputed from the chain on each call.
    pub fn calculate_total_amount(&self, blockchain_address: &str) -> f64 {
        let mut total_amount = 0.0;
        for block in &self.chain {
            for tx in &block.transactions {
                if blockchain_address == tx.recipient_blockchain_address {
                    total_amount += tx.value;
                }
                if blockchain_address == tx.sender_blockchain_address {
                    total_amount -= tx.value;
                }
            }
        }
        total_amount
    }

    /// Validate the entire chain: genesis, linkage and PoW.
    pub fn is_valid_chain(&self) -> bool {
        let Some(genesis) = self.chain.first() else {
            return false;
        };
        if !genesis.is_genesis_shaped() {
            return false;
        }

        self.chain.windows(2).all(|pair| {
            let (prev, current) = (&pair[0], &pair[1]);
            current.previous_hash == prev.hash()
                && valid_proof(
                    &current.transactions,
                    &current.previous_hash,
                    current.nonce,
                    self.difficulty,
                )
        })
    }
}
