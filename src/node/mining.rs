use std::time::Instant;

use log::{debug, info, warn};

use super::{Node, try_guard};
use crate::blockchain::ProofOfWork;
use crate::transaction::MINING_SENDER;

impl Node {
    /// One mining cycle: inject the reward, prove the pool snapshot off-lock,
    /// then seal it. Returns `false` without touching the chain when the pool
    /// is empty or the search is abandoned.
    pub fn mining(&self) -> bool {
        let (candidate, difficulty) = {
            let mut ledger = self.ledger();
            if ledger.transaction_pool().is_empty() {
                debug!("MINER - pool empty, nothing to mine");
                return false;
            }
            ledger.add_transaction(
                MINING_SENDER,
                &self.config.miner_address,
                self.config.mining_reward,
                None,
                None,
            );
            (ledger.candidate(), ledger.difficulty())
        };

        let t0 = Instant::now();
        let pow = ProofOfWork::new(&candidate.transactions, &candidate.previous_hash, difficulty);
        let deadline = self.config.mining_timeout.map(|timeout| t0 + timeout);
        debug!(
            "MINER - searching nonce for {} txs at difficulty {}",
            candidate.transactions.len(),
            pow.difficulty()
        );

        let nonce = match pow.run(&self.shutdown, deadline) {
            Ok(nonce) => nonce,
            Err(e) => {
                warn!("MINER - proof-of-work abandoned: {e}");
                self.ledger().abandon(&candidate);
                return false;
            }
        };

        let mut ledger = self.ledger();
        let sealed = ledger
            .seal(&candidate, nonce)
            .map(|block| (block.hash(), block.transactions.len()));
        match sealed {
            Ok((hash, txs)) => {
                info!(
                    "MINER - sealed block #{} (hash={}, nonce={}, txs={}, {} ms)",
                    ledger.len() - 1,
                    hash,
                    nonce,
                    txs,
                    t0.elapsed().as_millis()
                );
                true
            }
            Err(e) => {
                warn!("MINER - could not seal block: {e}");
                ledger.abandon(&candidate);
                false
            }
        }
    }

    /// Guarded entry point used by the mining loop and the API: a no-op when
    /// another cycle holds the guard. The guard is released on every return.
    pub fn start_mining(&self) -> bool {
        let Some(_guard) = try_guard(&self.mining_guard, "MINER - mining cycle") else {
            return false;
        };
        self.mining()
    }
}
