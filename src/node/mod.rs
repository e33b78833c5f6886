//! The engine shared by request handlers and the background loops.
//!
//! `Node` owns the ledger behind a mutex and exposes whole operations only
//! (admit, snapshot, seal, read totals). Two independent non-blocking guards
//! keep at most one mining cycle and one neighbour refresh in flight.

mod mining;
pub mod neighbours;
pub mod scheduler;

use std::net::SocketAddr;
use std::sync::{Mutex, MutexGuard, RwLock, TryLockError};

use log::debug;
use tokio_util::sync::CancellationToken;

use crate::blockchain::{Block, Blockchain};
use crate::config::Config;
use crate::transaction::{SignedTransaction, Transaction};

pub use neighbours::{PeerDiscovery, TcpProbe};

pub struct Node {
    config: Config,
    ledger: Mutex<Blockchain>,
    mining_guard: Mutex<()>,
    neighbours: RwLock<Vec<SocketAddr>>,
    sync_guard: Mutex<()>,
    discovery: Box<dyn PeerDiscovery>,
    shutdown: CancellationToken,
}

impl Node {
    pub fn new(config: Config, discovery: impl PeerDiscovery + 'static) -> Self {
        let ledger = Blockchain::new(config.difficulty);
        Self {
            config,
            ledger: Mutex::new(ledger),
            mining_guard: Mutex::new(()),
            neighbours: RwLock::new(Vec::new()),
            sync_guard: Mutex::new(()),
            discovery: Box::new(discovery),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn ledger(&self) -> MutexGuard<'_, Blockchain> {
        self.ledger.lock().expect("mutex poisoned")
    }

    pub fn add_transaction(
        &self,
        sender_blockchain_address: &str,
        recipient_blockchain_address: &str,
        value: f64,
        sender_public_key: Option<&str>,
        signature: Option<&str>,
    ) -> bool {
        self.ledger().add_transaction(
            sender_blockchain_address,
            recipient_blockchain_address,
            value,
            sender_public_key,
            signature,
        )
    }

    pub fn create_transaction(&self, signed: &SignedTransaction) -> bool {
        self.ledger().create_transaction(signed)
    }

    pub fn calculate_total_amount(&self, blockchain_address: &str) -> f64 {
        self.ledger().calculate_total_amount(blockchain_address)
    }

    pub fn chain(&self) -> Vec<Block> {
        self.ledger().chain().to_vec()
    }

    pub fn transaction_pool(&self) -> Vec<Transaction> {
        self.ledger().transaction_pool().to_vec()
    }

    pub fn height(&self) -> usize {
        self.ledger().len()
    }

    pub fn pool_size(&self) -> usize {
        self.ledger().transaction_pool().len()
    }

    pub fn is_valid_chain(&self) -> bool {
        self.ledger().is_valid_chain()
    }

    pub fn neighbours(&self) -> Vec<SocketAddr> {
        self.neighbours.read().expect("rwlock poisoned").clone()
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Stop the background loops and abort any in-flight proof search.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

/// Non-blocking acquire: `None` when another holder is active. A poisoned
/// guard is still usable since it protects no data.
fn try_guard<'a>(guard: &'a Mutex<()>, what: &str) -> Option<MutexGuard<'a, ()>> {
    match guard.try_lock() {
        Ok(held) => Some(held),
        Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
        Err(TryLockError::WouldBlock) => {
            debug!("{what} already in flight, skipping");
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashSet;
    use std::net::SocketAddr;

    use super::PeerDiscovery;

    /// Discovery that never finds anyone.
    pub struct NoPeers;

    impl PeerDiscovery for NoPeers {
        fn discover_peers(&self, _host: &str, _port: u16) -> HashSet<SocketAddr> {
            HashSet::new()
        }
    }
}
