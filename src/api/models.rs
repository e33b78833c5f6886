use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::blockchain::Block;
use crate::node::Node;
use crate::transaction::Transaction;

/// Shared application state: the node engine behind an `Arc`, shared with
/// the background loops.
pub struct AppState {
    pub node: Arc<Node>,
}

impl AppState {
    pub fn new(node: Arc<Node>) -> Self {
        Self { node }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize, Deserialize)]
pub struct ChainResponse {
    pub length: usize,
    pub difficulty: usize,
    pub chain: Vec<Block>,
}

#[derive(Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub difficulty: usize,
}

#[derive(Serialize, Deserialize)]
pub struct MineResponse {
    pub mined: bool,
    pub length: usize,
}

/* ---------- TX API Models ---------- */

#[derive(Serialize, Deserialize)]
pub struct NewTxRequest {
    pub sender_blockchain_address: String,
    pub recipient_blockchain_address: String,
    pub value: f64,
    pub sender_public_key: Option<String>,
    pub signature: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct NewTxResponse {
    pub accepted: bool,
}

#[derive(Serialize, Deserialize)]
pub struct PoolResponse {
    pub size: usize,
    pub transactions: Vec<Transaction>,
}

/* ---------- Balance / Neighbours / Stats ---------- */

#[derive(Serialize, Deserialize)]
pub struct BalanceResponse {
    pub address: String,
    pub amount: f64,
}

#[derive(Serialize, Deserialize)]
pub struct NeighboursResponse {
    pub neighbours: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct StatsResponse {
    pub height: usize,
    pub difficulty: usize,
    pub mining_reward: f64,
    pub mining_interval_secs: u64,
    pub pool_size: usize,
    pub neighbours: usize,
}

/* ---------- Wallet API Models (dev) ---------- */

#[derive(Serialize, Deserialize)]
pub struct SignRequest {
    /// Hex PKCS#8 document as returned by `/wallet/new/`.
    pub private_key: String,
    pub recipient_blockchain_address: String,
    pub value: f64,
}
