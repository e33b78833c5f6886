pub mod block;
pub mod model;
pub mod pow;

pub use block::Block;
pub use model::{Blockchain, Candidate};
pub use pow::{MAX_DIFFICULTY, ProofOfWork, valid_proof};

/// Default Proof-of-Work difficulty (number of leading zero hex digits).
pub const DEFAULT_DIFFICULTY: usize = 3;

/// Reward paid to the miner for each sealed block.
pub const DEFAULT_MINING_REWARD: f64 = 1.0;
