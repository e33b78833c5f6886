pub mod model;

pub use model::{SignedTransaction, Transaction};

/// Reserved sender of system-originated (reward) transactions. These are
/// admitted without a signature.
pub const MINING_SENDER: &str = "THE BLOCKCHAIN";
