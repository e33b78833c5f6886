pub mod address;
pub mod keys;
pub mod signature;

pub use address::{blockchain_address, validate_address};
pub use keys::Wallet;
pub use signature::{sign_transaction, verify_transaction_signature};
