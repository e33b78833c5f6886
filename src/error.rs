use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChainError>;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("invalid {field} hex: {source}")]
    InvalidHex {
        field: &'static str,
        #[source]
        source: hex::FromHexError,
    },
    #[error("public key must be 64 raw or 65 SEC1 bytes, got {0}")]
    InvalidKeyLength(usize),
    #[error("signature does not match transaction")]
    SignatureMismatch,
    #[error("missing sender public key or signature")]
    MissingSignature,
    #[error("proof-of-work cancelled after {attempts} attempts")]
    MiningCancelled { attempts: u64 },
    #[error("proof-of-work deadline exceeded after {attempts} attempts")]
    MiningTimedOut { attempts: u64 },
    #[error("nonce space exhausted")]
    NonceSpaceExhausted,
    #[error("chain head or pool changed while mining")]
    StaleCandidate,
    #[error("key error: {0}")]
    Key(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}
