use ring::rand::SystemRandom;
use ring::signature::{ECDSA_P256_SHA256_FIXED_SIGNING, EcdsaKeyPair, KeyPair};

use super::{blockchain_address, sign_transaction};
use crate::error::{ChainError, Result};
use crate::transaction::{SignedTransaction, Transaction};

/// A P-256 key pair and the address derived from it.
///
/// The private key is kept in PKCS#8 form; the public key is exposed as the
/// raw 64-byte `X||Y` point, which is also what the address is derived from.
pub struct Wallet {
    pkcs8: Vec<u8>,
    key_pair: EcdsaKeyPair,
    blockchain_address: String,
}

impl Wallet {
    pub fn generate() -> Result<Self> {
        let rng = SystemRandom::new();
        let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, &rng)
            .map_err(|e| ChainError::Key(format!("key generation failed: {e}")))?;
        Self::from_pkcs8(pkcs8.as_ref())
    }

    pub fn from_pkcs8_hex(private_key_hex: &str) -> Result<Self> {
        let pkcs8 = hex::decode(private_key_hex.trim()).map_err(|source| ChainError::InvalidHex {
            field: "private key",
            source,
        })?;
        Self::from_pkcs8(&pkcs8)
    }

    fn from_pkcs8(pkcs8: &[u8]) -> Result<Self> {
        let rng = SystemRandom::new();
        let key_pair = EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, pkcs8, &rng)
            .map_err(|e| ChainError::Key(format!("rejected PKCS#8 key: {e}")))?;
        let blockchain_address = blockchain_address(raw_public_key(&key_pair));
        Ok(Self {
            pkcs8: pkcs8.to_vec(),
            key_pair,
            blockchain_address,
        })
    }

    pub fn private_key_hex(&self) -> String {
        hex::encode(&self.pkcs8)
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(raw_public_key(&self.key_pair))
    }

    pub fn blockchain_address(&self) -> &str {
        &self.blockchain_address
    }

    pub fn sign(&self, transaction: &Transaction) -> Result<String> {
        sign_transaction(&self.key_pair, transaction)
    }

    /// Build and sign a transfer from this wallet.
    pub fn transfer(&self, recipient: &str, value: f64) -> Result<SignedTransaction> {
        let transaction = Transaction::new(self.blockchain_address.clone(), recipient, value);
        let signature = self.sign(&transaction)?;
        Ok(SignedTransaction {
            transaction,
            sender_public_key: self.public_key_hex(),
            signature,
        })
    }
}

// ring hands out the SEC1 uncompressed point; drop the 0x04 tag.
fn raw_public_key(key_pair: &EcdsaKeyPair) -> &[u8] {
    &key_pair.public_key().as_ref()[1..]
}
