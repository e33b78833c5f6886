use ring::rand::SystemRandom;
use ring::signature::{ECDSA_P256_SHA256_FIXED, EcdsaKeyPair, UnparsedPublicKey};

use crate::error::{ChainError, Result};
use crate::transaction::Transaction;

/// Tag byte of an uncompressed SEC1 point.
const SEC1_UNCOMPRESSED: u8 = 0x04;
const RAW_PUBLIC_KEY_LEN: usize = 64;

/// Verify a hex P-256 signature (fixed `r||s`) over the transaction's sighash.
///
/// Malformed hex, a wrong-length key or a mismatch all come back as `Err`;
/// nothing in here panics on caller input.
pub fn verify_transaction_signature(
    sender_public_key: &str,
    signature: &str,
    transaction: &Transaction,
) -> Result<()> {
    let public_key = decode_public_key(sender_public_key)?;
    let signature = hex::decode(signature.trim()).map_err(|source| ChainError::InvalidHex {
        field: "signature",
        source,
    })?;

    UnparsedPublicKey::new(&ECDSA_P256_SHA256_FIXED, public_key)
        .verify(&transaction.sighash(), &signature)
        .map_err(|_| ChainError::SignatureMismatch)
}

/// Sign the transaction's sighash, returning the hex `r||s` signature.
pub fn sign_transaction(key_pair: &EcdsaKeyPair, transaction: &Transaction) -> Result<String> {
    let rng = SystemRandom::new();
    let signature = key_pair
        .sign(&rng, &transaction.sighash())
        .map_err(|e| ChainError::Key(format!("signing failed: {e}")))?;
    Ok(hex::encode(signature.as_ref()))
}

/// Accepts the raw 64-byte `X||Y` form or the 65-byte SEC1 uncompressed form
/// and returns the SEC1 bytes.
fn decode_public_key(public_key_hex: &str) -> Result<Vec<u8>> {
    let bytes = hex::decode(public_key_hex.trim()).map_err(|source| ChainError::InvalidHex {
        field: "public key",
        source,
    })?;
    match bytes.len() {
        RAW_PUBLIC_KEY_LEN => {
            let mut sec1 = Vec::with_capacity(RAW_PUBLIC_KEY_LEN + 1);
            sec1.push(SEC1_UNCOMPRESSED);
            sec1.extend_from_slice(&bytes);
            Ok(sec1)
        }
        n if n == RAW_PUBLIC_KEY_LEN + 1 && bytes[0] == SEC1_UNCOMPRESSED => Ok(bytes),
        n => Err(ChainError::InvalidKeyLength(n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::Wallet;

    #[test]
    fn genuine_signature_verifies() {
        let wallet = Wallet::generate().unwrap();
        let tx = Transaction::new(wallet.blockchain_address(), "B", 1.0);
        let sig = wallet.sign(&tx).unwrap();
        assert!(verify_transaction_signature(&wallet.public_key_hex(), &sig, &tx).is_ok());
    }

    #[test]
    fn sec1_public_key_is_accepted() {
        let wallet = Wallet::generate().unwrap();
        let tx = Transaction::new(wallet.blockchain_address(), "B", 1.0);
        let sig = wallet.sign(&tx).unwrap();
        let sec1 = format!("04{}", wallet.public_key_hex());
        assert!(verify_transaction_signature(&sec1, &sig, &tx).is_ok());
    }

    #[test]
    fn tampered_value_is_rejected() {
        let wallet = Wallet::generate().unwrap();
        let tx = Transaction::new(wallet.blockchain_address(), "B", 1.0);
        let sig = wallet.sign(&tx).unwrap();
        let tampered = Transaction::new(wallet.blockchain_address(), "B", 100.0);
        assert!(matches!(
            verify_transaction_signature(&wallet.public_key_hex(), &sig, &tampered),
            Err(ChainError::SignatureMismatch)
        ));
    }

    #[test]
    fn signature_from_other_key_is_rejected() {
        let alice = Wallet::generate().unwrap();
        let mallory = Wallet::generate().unwrap();
        let tx = Transaction::new(alice.blockchain_address(), "B", 1.0);
        let sig = mallory.sign(&tx).unwrap();
        assert!(matches!(
            verify_transaction_signature(&alice.public_key_hex(), &sig, &tx),
            Err(ChainError::SignatureMismatch)
        ));
    }

    #[test]
    fn malformed_input_is_an_error_not_a_panic() {
        let wallet = Wallet::generate().unwrap();
        let tx = Transaction::new("A", "B", 1.0);
        let sig = wallet.sign(&tx).unwrap();

        assert!(matches!(
            verify_transaction_signature("zz-not-hex", &sig, &tx),
            Err(ChainError::InvalidHex { field: "public key", .. })
        ));
        assert!(matches!(
            verify_transaction_signature(&wallet.public_key_hex(), "xyz", &tx),
            Err(ChainError::InvalidHex { field: "signature", .. })
        ));
        assert!(matches!(
            verify_transaction_signature("abcd", &sig, &tx),
            Err(ChainError::InvalidKeyLength(2))
        ));
        assert!(matches!(
            verify_transaction_signature(&wallet.public_key_hex(), "abcd", &tx),
            Err(ChainError::SignatureMismatch)
        ));
    }
}
