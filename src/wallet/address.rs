use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Mainnet version byte.
const VERSION: u8 = 0x00;
pub const ADDRESS_CHECKSUM_LEN: usize = 4;
const PUB_KEY_HASH_LEN: usize = 20;

/// Derive the Base58 blockchain address of a raw public key:
/// SHA-256 -> RIPEMD-160 -> version byte -> double SHA-256 checksum -> Base58.
pub fn blockchain_address(public_key: &[u8]) -> String {
    let mut payload = Vec::with_capacity(1 + PUB_KEY_HASH_LEN + ADDRESS_CHECKSUM_LEN);
    payload.push(VERSION);
    payload.extend_from_slice(&hash_pub_key(public_key));
    let checksum = checksum(&payload);
    payload.extend_from_slice(&checksum);
    bs58::encode(payload).into_string()
}

/// Check the Base58 encoding, version byte and checksum of an address.
pub fn validate_address(address: &str) -> bool {
    let Ok(payload) = bs58::decode(address).into_vec() else {
        return false;
    };
    if payload.len() != 1 + PUB_KEY_HASH_LEN + ADDRESS_CHECKSUM_LEN || payload[0] != VERSION {
        return false;
    }
    let (body, actual) = payload.split_at(payload.len() - ADDRESS_CHECKSUM_LEN);
    checksum(body) == actual
}

fn hash_pub_key(public_key: &[u8]) -> [u8; PUB_KEY_HASH_LEN] {
    Ripemd160::digest(Sha256::digest(public_key)).into()
}

fn checksum(payload: &[u8]) -> [u8; ADDRESS_CHECKSUM_LEN] {
    let twice = Sha256::digest(Sha256::digest(payload));
    let mut out = [0u8; ADDRESS_CHECKSUM_LEN];
    out.copy_from_slice(&twice[..ADDRESS_CHECKSUM_LEN]);
    out
}
