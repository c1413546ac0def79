//! Cryptographic utilities for bearer tokens and secret comparison.

use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

/// Generates `num_bytes` bytes from the OS CSPRNG and hex-encodes them.
///
/// The result is always `2 * num_bytes` lowercase hex characters.
pub fn random_hex_token(num_bytes: usize) -> String {
    let mut bytes = vec![0u8; num_bytes];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Compares a presented secret against the expected one.
///
/// Both sides are hashed first so the comparison time does not depend on
/// how many leading characters of the raw secret match.
pub fn secrets_match(presented: &str, expected: &str) -> bool {
    let a = Sha256::digest(presented.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
