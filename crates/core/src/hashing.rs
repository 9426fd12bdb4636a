//! Digest and identity-token helpers.
//!
//! `sha256_hex` backs the result checksum of finished archives; `build_token`
//! produces the random hex tokens that distinguish one snapshot from another.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

/// Generate a random 32-character hex token.
///
/// This is a build-identity token, not an integrity hash: two snapshots of
/// the same scenario get different tokens.
pub fn build_token() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
