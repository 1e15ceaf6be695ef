//! Identifier fabrication: addresses, pool ids and transaction digests.
//!
//! Seeded ids are stable across runs so a logical actor ("sandwich_attacker",
//! "pump_3") keeps the same address. Unseeded ids hash fresh randomness.

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::constants::{CHECKPOINT_MAX, CHECKPOINT_MIN};

const HEX_CHARS: &[u8] = b"0123456789abcdef";

/// SHA-256 of `data` as lowercase hex (64 chars).
fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Stable 32-byte object id derived from a seed string.
pub fn seeded_id(seed: &str) -> String {
    format!("0x{}", sha256_hex(seed.as_bytes()))
}

/// One-off 32-byte object id derived from a random float.
pub fn random_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("0x{}", float_digest(rng))
}

/// Address for an optional seed: stable when seeded, unique otherwise.
pub fn address<R: Rng + ?Sized>(rng: &mut R, seed: Option<&str>) -> String {
    match seed {
        Some(seed) => seeded_id(seed),
        None => random_id(rng),
    }
}

/// Transaction digest hashed from 32 random bytes.
pub fn random_digest<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes);
    sha256_hex(&bytes)
}

/// Transaction digest hashed from the decimal rendering of a random float.
pub fn float_digest<R: Rng + ?Sized>(rng: &mut R) -> String {
    let value: f64 = rng.gen();
    sha256_hex(value.to_string().as_bytes())
}

/// 20-byte style address made of 40 random hex characters.
pub fn random_short_address<R: Rng + ?Sized>(rng: &mut R) -> String {
    let body: String = (0..40)
        .map(|_| HEX_CHARS[rng.gen_range(0..HEX_CHARS.len())] as char)
        .collect();
    format!("0x{}", body)
}

/// Lending position id: the first 40 hex chars of a fresh digest.
pub fn position_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let digest = random_digest(rng);
    format!("0x{}", &digest[..40])
}

pub fn checkpoint<R: Rng + ?Sized>(rng: &mut R) -> u64 {
    rng.gen_range(CHECKPOINT_MIN..=CHECKPOINT_MAX)
}
