//! src/crypto/kdf.rs
//!
//! Per-file key derivation: HMAC-SHA1 over the file's base name, keyed by
//! the installation's secret seed, truncated to three big-endian words.

use crate::consts::KEY_DIGEST_BYTES;
use crate::crypto::hmac::HmacSha1;
use crate::crypto::keystream::Key;
use crate::error::KlbdecError;

use hmac::Mac;

/// Derive the 3-word decryption key for one file.
///
/// `seed` is the decoded secret blob from the external preference store
/// (see [`crate::seed`]); `base_name` is the file's base name, UTF-8
/// encoded, exactly as it appears on disk. Deterministic and pure.
///
/// # Errors
///
/// - [`KlbdecError::InvalidSeed`] - if the seed blob is empty
pub fn derive_key(seed: &[u8], base_name: &str) -> Result<Key, KlbdecError> {
    if seed.is_empty() {
        return Err(KlbdecError::InvalidSeed("seed blob is empty".into()));
    }

    let mut mac = <HmacSha1 as Mac>::new_from_slice(seed)
        .map_err(|_| KlbdecError::InvalidSeed("seed rejected as HMAC key".into()))?;
    mac.update(base_name.as_bytes());
    let digest = mac.finalize().into_bytes();

    // First 12 digest bytes as three big-endian u32 words.
    let word = |i: usize| {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&digest[i * 4..i * 4 + 4]);
        u32::from_be_bytes(bytes)
    };
    debug_assert!(digest.len() >= KEY_DIGEST_BYTES);

    Ok(Key::new(word(0), word(1), word(2)))
}
