//! # Secret Seed Access
//!
//! The per-installation secret lives in an external preference store as a
//! base64 blob. This module only defines the capability the core needs
//! ([`SecretSeedSource`]) and the decode step; locating and parsing the
//! vendor's preference file is the caller's concern.

use crate::error::KlbdecError;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Provider of the per-installation secret seed.
///
/// Queried once per distinct container before key derivation; the decoded
/// blob is treated as read-only shared data from then on.
pub trait SecretSeedSource {
    /// The decoded seed blob for `installation`.
    ///
    /// # Errors
    ///
    /// - [`KlbdecError::SeedUnavailable`] - missing entry or undecodable blob
    fn secret_seed(&self, installation: &str) -> Result<Vec<u8>, KlbdecError>;
}

/// Decode a base64 seed blob as stored in the preference file.
///
/// # Errors
///
/// - [`KlbdecError::SeedUnavailable`] - if `encoded` is not valid base64
pub fn decode_seed(encoded: &str) -> Result<Vec<u8>, KlbdecError> {
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| KlbdecError::SeedUnavailable(format!("malformed base64 seed: {e}")))
}

/// A seed source holding one already-decoded blob.
///
/// Covers the common case where the caller has parsed the preference file
/// up front and wants to fan out over many files of one installation.
pub struct StaticSeed(Vec<u8>);

impl StaticSeed {
    /// Wrap a decoded seed blob.
    pub fn new(seed: Vec<u8>) -> Self {
        Self(seed)
    }

    /// Decode `encoded` and wrap the result.
    pub fn from_base64(encoded: &str) -> Result<Self, KlbdecError> {
        Ok(Self(decode_seed(encoded)?))
    }
}

impl SecretSeedSource for StaticSeed {
    fn secret_seed(&self, _installation: &str) -> Result<Vec<u8>, KlbdecError> {
        Ok(self.0.clone())
    }
}
