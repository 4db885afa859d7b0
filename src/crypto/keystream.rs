//! src/crypto/keystream.rs
//!
//! The per-byte XOR keystream generator.
//!
//! # Cipher details
//!
//! The keystream state is three independent 32-bit words. Each word steps
//! through the linear congruential recurrence
//! `x' = x·0x0003_43FD + 0x0026_9EC3 mod 2^32`, and the mask for a byte is
//! the XOR of the top byte of each word. Decryption XORs the mask into the
//! ciphertext byte and advances all three words, once per byte, in
//! ascending position order.
//!
//! Because each word evolves by an affine map, the state after any number
//! of advances has a closed form — see [`crate::crypto::jump`] for the
//! O(log n) skip that makes random access cheap.
//!
//! Don't use this cipher for anything you care about. It is implemented
//! solely to read an existing vendor format.

use crate::consts::{LCG_INCREMENT, LCG_MULTIPLIER};
use crate::crypto::jump::jump_word;

/// An immutable 3-word decryption key.
///
/// Derived once per file (see [`crate::crypto::kdf::derive_key`]) or
/// assembled from an extraction-index row. Never mutated: every read
/// derives a fresh [`CipherState`] from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Key {
    k0: u32,
    k1: u32,
    k2: u32,
}

impl Key {
    /// Assemble a key from its three words.
    pub const fn new(k0: u32, k1: u32, k2: u32) -> Self {
        Self { k0, k1, k2 }
    }

    /// The key words in order.
    pub const fn words(&self) -> (u32, u32, u32) {
        (self.k0, self.k1, self.k2)
    }

    /// Keystream state positioned at byte `offset` of the ciphertext.
    ///
    /// O(log offset); `offset == 0` yields the key words unchanged.
    pub fn state_at(&self, offset: u64) -> CipherState {
        CipherState {
            k0: jump_word(self.k0, offset),
            k1: jump_word(self.k1, offset),
            k2: jump_word(self.k2, offset),
        }
    }
}

/// Keystream generator state after some number of advances.
///
/// Created fresh per read call, advanced byte-by-byte for the duration of
/// that read, then discarded. Same shape as [`Key`] but mutable by design.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CipherState {
    k0: u32,
    k1: u32,
    k2: u32,
}

impl CipherState {
    /// Mask for the byte at the current position.
    #[inline(always)]
    pub fn mask_byte(&self) -> u8 {
        ((self.k0 >> 24) ^ (self.k1 >> 24) ^ (self.k2 >> 24)) as u8
    }

    /// Step all three words to the next byte position.
    ///
    /// Wraparound is part of the format: plain `mod 2^32` arithmetic,
    /// never saturation.
    #[inline(always)]
    pub fn advance(&mut self) {
        self.k0 = self.k0.wrapping_mul(LCG_MULTIPLIER).wrapping_add(LCG_INCREMENT);
        self.k1 = self.k1.wrapping_mul(LCG_MULTIPLIER).wrapping_add(LCG_INCREMENT);
        self.k2 = self.k2.wrapping_mul(LCG_MULTIPLIER).wrapping_add(LCG_INCREMENT);
    }

    /// Decrypt `buf` in place, advancing once per byte.
    ///
    /// The mask for byte `i+1` always comes from the state advanced past
    /// byte `i`; a state is never reused across positions.
    pub fn apply(&mut self, buf: &mut [u8]) {
        for byte in buf {
            *byte ^= self.mask_byte();
            self.advance();
        }
    }
}
