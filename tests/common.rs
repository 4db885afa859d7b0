//! tests/common.rs
//! Shared fixtures for the integration tests.

use klbdec::consts::{LCG_INCREMENT, LCG_MULTIPLIER};
use klbdec::Key;

/// The hand-computed fixed-vector key from the format notes.
#[allow(dead_code)] // Used across multiple test files
pub const VECTOR_KEY: Key = Key::new(0x0000_0001, 0x0000_0002, 0x0000_0003);

/// An arbitrary but fixed key for the non-vector tests.
#[allow(dead_code)] // Used across multiple test files
pub const TEST_KEY: Key = Key::new(0xDEAD_BEEF, 0x1234_5678, 0x0BAD_F00D);

/// The cipher is a pure XOR keystream, so "encrypting" for test setup is
/// just decrypting plaintext: XOR with the keystream at `offset`.
#[allow(dead_code)] // Used across multiple test files
pub fn encrypt_at(key: Key, offset: u64, plaintext: &[u8]) -> Vec<u8> {
    let mut buf = plaintext.to_vec();
    key.state_at(offset).apply(&mut buf);
    buf
}

/// One LCG step, written out longhand as the ground truth the closed-form
/// jump is checked against.
#[allow(dead_code)] // Used across multiple test files
pub fn step_word(x: u32) -> u32 {
    x.wrapping_mul(LCG_MULTIPLIER).wrapping_add(LCG_INCREMENT)
}

/// Brute-force jump: `offset` sequential steps.
#[allow(dead_code)] // Used across multiple test files
pub fn brute_jump(mut x: u32, offset: u64) -> u32 {
    for _ in 0..offset {
        x = step_word(x);
    }
    x
}
