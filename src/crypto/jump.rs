//! src/crypto/jump.rs
//!
//! Closed-form LCG state skip: the state after `n` advances in O(log n)
//! multiplications instead of `n`. This is what makes a decrypted
//! container randomly seekable in logarithmic rather than linear time.
//!
//! For the affine recurrence `x' = a·x + c mod m`,
//!
//! ```text
//! x_n = a^n·x_0 + c·(a^n − 1)/(a − 1)  mod m
//! ```
//!
//! The geometric-series term is computed over the extended modulus
//! `(a − 1)·m`, where `a^n − 1` is always divisible by `a − 1`, so the
//! division is exact before the final reduction mod `m`. Intermediates
//! exceed 32 bits by construction; this module is the one place the
//! implementation must not fall back to native 32-bit wraparound.

use crate::consts::{LCG_INCREMENT, LCG_MULTIPLIER};

const A: u128 = LCG_MULTIPLIER as u128;
const C: u128 = LCG_INCREMENT as u128;
const M: u128 = 1 << 32;

/// `a^exp mod modulus`, square-and-multiply.
///
/// `modulus` fits in 51 bits, so squaring stays well inside `u128`.
fn pow_mod(mut base: u128, mut exp: u64, modulus: u128) -> u128 {
    let mut acc: u128 = 1;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = acc * base % modulus;
        }
        base = base * base % modulus;
        exp >>= 1;
    }
    acc
}

/// LCG state that results from advancing `seed` by `offset` steps.
///
/// Equivalent to `offset` applications of
/// `x' = x·0x0003_43FD + 0x0026_9EC3 mod 2^32`, in O(log offset).
/// `offset == 0` is the identity.
pub fn jump_word(seed: u32, offset: u64) -> u32 {
    if offset == 0 {
        return seed;
    }

    // a^offset over the extended modulus; reducing the same power mod m
    // gives the seed-scaling factor for free.
    let extended = (A - 1) * M;
    let a_pow = pow_mod(A, offset, extended);

    // (a^n − 1)/(a − 1) is exact here: a ≡ 1 (mod a − 1), so a^n − 1 is a
    // multiple of a − 1 even after reduction mod (a − 1)·m.
    let geometric = (a_pow - 1) / (A - 1) * C % M;
    let scaled_seed = (a_pow % M) * seed as u128 % M;

    ((geometric + scaled_seed) % M) as u32
}
