//! # Constants
//!
//! Protocol constants of the KLB container format: the LCG parameters of
//! the keystream, the fixed third key word used for package-embedded
//! assets, and output-naming defaults.

/// Multiplier `a` of the keystream LCG, `x' = a·x + c mod 2^32`.
///
/// These are the classic MSVC `rand()` constants; the vendor reused them
/// verbatim for all three key words.
pub const LCG_MULTIPLIER: u32 = 0x0003_43FD;

/// Increment `c` of the keystream LCG.
pub const LCG_INCREMENT: u32 = 0x0026_9EC3;

/// Number of digest bytes consumed by key derivation (three 32-bit words).
pub const KEY_DIGEST_BYTES: usize = 12;

/// Fixed third key word for package-embedded asset extraction.
///
/// The extraction index stores only two key words per asset; the format
/// pins the third to this constant (decimal 12345). A protocol constant,
/// not a derived value.
pub const PACKAGE_THIRD_KEY_WORD: u32 = 0x3039;

/// Output suffix used when the payload classifier has no opinion.
pub const FALLBACK_SUFFIX: &str = "bin";
