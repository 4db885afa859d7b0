// src/lib.rs

//! Seekable decryption layer for KLB-encrypted asset containers.
//!
//! The vendor format encrypts each file (and each package-embedded asset)
//! with a 3-word LCG keystream cipher. This crate reverses it behind a
//! random-access byte interface: derive a key, wrap a backing source in a
//! [`DecryptingSource`], and read any `(offset, length)` in any order —
//! seeks cost O(log offset) thanks to the closed-form state jump.
//!
//! Everything is constructed explicitly and passed by value; there is no
//! ambient codec registration and no shared mutable cipher state anywhere.

pub mod consts;
pub mod crypto;
pub mod decrypt;
pub mod error;
pub mod extract;
pub mod seed;
pub mod source;
pub mod stream;

// High-level API — this is what most users import
pub use decrypt::DecryptingSource;
pub use error::KlbdecError;
pub use stream::DecryptStream;

// Key material and the primitives behind it — public at the root because
// custom flows (index tooling, verification harnesses) need them directly
pub use crypto::jump::jump_word;
pub use crypto::kdf::derive_key;
pub use crypto::keystream::{CipherState, Key};

pub use seed::{decode_seed, SecretSeedSource, StaticSeed};
pub use source::{ByteRangeSource, FileSource, SliceSource};

pub use extract::{
    BatchExtractor, CancelToken, ExtractionJob, JobResult, MagicClassifier, PayloadClassifier,
};
