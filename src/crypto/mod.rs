// src/crypto/mod.rs

//! Low-level crypto primitives (KDF, keystream, offset jump).
//!
//! Sub-modules for primitives; see crate root for re-exports.

pub mod hmac;
pub mod jump;
pub mod kdf;
pub mod keystream;
