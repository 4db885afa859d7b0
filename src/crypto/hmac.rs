// src/crypto/hmac.rs

//! HMAC-SHA primitives (re-exports from `hmac` + `sha1`).
//!
//! The container format predates SHA-2 adoption; key derivation is pinned
//! to HMAC-SHA1 and cannot be upgraded without breaking existing files.

use hmac::Hmac;
use sha1::Sha1;

pub type HmacSha1 = Hmac<Sha1>;
