//! Security modules.
//!
//! Holds the cryptographic primitives behind the cookie manager.

pub mod crypto;
