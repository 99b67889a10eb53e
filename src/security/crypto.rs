//! Cryptographic utilities.
//!
//! Provides secret validation and the signer that protects cookie values.

pub mod cookie;
pub mod secret;

pub use cookie::{DEFAULT_MAX_AGE_SECS, DEFAULT_MAX_LENGTH, SecureCookie, SignerError};
pub use secret::{Secret, SecretSlot, SecretStrength};
