//! Cookie secret material.
//!
//! Decodes and validates the base64 secrets handed to the cookie manager.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use rand::RngCore;
use std::fmt;

use crate::config::{CookieError, Result};

/// Which of the two manager secrets a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretSlot {
    /// Signs every new token and gets the first verification attempt.
    Current,
    /// Only verifies tokens issued before the latest rotation.
    Previous,
}

impl fmt::Display for SecretSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => f.write_str("current"),
            Self::Previous => f.write_str("previous"),
        }
    }
}

/// Supported secret sizes and the token mode each one selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretStrength {
    /// 32 bytes: HMAC-SHA256 signed tokens.
    Signed,
    /// 64 bytes: HMAC-SHA256 signed, AES-256-GCM encrypted tokens.
    SignedEncrypted,
}

impl SecretStrength {
    /// Number of raw bytes a secret of this strength holds.
    #[must_use]
    pub const fn key_len(self) -> usize {
        match self {
            Self::Signed => 32,
            Self::SignedEncrypted => 64,
        }
    }

    #[must_use]
    pub const fn from_key_len(len: usize) -> Option<Self> {
        match len {
            32 => Some(Self::Signed),
            64 => Some(Self::SignedEncrypted),
            _ => None,
        }
    }
}

/// Validated raw key material, exactly 32 or 64 bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret {
    bytes: Vec<u8>,
    strength: SecretStrength,
}

impl Secret {
    /// Decodes a standard base64 secret for the given slot.
    ///
    /// # Errors
    ///
    /// Returns `CookieError::Decoding` if the string is not valid base64 and
    /// `CookieError::InvalidSecretLength` if it does not decode to 32 or 64 bytes.
    pub fn from_base64(slot: SecretSlot, encoded: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|source| CookieError::Decoding { slot, source })?;
        Self::from_bytes(slot, bytes)
    }

    /// Wraps raw bytes for the given slot.
    ///
    /// # Errors
    ///
    /// Returns `CookieError::InvalidSecretLength` unless `bytes` is 32 or 64 bytes long.
    pub fn from_bytes(slot: SecretSlot, bytes: Vec<u8>) -> Result<Self> {
        let strength = SecretStrength::from_key_len(bytes.len()).ok_or(
            CookieError::InvalidSecretLength {
                slot,
                len: bytes.len(),
            },
        )?;
        Ok(Self { bytes, strength })
    }

    /// Generates a fresh secret from the OS random number generator.
    #[must_use]
    pub fn generate(strength: SecretStrength) -> Self {
        let mut bytes = vec![0u8; strength.key_len()];
        rand::rng().fill_bytes(&mut bytes);
        Self { bytes, strength }
    }

    /// Renders the secret in the standard base64 form read from configuration.
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    #[must_use]
    pub const fn strength(&self) -> SecretStrength {
        self.strength
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("strength", &self.strength)
            .field("bytes", &"<redacted>")
            .finish()
    }
}
