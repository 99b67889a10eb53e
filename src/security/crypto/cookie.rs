//! Cookie value signing.
//!
//! Implements HMAC-SHA256 signed, optionally AES-GCM encrypted cookie tokens
//! bound to the cookie name they were issued for.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng, Payload};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use super::secret::{Secret, SecretStrength};

type HmacSha256 = Hmac<Sha256>;

const HASH_KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const SEPARATOR: u8 = b'|';

/// Largest token accepted or produced, matching the cookie size browsers keep.
pub const DEFAULT_MAX_LENGTH: usize = 4096;

/// Tokens older than this are rejected. Thirty days.
pub const DEFAULT_MAX_AGE_SECS: u64 = 86_400 * 30;

/// Token encoding and decoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    #[error("token is {len} bytes, limit is {max}")]
    TooLong { len: usize, max: usize },

    #[error("token is not valid base64")]
    Encoding,

    #[error("token is malformed")]
    Format,

    #[error("token MAC is invalid")]
    InvalidMac,

    #[error("token is {age}s old, limit is {max_age}s")]
    Expired { age: u64, max_age: u64 },

    #[error("value encryption failed")]
    Encryption,

    #[error("value decryption failed")]
    Decryption,

    #[error("value is not valid UTF-8")]
    NotUtf8,
}

/// Signs cookie values under one secret.
///
/// A token is `base64url(timestamp|payload|mac)` where the MAC covers
/// `name|timestamp|payload`, so a token only verifies for the cookie name it
/// was issued under. With a 64-byte secret the payload is additionally
/// encrypted with AES-256-GCM using the name as associated data.
#[derive(Clone)]
pub struct SecureCookie {
    hash_key: [u8; HASH_KEY_LEN],
    cipher: Option<Aes256Gcm>,
    max_age_secs: u64,
    max_length: usize,
}

impl SecureCookie {
    /// Creates a signer bound to `secret`.
    #[must_use]
    pub fn new(secret: &Secret) -> Self {
        let bytes = secret.as_bytes();
        let mut hash_key = [0u8; HASH_KEY_LEN];
        hash_key.copy_from_slice(&bytes[..HASH_KEY_LEN]);

        let cipher = match secret.strength() {
            SecretStrength::Signed => None,
            SecretStrength::SignedEncrypted => Some(Aes256Gcm::new(
                Key::<Aes256Gcm>::from_slice(&bytes[HASH_KEY_LEN..]),
            )),
        };

        Self {
            hash_key,
            cipher,
            max_age_secs: DEFAULT_MAX_AGE_SECS,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    /// Sets the maximum token age in seconds. Zero disables the check.
    #[must_use]
    pub fn with_max_age(mut self, secs: u64) -> Self {
        self.max_age_secs = secs;
        self
    }

    /// Sets the maximum encoded token length in bytes.
    #[must_use]
    pub fn with_max_length(mut self, len: usize) -> Self {
        self.max_length = len;
        self
    }

    #[must_use]
    pub const fn strength(&self) -> SecretStrength {
        if self.cipher.is_some() {
            SecretStrength::SignedEncrypted
        } else {
            SecretStrength::Signed
        }
    }

    /// Produces a token carrying `value` for the cookie called `name`.
    ///
    /// # Errors
    ///
    /// Returns `SignerError::Encryption` if AES-GCM fails and
    /// `SignerError::TooLong` if the token exceeds the configured length.
    pub fn encode(&self, name: &str, value: &str) -> Result<String, SignerError> {
        let payload = match &self.cipher {
            Some(cipher) => seal(cipher, name, value.as_bytes())?,
            None => value.as_bytes().to_vec(),
        };
        let payload = URL_SAFE_NO_PAD.encode(payload);
        let timestamp = unix_now().to_string();

        let tag = self
            .mac(name, timestamp.as_bytes(), payload.as_bytes())
            .finalize()
            .into_bytes();

        let mut combined = Vec::with_capacity(timestamp.len() + payload.len() + tag.len() + 2);
        combined.extend_from_slice(timestamp.as_bytes());
        combined.push(SEPARATOR);
        combined.extend_from_slice(payload.as_bytes());
        combined.push(SEPARATOR);
        combined.extend_from_slice(&tag);

        let token = URL_SAFE_NO_PAD.encode(&combined);
        if token.len() > self.max_length {
            return Err(SignerError::TooLong {
                len: token.len(),
                max: self.max_length,
            });
        }
        Ok(token)
    }

    /// Recovers the value from a token issued for the cookie called `name`.
    ///
    /// # Errors
    ///
    /// Fails if the token is oversized, malformed, carries a MAC that does not
    /// match this secret and name, has expired, or does not decrypt.
    pub fn decode(&self, name: &str, token: &str) -> Result<String, SignerError> {
        if token.len() > self.max_length {
            return Err(SignerError::TooLong {
                len: token.len(),
                max: self.max_length,
            });
        }

        let combined = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| SignerError::Encoding)?;

        // The MAC is binary and may contain the separator, so it takes the rest.
        let mut parts = combined.splitn(3, |b| *b == SEPARATOR);
        let (Some(timestamp), Some(payload), Some(tag)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(SignerError::Format);
        };

        self.mac(name, timestamp, payload)
            .verify_slice(tag)
            .map_err(|_| SignerError::InvalidMac)?;

        let issued_at: u64 = std::str::from_utf8(timestamp)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or(SignerError::Format)?;

        if self.max_age_secs > 0 {
            let age = unix_now().saturating_sub(issued_at);
            if age > self.max_age_secs {
                return Err(SignerError::Expired {
                    age,
                    max_age: self.max_age_secs,
                });
            }
        }

        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| SignerError::Encoding)?;

        let plaintext = match &self.cipher {
            Some(cipher) => open(cipher, name, &payload)?,
            None => payload,
        };

        String::from_utf8(plaintext).map_err(|_| SignerError::NotUtf8)
    }

    /// Keyed MAC over `name|timestamp|payload`.
    ///
    /// # Panics
    ///
    /// Panics if HMAC initialization fails (invalid key length), though this is statically prevented
    /// by the fixed key size.
    fn mac(&self, name: &str, timestamp: &[u8], payload: &[u8]) -> HmacSha256 {
        let mut mac = <HmacSha256 as hmac::Mac>::new_from_slice(&self.hash_key)
            .expect("HMAC accepts any key size");
        mac.update(name.as_bytes());
        mac.update(&[SEPARATOR]);
        mac.update(timestamp);
        mac.update(&[SEPARATOR]);
        mac.update(payload);
        mac
    }
}

impl fmt::Debug for SecureCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureCookie")
            .field("strength", &self.strength())
            .field("max_age_secs", &self.max_age_secs)
            .field("max_length", &self.max_length)
            .finish_non_exhaustive()
    }
}

fn seal(cipher: &Aes256Gcm, name: &str, plaintext: &[u8]) -> Result<Vec<u8>, SignerError> {
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(
            nonce,
            Payload {
                msg: plaintext,
                aad: name.as_bytes(),
            },
        )
        .map_err(|_| SignerError::Encryption)?;

    let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    combined.extend_from_slice(&nonce_bytes);
    combined.extend_from_slice(&ciphertext);
    Ok(combined)
}

fn open(cipher: &Aes256Gcm, name: &str, combined: &[u8]) -> Result<Vec<u8>, SignerError> {
    if combined.len() < NONCE_LEN + TAG_LEN {
        return Err(SignerError::Decryption);
    }

    let nonce = Nonce::from_slice(&combined[..NONCE_LEN]);
    cipher
        .decrypt(
            nonce,
            Payload {
                msg: &combined[NONCE_LEN..],
                aad: name.as_bytes(),
            },
        )
        .map_err(|_| SignerError::Decryption)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}
