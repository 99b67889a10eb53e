//! Error types and result aliases.
//!
//! Defines the core `CookieError` enumeration and common `Result` type.

use thiserror::Error;

use crate::security::crypto::{SecretSlot, SignerError};

/// Cookie manager errors.
#[derive(Debug, Error)]
pub enum CookieError {
    /// A configured secret is not valid base64.
    #[error("{slot} cookie secret is not valid base64: {source}")]
    Decoding {
        slot: SecretSlot,
        #[source]
        source: base64::DecodeError,
    },

    /// A configured secret decoded to an unsupported length.
    #[error("{slot} cookie secret must be 32 or 64 bytes, got {len}")]
    InvalidSecretLength { slot: SecretSlot, len: usize },

    /// The current secret failed to produce a token.
    #[error("signing failed: {0}")]
    Signing(#[source] SignerError),

    /// The request carries no cookie with the requested name.
    #[error("cookie not found: {name}")]
    CookieNotFound { name: String },

    /// Neither secret accepted the token. Holds the previous secret's error.
    #[error("verification failed: {0}")]
    Verification(#[source] SignerError),

    /// Cookie name cannot be carried in a `Set-Cookie` header.
    #[error("invalid cookie name: {0:?}")]
    InvalidCookieName(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl CookieError {
    /// Returns true for failures caused by what the client sent rather than by
    /// the server: a missing cookie or a token neither secret accepts.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::CookieNotFound { .. } | Self::Verification(_))
    }
}

/// Result type alias for `CookieError`.
pub type Result<T> = std::result::Result<T, CookieError>;
