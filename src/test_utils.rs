//! Test utilities and shared configuration.
//!
//! This module provides common helpers for unit and integration tests,
//! reducing duplication across the codebase.

#[cfg(any(test, feature = "testing"))]
use crate::config::ManagerOptions;
#[cfg(any(test, feature = "testing"))]
use base64::{Engine as _, engine::general_purpose::STANDARD};

/// Returns a base64 secret of `len` bytes, every byte set to `fill`.
///
/// Distinct `fill` values give distinct keys, so tests can model rotation
/// with small integers.
#[cfg(any(test, feature = "testing"))]
#[must_use]
pub fn secret_b64(fill: u8, len: usize) -> String {
    STANDARD.encode(vec![fill; len])
}

/// Creates manager options with 32-byte current and previous secrets.
///
/// This configuration has:
/// - Default path (`/`)
/// - Unset same-site policy (resolves to lax)
/// - Default token max age
#[cfg(any(test, feature = "testing"))]
#[must_use]
pub fn options_for(current: u8, previous: u8) -> ManagerOptions {
    ManagerOptions::new(secret_b64(current, 32), secret_b64(previous, 32))
}
