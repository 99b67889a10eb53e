//! Library definitions.
//!
//! Exports the cookie manager, its configuration, and the signing primitives.

pub mod config;
pub mod core;
pub mod security;
pub mod web;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;
pub use crate::config::{Config, CookieError, ManagerOptions, Result, SameSite};
pub use crate::core::CookieManager;
pub use crate::security::crypto::{Secret, SecretSlot, SecretStrength, SecureCookie, SignerError};
pub use crate::web::{SESSION_COOKIE_NAME, serve};
