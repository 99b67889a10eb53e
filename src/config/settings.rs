//! Configuration settings.
//!
//! Defines the cookie manager options, the process `Config` struct and
//! environment variable loading logic.

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use super::error::{CookieError, Result};
use crate::security::crypto::DEFAULT_MAX_AGE_SECS;

/// Browser policy for sending the cookie on cross-site requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "strict" => Self::Strict,
            "none" => Self::None,
            _ => Self::Lax,
        }
    }

    /// Attribute value as written in a `Set-Cookie` header.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
            Self::None => "None",
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs for building a `CookieManager`.
#[derive(Clone, PartialEq, Eq)]
pub struct ManagerOptions {
    /// Base64 secret used for signing and the first verification attempt.
    pub current_secret: String,
    /// Base64 secret used only as the verification fallback.
    pub previous_secret: String,
    /// Same-site policy. `None` means unset and resolves to `Lax`.
    pub same_site: Option<SameSite>,
    /// Cookie path. Empty resolves to `/`.
    pub path: String,
    /// Maximum token age accepted by both signers. Zero disables the check.
    pub token_max_age_secs: u64,
}

impl ManagerOptions {
    #[must_use]
    pub fn new(current_secret: impl Into<String>, previous_secret: impl Into<String>) -> Self {
        Self {
            current_secret: current_secret.into(),
            previous_secret: previous_secret.into(),
            same_site: None,
            path: String::new(),
            token_max_age_secs: DEFAULT_MAX_AGE_SECS,
        }
    }

    #[must_use]
    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub fn with_token_max_age(mut self, secs: u64) -> Self {
        self.token_max_age_secs = secs;
        self
    }
}

impl fmt::Debug for ManagerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagerOptions")
            .field("current_secret", &"<redacted>")
            .field("previous_secret", &"<redacted>")
            .field("same_site", &self.same_site)
            .field("path", &self.path)
            .field("token_max_age_secs", &self.token_max_age_secs)
            .finish()
    }
}

fn get_env(key: &str) -> Result<String> {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CookieError::Config(format!("{key} must be set in environment")))
}

fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_env_u64_or(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Application configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the demo server listens on.
    pub listen_addr: SocketAddr,
    /// Logging format: "json" or "pretty".
    pub log_format: String,
    /// Cookie manager options.
    pub cookie: ManagerOptions,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `CookieError::Config` if `COOKIE_CURRENT_SECRET` or
    /// `COOKIE_PREVIOUS_SECRET` is missing, or if `LISTEN_ADDR` is not a
    /// valid socket address. Secrets themselves are validated when the
    /// manager is built.
    pub fn from_env() -> Result<Arc<Self>> {
        let raw_addr = get_env_or("LISTEN_ADDR", "127.0.0.1:8080");
        let listen_addr: SocketAddr = raw_addr.parse().map_err(|_| {
            CookieError::Config(format!(
                "LISTEN_ADDR must be a valid socket address, got {raw_addr:?}"
            ))
        })?;

        let same_site = env::var("COOKIE_SAME_SITE")
            .ok()
            .filter(|s| !s.is_empty())
            .map(|s| SameSite::from_str(&s));

        let cookie = ManagerOptions {
            current_secret: get_env("COOKIE_CURRENT_SECRET")?,
            previous_secret: get_env("COOKIE_PREVIOUS_SECRET")?,
            same_site,
            path: get_env_or("COOKIE_PATH", "/"),
            token_max_age_secs: get_env_u64_or("COOKIE_TOKEN_MAX_AGE_SECS", DEFAULT_MAX_AGE_SECS),
        };

        Ok(Arc::new(Self {
            listen_addr,
            log_format: get_env_or("LOG_FORMAT", "json"),
            cookie,
        }))
    }
}
