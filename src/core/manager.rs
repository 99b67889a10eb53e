//! Cookie manager with secret rotation.
//!
//! Signs every cookie with the current secret and verifies with the current
//! secret first, falling back to the previous one. Rotating means promoting a
//! new current secret and demoting the old one to previous; cookies issued
//! under the old secret keep verifying until the next rotation drops it.

use hyper::header::{HeaderValue, SET_COOKIE};
use hyper::{Request, Response};
use tracing::{debug, warn};

use super::jar::{
    find_cookie, format_delete_cookie, format_set_cookie, is_valid_cookie_name,
    is_valid_cookie_path,
};
use crate::config::{CookieError, ManagerOptions, Result, SameSite};
use crate::security::crypto::{Secret, SecretSlot, SecretStrength, SecureCookie};

/// Signs and verifies cookie values under a current and a previous secret.
///
/// Immutable after construction; share it behind an `Arc` between handlers.
#[derive(Debug, Clone)]
pub struct CookieManager {
    current: SecureCookie,
    previous: SecureCookie,
    same_site: SameSite,
    path: String,
}

impl CookieManager {
    /// Builds a manager from base64 secrets and cookie attribute defaults.
    ///
    /// Both secrets are required. Set `previous_secret` equal to
    /// `current_secret` when no rotation is in progress.
    ///
    /// # Errors
    ///
    /// Returns `CookieError::Decoding` or `CookieError::InvalidSecretLength`
    /// naming the offending secret, and `CookieError::Config` if the path
    /// cannot be written into a `Set-Cookie` header.
    pub fn new(options: &ManagerOptions) -> Result<Self> {
        let current = Secret::from_base64(SecretSlot::Current, &options.current_secret)?;
        let previous = Secret::from_base64(SecretSlot::Previous, &options.previous_secret)?;

        let path = if options.path.is_empty() {
            "/".to_string()
        } else {
            options.path.clone()
        };
        if !is_valid_cookie_path(&path) {
            return Err(CookieError::Config(format!("invalid cookie path {path:?}")));
        }

        Ok(Self {
            current: SecureCookie::new(&current).with_max_age(options.token_max_age_secs),
            previous: SecureCookie::new(&previous).with_max_age(options.token_max_age_secs),
            same_site: options.same_site.unwrap_or_default(),
            path,
        })
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub const fn same_site(&self) -> SameSite {
        self.same_site
    }

    #[must_use]
    pub const fn current_strength(&self) -> SecretStrength {
        self.current.strength()
    }

    #[must_use]
    pub const fn previous_strength(&self) -> SecretStrength {
        self.previous.strength()
    }

    /// Produces a token for `value` under the current secret.
    ///
    /// # Errors
    ///
    /// Returns `CookieError::Signing` if the signer fails.
    pub fn sign(&self, name: &str, value: &str) -> Result<String> {
        self.current
            .encode(name, value)
            .map_err(CookieError::Signing)
    }

    /// Verifies `token` for the cookie called `name`.
    ///
    /// Any rejection by the current secret triggers a second attempt with the
    /// previous secret, whose result is final.
    ///
    /// # Errors
    ///
    /// Returns `CookieError::Verification` carrying the previous secret's
    /// error when both secrets reject the token.
    pub fn read(&self, name: &str, token: &str) -> Result<String> {
        let err = match self.current.decode(name, token) {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        debug!(cookie = %name, error = %err, "Current secret rejected cookie, trying previous secret");

        match self.previous.decode(name, token) {
            Ok(value) => {
                debug!(cookie = %name, "Cookie verified with previous secret");
                Ok(value)
            }
            Err(e) => {
                debug!(cookie = %name, error = %e, "Previous secret rejected cookie");
                Err(CookieError::Verification(e))
            }
        }
    }

    /// Signs `value` and appends a `Set-Cookie` header for it to `response`.
    ///
    /// Nothing is written when signing fails.
    ///
    /// # Errors
    ///
    /// Returns `CookieError::InvalidCookieName` if `name` is not a valid
    /// cookie name and `CookieError::Signing` if the signer fails.
    pub fn set_cookie<B>(&self, response: &mut Response<B>, name: &str, value: &str) -> Result<()> {
        if !is_valid_cookie_name(name) {
            return Err(CookieError::InvalidCookieName(name.to_string()));
        }

        let token = self.sign(name, value)?;
        let header = format_set_cookie(name, &token, &self.path, self.same_site);
        let header = HeaderValue::from_str(&header)
            .map_err(|_| CookieError::InvalidCookieName(name.to_string()))?;

        response.headers_mut().append(SET_COOKIE, header);
        Ok(())
    }

    /// Reads and verifies the cookie called `name` from `request`.
    ///
    /// # Errors
    ///
    /// Returns `CookieError::CookieNotFound` if the request does not carry
    /// the cookie and `CookieError::Verification` if neither secret accepts it.
    pub fn get_cookie_value<B>(&self, request: &Request<B>, name: &str) -> Result<String> {
        let token = find_cookie(request.headers(), name).ok_or_else(|| {
            CookieError::CookieNotFound {
                name: name.to_string(),
            }
        })?;
        self.read(name, token)
    }

    /// Appends a `Set-Cookie` header to `response` that expires the cookie
    /// called `name` on the client, using the same path and same-site policy
    /// the cookie was written with.
    pub fn delete_cookie<B>(&self, response: &mut Response<B>, name: &str) {
        let header = format_delete_cookie(name, &self.path, self.same_site);
        match HeaderValue::from_str(&header) {
            Ok(header) if is_valid_cookie_name(name) => {
                response.headers_mut().append(SET_COOKIE, header);
            }
            _ => warn!(cookie = ?name, "Refusing to delete cookie with invalid name"),
        }
    }
}
