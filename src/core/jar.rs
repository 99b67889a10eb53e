//! Cookie header handling.
//!
//! Renders `Set-Cookie` values and looks cookies up in request `Cookie`
//! headers. Only single name/value pairs are understood.

use hyper::HeaderMap;
use hyper::header::COOKIE;

use crate::config::SameSite;

const EPOCH_EXPIRES: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// Formats a `Set-Cookie` value carrying `value`.
#[must_use]
pub fn format_set_cookie(name: &str, value: &str, path: &str, same_site: SameSite) -> String {
    format!("{name}={value}; Path={path}; HttpOnly; Secure; SameSite={same_site}")
}

/// Formats a `Set-Cookie` value that makes the client discard `name` at once.
#[must_use]
pub fn format_delete_cookie(name: &str, path: &str, same_site: SameSite) -> String {
    format!(
        "{name}=; Path={path}; Expires={EPOCH_EXPIRES}; Max-Age=0; HttpOnly; Secure; SameSite={same_site}"
    )
}

/// Returns the raw value of the first cookie called `name` across all
/// `Cookie` headers.
#[must_use]
pub fn find_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key.trim() == name).then(|| strip_quotes(value.trim()))
        })
}

/// RFC 6265 token check for cookie names.
#[must_use]
pub fn is_valid_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b))
}

/// Whether `path` can be written as a `Path` attribute as-is.
#[must_use]
pub fn is_valid_cookie_path(path: &str) -> bool {
    path.bytes().all(|b| (0x20..0x7f).contains(&b) && b != b';')
}

fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
