//! Request routing.
//!
//! Maps request paths to cookie manager operations and renders plain text
//! responses.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{CACHE_CONTROL, CONTENT_TYPE, HeaderValue};
use hyper::{Request, Response, StatusCode};
use percent_encoding::percent_decode_str;
use tracing::{debug, error, info};

use crate::core::manager::CookieManager;

pub const SESSION_COOKIE_NAME: &str = "session";

/// Handles one request against `manager`.
///
/// - `/login?user=NAME` signs `NAME` into the session cookie.
/// - `/whoami` returns the verified session value, or 401.
/// - `/logout` expires the session cookie.
#[must_use]
pub fn route<B>(manager: &CookieManager, req: &Request<B>) -> Response<Full<Bytes>> {
    match req.uri().path() {
        "/login" => login(manager, req),
        "/whoami" => whoami(manager, req),
        "/logout" => logout(manager),
        _ => text_response(StatusCode::NOT_FOUND, "Not Found\n"),
    }
}

fn login<B>(manager: &CookieManager, req: &Request<B>) -> Response<Full<Bytes>> {
    let Some(user) = req
        .uri()
        .query()
        .and_then(|q| query_param(q, "user"))
        .filter(|u| !u.is_empty())
    else {
        return text_response(StatusCode::BAD_REQUEST, "Missing user parameter\n");
    };

    let mut response = text_response(StatusCode::OK, format!("Signed in as {user}\n"));
    if let Err(e) = manager.set_cookie(&mut response, SESSION_COOKIE_NAME, &user) {
        error!(error = %e, "Failed to set session cookie");
        return text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error\n");
    }

    info!(user = %user, "Session started");
    response
}

fn whoami<B>(manager: &CookieManager, req: &Request<B>) -> Response<Full<Bytes>> {
    match manager.get_cookie_value(req, SESSION_COOKIE_NAME) {
        Ok(user) => text_response(StatusCode::OK, format!("{user}\n")),
        Err(e) if e.is_client_error() => {
            debug!(error = %e, "Session cookie rejected");
            text_response(StatusCode::UNAUTHORIZED, "Not signed in\n")
        }
        Err(e) => {
            error!(error = %e, "Failed to read session cookie");
            text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error\n")
        }
    }
}

fn logout(manager: &CookieManager) -> Response<Full<Bytes>> {
    let mut response = text_response(StatusCode::OK, "Signed out\n");
    manager.delete_cookie(&mut response, SESSION_COOKIE_NAME);
    response
}

fn query_param(query: &str, key: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        if k != key {
            return None;
        }
        let v = v.replace('+', " ");
        percent_decode_str(&v)
            .decode_utf8()
            .ok()
            .map(|s| s.into_owned())
    })
}

fn text_response(status: StatusCode, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
