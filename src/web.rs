//! Demo web service.
//!
//! Exposes login, identity and logout endpoints that exercise the cookie
//! manager over plain HTTP/1.

pub mod routes;
pub mod server;

pub use routes::{SESSION_COOKIE_NAME, route};
pub use server::serve;
