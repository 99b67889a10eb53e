//! Core system components.
//!
//! Contains the rotating cookie manager and the cookie header plumbing it
//! writes through.

pub mod jar;
pub mod manager;

pub use manager::CookieManager;
