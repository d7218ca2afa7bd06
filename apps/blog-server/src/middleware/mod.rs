//! Request-level plumbing: error responses and identity extraction.

pub mod auth;
pub mod error;
