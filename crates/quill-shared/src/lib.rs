//! # Quill Shared
//!
//! Wire types shared by the server and its clients: request bodies,
//! rendered view models and the standard response envelopes.

pub mod dto;
pub mod response;
pub mod views;

pub use response::{ApiResponse, ErrorResponse};
