//! # Quill Core
//!
//! The domain layer of the Quill blog.
//! Entities, validation rules and the ports that storage and identity
//! providers implement. No infrastructure dependencies live here.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, RepoError};
