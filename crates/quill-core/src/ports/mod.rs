//! Ports - trait definitions for external dependencies.
//! Storage and identity providers implement these; handlers only see the traits.

mod auth;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use repository::{
    BaseRepository, CommentRepository, LikeRepository, PostRepository, UserRepository,
};
