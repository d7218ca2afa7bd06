//! SeaORM entities. Tables are created by the `migration` app.

pub mod comment;
pub mod post;
pub mod post_like;
pub mod user;
