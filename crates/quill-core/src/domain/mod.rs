//! Domain entities - the core business objects.

mod comment;
mod like;
mod page;
mod post;
mod user;

pub use comment::{
    Comment, CommentAuthor, MAX_BODY_LEN, MAX_NAME_LEN, looks_like_email, validate_body,
};
pub use like::{Like, LikeToggle};
pub use page::{Page, PageRequest};
pub use post::{Post, PostStatus, slugify};
pub use user::{STAFF_ROLE, USER_ROLE, User};
