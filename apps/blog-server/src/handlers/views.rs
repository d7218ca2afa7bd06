//! Domain entity to view model conversions.

use quill_core::domain::{Comment, Post, PostStatus};
use quill_shared::views::{CommentView, PostSummary, PostView};

pub(crate) fn status_name(status: PostStatus) -> &'static str {
    match status {
        PostStatus::Draft => "draft",
        PostStatus::Published => "published",
    }
}

pub(crate) fn parse_status(raw: Option<&str>) -> Result<PostStatus, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(PostStatus::Draft),
        Some(s) if s.eq_ignore_ascii_case("draft") => Ok(PostStatus::Draft),
        Some(s) if s.eq_ignore_ascii_case("published") => Ok(PostStatus::Published),
        Some(other) => Err(format!("status must be 'draft' or 'published', got '{other}'")),
    }
}

pub(crate) fn post_summary(post: &Post, like_count: u64) -> PostSummary {
    PostSummary {
        id: post.id,
        title: post.title.clone(),
        slug: post.slug.clone(),
        excerpt: post.excerpt.clone(),
        author_id: post.author_id,
        created_on: post.created_on,
        like_count,
    }
}

pub(crate) fn post_view(post: &Post) -> PostView {
    PostView {
        id: post.id,
        title: post.title.clone(),
        slug: post.slug.clone(),
        excerpt: post.excerpt.clone(),
        content: post.content.clone(),
        author_id: post.author_id,
        status: status_name(post.status).to_string(),
        created_on: post.created_on,
        updated_on: post.updated_on,
    }
}

pub(crate) fn comment_view(comment: &Comment) -> CommentView {
    CommentView {
        id: comment.id,
        name: comment.name.clone(),
        body: comment.body.clone(),
        approved: comment.approved,
        created_on: comment.created_on,
    }
}
