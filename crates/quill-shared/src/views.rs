//! View models - the rendered shape of each page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A post as it appears in the list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub author_id: Uuid,
    pub created_on: DateTime<Utc>,
    pub like_count: u64,
}

/// A full post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub author_id: Uuid,
    pub status: String,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

/// A comment as readers see it. The author's email is never exposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: Uuid,
    pub name: String,
    pub body: String,
    pub approved: bool,
    pub created_on: DateTime<Utc>,
}

/// Paginated post list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListView {
    pub posts: Vec<PostSummary>,
    pub page: u64,
    pub num_pages: u64,
    pub total: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Post detail page with its approved comments and the comment form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailView {
    pub post: PostView,
    pub comments: Vec<CommentView>,
    pub commented: bool,
    pub liked: bool,
    pub like_count: u64,
    pub comment_form: CommentFormView,
}

/// State of a comment form. Blank unless editing an existing comment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentFormView {
    pub body: String,
}

/// Comment edit page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentEditView {
    pub comment_id: Uuid,
    pub post_slug: String,
    pub comment_form: CommentFormView,
}

/// Comment deletion confirmation page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDeleteView {
    pub comment: CommentView,
    pub post_slug: String,
}
