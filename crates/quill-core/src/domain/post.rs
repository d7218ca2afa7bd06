use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Publication state of a post. Stored as a small integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_i16(self) -> i16 {
        match self {
            PostStatus::Draft => 0,
            PostStatus::Published => 1,
        }
    }

    /// Unknown codes are treated as drafts so they never leak publicly.
    pub fn from_i16(code: i16) -> Self {
        match code {
            1 => PostStatus::Published,
            _ => PostStatus::Draft,
        }
    }
}

/// Post entity - a blog article addressed by its slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub status: PostStatus,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

impl Post {
    /// Create a new post, deriving its slug from the title.
    pub fn new(
        author_id: Uuid,
        title: String,
        content: String,
        excerpt: String,
        status: PostStatus,
    ) -> Result<Self, DomainError> {
        let mut problems = Vec::new();
        if title.trim().is_empty() {
            problems.push("title is required".to_string());
        }
        if content.trim().is_empty() {
            problems.push("content is required".to_string());
        }
        let slug = slugify(&title);
        if slug.is_empty() && !title.trim().is_empty() {
            problems.push("title must contain at least one letter or digit".to_string());
        }
        if !problems.is_empty() {
            return Err(DomainError::Validation(problems));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            author_id,
            title: title.trim().to_string(),
            slug,
            excerpt,
            content,
            status,
            created_on: now,
            updated_on: now,
        })
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }
}

/// Turn a title into a URL slug: lowercase ASCII alphanumerics separated by
/// single hyphens. Everything else is a separator.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust   2024 -- edition "), "rust-2024-edition");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn new_post_derives_slug_and_defaults() {
        let post = Post::new(
            Uuid::new_v4(),
            "Hello World".into(),
            "body".into(),
            String::new(),
            PostStatus::default(),
        )
        .unwrap();

        assert_eq!(post.slug, "hello-world");
        assert!(!post.is_published());
    }

    #[test]
    fn new_post_rejects_unsluggable_title() {
        let err = Post::new(
            Uuid::new_v4(),
            "!!!".into(),
            "body".into(),
            String::new(),
            PostStatus::Published,
        )
        .unwrap_err();

        assert!(matches!(err, DomainError::Validation(ref p) if p.len() == 1));
    }

    #[test]
    fn status_codes_round_trip_and_unknown_is_draft() {
        assert_eq!(PostStatus::from_i16(PostStatus::Published.as_i16()), PostStatus::Published);
        assert_eq!(PostStatus::from_i16(7), PostStatus::Draft);
    }
}
