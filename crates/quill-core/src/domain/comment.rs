use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Longest accepted author name.
pub const MAX_NAME_LEN: usize = 80;

/// Longest accepted comment body, in characters.
pub const MAX_BODY_LEN: usize = 2000;

/// Identity a comment is attributed to. Taken from the requester, never
/// from the submitted form.
#[derive(Debug, Clone)]
pub struct CommentAuthor {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
}

/// Comment entity. Hidden from readers until `approved` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub name: String,
    pub email: String,
    pub body: String,
    pub approved: bool,
    pub created_on: DateTime<Utc>,
}

impl Comment {
    /// Build an unapproved comment on `post_id`.
    pub fn new(post_id: Uuid, author: CommentAuthor, body: &str) -> Result<Self, DomainError> {
        let mut problems = validate_author(&author);
        problems.extend(validate_body(body));
        if !problems.is_empty() {
            return Err(DomainError::Validation(problems));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            post_id,
            author_id: author.user_id,
            name: author.name.trim().to_string(),
            email: author.email.trim().to_string(),
            body: body.trim().to_string(),
            approved: false,
            created_on: Utc::now(),
        })
    }

    /// Replace the body, applying the same rules as creation.
    pub fn edit(&mut self, body: &str) -> Result<(), DomainError> {
        let problems = validate_body(body);
        if !problems.is_empty() {
            return Err(DomainError::Validation(problems));
        }
        self.body = body.trim().to_string();
        Ok(())
    }

    /// Only the author or staff may edit or remove a comment.
    pub fn can_be_managed_by(&self, user_id: Uuid, is_staff: bool) -> bool {
        is_staff || self.author_id == user_id
    }

    /// [`Self::can_be_managed_by`] as a result, for handlers to propagate.
    pub fn authorize_manage(&self, user_id: Uuid, is_staff: bool) -> Result<(), DomainError> {
        if self.can_be_managed_by(user_id, is_staff) {
            Ok(())
        } else {
            Err(DomainError::Forbidden(
                "Only the comment's author can change it".to_string(),
            ))
        }
    }
}

/// Field rules for a comment body.
pub fn validate_body(body: &str) -> Vec<String> {
    let body = body.trim();
    if body.is_empty() {
        vec!["body is required".to_string()]
    } else if body.chars().count() > MAX_BODY_LEN {
        vec![format!("body must be at most {MAX_BODY_LEN} characters")]
    } else {
        Vec::new()
    }
}

fn validate_author(author: &CommentAuthor) -> Vec<String> {
    let mut problems = Vec::new();

    let name = author.name.trim();
    if name.is_empty() {
        problems.push("name is required".to_string());
    } else if name.chars().count() > MAX_NAME_LEN {
        problems.push(format!("name must be at most {MAX_NAME_LEN} characters"));
    }

    if !looks_like_email(author.email.trim()) {
        problems.push("email is invalid".to_string());
    }

    problems
}

/// A non-empty local part and domain around a single `@`, no whitespace.
pub fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author() -> CommentAuthor {
        CommentAuthor {
            user_id: Uuid::new_v4(),
            name: "ada".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    #[test]
    fn new_comment_is_unapproved_and_trimmed() {
        let comment = Comment::new(Uuid::new_v4(), author(), "  Nice post!  ").unwrap();
        assert!(!comment.approved);
        assert_eq!(comment.body, "Nice post!");
        assert_eq!(comment.name, "ada");
    }

    #[test]
    fn blank_body_is_rejected() {
        let err = Comment::new(Uuid::new_v4(), author(), "   ").unwrap_err();
        assert!(matches!(err, DomainError::Validation(p) if p == vec!["body is required"]));
    }

    #[test]
    fn overlong_body_is_rejected() {
        let body = "x".repeat(MAX_BODY_LEN + 1);
        assert_eq!(validate_body(&body).len(), 1);
        assert!(validate_body(&"x".repeat(MAX_BODY_LEN)).is_empty());
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut bad = author();
        bad.email = "not-an-address".to_string();
        assert!(Comment::new(Uuid::new_v4(), bad, "hi").is_err());

        let mut spaced = author();
        spaced.email = "a b@example.com".to_string();
        assert!(Comment::new(Uuid::new_v4(), spaced, "hi").is_err());
    }

    #[test]
    fn edit_keeps_old_body_on_failure() {
        let mut comment = Comment::new(Uuid::new_v4(), author(), "first").unwrap();
        assert!(comment.edit("").is_err());
        assert_eq!(comment.body, "first");

        comment.edit("second").unwrap();
        assert_eq!(comment.body, "second");
    }

    #[test]
    fn only_author_or_staff_manage() {
        let comment = Comment::new(Uuid::new_v4(), author(), "hi").unwrap();
        let stranger = Uuid::new_v4();

        assert!(comment.can_be_managed_by(comment.author_id, false));
        assert!(!comment.can_be_managed_by(stranger, false));
        assert!(comment.can_be_managed_by(stranger, true));

        assert!(comment.authorize_manage(comment.author_id, false).is_ok());
        assert!(matches!(
            comment.authorize_manage(stranger, false),
            Err(DomainError::Forbidden(_))
        ));
    }
}
