use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's endorsement of a post. At most one per (user, post) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(user_id: Uuid, post_id: Uuid) -> Self {
        Self {
            user_id,
            post_id,
            created_at: Utc::now(),
        }
    }
}

/// Outcome of toggling a like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeToggle {
    Liked,
    Unliked,
}

impl LikeToggle {
    pub fn is_liked(self) -> bool {
        matches!(self, LikeToggle::Liked)
    }
}
