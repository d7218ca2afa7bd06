use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role granted to every registered user.
pub const USER_ROLE: &str = "user";

/// Role allowed to moderate comments and author posts.
pub const STAFF_ROLE: &str = "staff";

/// User entity - an account that can comment, like and (as staff) publish.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new non-staff user with generated ID and timestamps.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            is_staff: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Roles carried in this user's access tokens.
    pub fn roles(&self) -> Vec<String> {
        let mut roles = vec![USER_ROLE.to_string()];
        if self.is_staff {
            roles.push(STAFF_ROLE.to_string());
        }
        roles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_users_carry_both_roles() {
        let mut user = User::new("ada".into(), "ada@example.com".into(), "hash".into());
        assert_eq!(user.roles(), vec!["user".to_string()]);

        user.is_staff = true;
        assert_eq!(user.roles(), vec!["user".to_string(), "staff".to_string()]);
    }
}
