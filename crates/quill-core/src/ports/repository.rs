use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, LikeToggle, Page, PageRequest, Post, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with lookups used by login and registration.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
///
/// Deleting a post must also remove its comments and likes.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Find a post by slug regardless of status.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Find a post by slug only if it is published.
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Published posts, newest first.
    async fn list_published(&self, request: PageRequest) -> Result<Page<Post>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Approved comments on a post, newest first.
    async fn list_approved_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    /// All comments on a post, approved or not.
    async fn count_for_post(&self, post_id: Uuid) -> Result<u64, RepoError>;
}

/// The user/post like relation.
#[async_trait]
pub trait LikeRepository: Send + Sync {
    async fn exists(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError>;

    /// Remove the pair if present, otherwise add it. Atomic per pair.
    async fn toggle(&self, user_id: Uuid, post_id: Uuid) -> Result<LikeToggle, RepoError>;

    async fn count_for_post(&self, post_id: Uuid) -> Result<u64, RepoError>;
}
