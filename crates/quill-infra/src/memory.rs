//! In-memory storage - used when no database is configured and in tests.
//!
//! One store backs every repository port so cascades and uniqueness checks
//! can see all tables under a single lock. Data is lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Comment, Like, LikeToggle, Page, PageRequest, Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{
    BaseRepository, CommentRepository, LikeRepository, PostRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    /// Keyed by (user_id, post_id).
    likes: HashMap<(Uuid, Uuid), Like>,
}

/// In-memory implementation of all repository ports.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;

        let clash = tables.users.values().any(|other| {
            other.id != user.id && (other.email == user.email || other.username == user.username)
        });
        if clash {
            return Err(RepoError::Constraint("User already exists".to_string()));
        }

        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.tables
            .write()
            .await
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;

        if tables
            .posts
            .values()
            .any(|other| other.id != post.id && other.slug == post.slug)
        {
            return Err(RepoError::Constraint(format!(
                "Slug '{}' is already taken",
                post.slug
            )));
        }

        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }

        tables.comments.retain(|_, c| c.post_id != id);
        tables.likes.retain(|(_, post_id), _| *post_id != id);
        tracing::debug!(post_id = %id, "Removed post with its comments and likes");
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.values().find(|p| p.slug == slug).cloned())
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .values()
            .find(|p| p.slug == slug && p.is_published())
            .cloned())
    }

    async fn list_published(&self, request: PageRequest) -> Result<Page<Post>, RepoError> {
        let tables = self.tables.read().await;

        let mut published: Vec<&Post> = tables.posts.values().filter(|p| p.is_published()).collect();
        published.sort_by(|a, b| b.created_on.cmp(&a.created_on));

        let total = published.len() as u64;
        if request.is_beyond(total) {
            return Ok(Page::new(Vec::new(), total, request));
        }

        let items = published
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.per_page as usize)
            .cloned()
            .collect();

        Ok(Page::new(items, total, request))
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;

        if !tables.posts.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint(format!(
                "Post {} does not exist",
                comment.post_id
            )));
        }

        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.tables
            .write()
            .await
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn list_approved_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;

        let mut approved: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id && c.approved)
            .cloned()
            .collect();
        approved.sort_by(|a, b| b.created_on.cmp(&a.created_on));

        Ok(approved)
    }

    async fn count_for_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.comments.values().filter(|c| c.post_id == post_id).count() as u64)
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn exists(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError> {
        Ok(self
            .tables
            .read()
            .await
            .likes
            .contains_key(&(user_id, post_id)))
    }

    async fn toggle(&self, user_id: Uuid, post_id: Uuid) -> Result<LikeToggle, RepoError> {
        // Check and write happen under one write guard.
        let mut tables = self.tables.write().await;

        if tables.likes.remove(&(user_id, post_id)).is_some() {
            return Ok(LikeToggle::Unliked);
        }
        if !tables.posts.contains_key(&post_id) {
            return Err(RepoError::Constraint(format!("Post {post_id} does not exist")));
        }

        tables
            .likes
            .insert((user_id, post_id), Like::new(user_id, post_id));
        Ok(LikeToggle::Liked)
    }

    async fn count_for_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.likes.keys().filter(|(_, p)| *p == post_id).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use quill_core::domain::{CommentAuthor, PostStatus};

    fn post(title: &str, status: PostStatus, minutes_ago: i64) -> Post {
        let mut post = Post::new(
            Uuid::new_v4(),
            title.to_string(),
            "content".to_string(),
            String::new(),
            status,
        )
        .unwrap();
        post.created_on = Utc::now() - Duration::minutes(minutes_ago);
        post
    }

    fn comment(post_id: Uuid, body: &str) -> Comment {
        let author = CommentAuthor {
            user_id: Uuid::new_v4(),
            name: "ada".to_string(),
            email: "ada@example.com".to_string(),
        };
        Comment::new(post_id, author, body).unwrap()
    }

    #[tokio::test]
    async fn list_published_skips_drafts_and_orders_newest_first() {
        let store = InMemoryStore::new();
        let posts: &dyn PostRepository = &store;

        posts.save(post("Old", PostStatus::Published, 30)).await.unwrap();
        posts.save(post("New", PostStatus::Published, 1)).await.unwrap();
        posts.save(post("Hidden", PostStatus::Draft, 0)).await.unwrap();

        let page = posts.list_published(PageRequest::new(1, 6)).await.unwrap();
        let titles: Vec<_> = page.items.iter().map(|p| p.title.as_str()).collect();

        assert_eq!(titles, vec!["New", "Old"]);
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn list_published_pages_by_size() {
        let store = InMemoryStore::new();
        let posts: &dyn PostRepository = &store;
        for i in 0..8 {
            posts
                .save(post(&format!("Post {i}"), PostStatus::Published, i))
                .await
                .unwrap();
        }

        let second = posts.list_published(PageRequest::new(2, 6)).await.unwrap();
        assert_eq!(second.items.len(), 2);
        assert_eq!(second.total, 8);
        assert_eq!(second.num_pages(), 2);
    }

    #[tokio::test]
    async fn list_published_past_the_end_is_empty() {
        let store = InMemoryStore::new();
        let posts: &dyn PostRepository = &store;
        posts.save(post("Only", PostStatus::Published, 0)).await.unwrap();

        let page = posts.list_published(PageRequest::new(u64::MAX, 6)).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 1);
        assert!(page.is_out_of_range());
    }

    #[tokio::test]
    async fn published_lookup_hides_drafts() {
        let store = InMemoryStore::new();
        let posts: &dyn PostRepository = &store;
        posts.save(post("Draft", PostStatus::Draft, 0)).await.unwrap();

        assert!(posts.find_published_by_slug("draft").await.unwrap().is_none());
        assert!(posts.find_by_slug("draft").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn duplicate_slug_is_a_constraint_violation() {
        let store = InMemoryStore::new();
        let posts: &dyn PostRepository = &store;
        posts.save(post("Same", PostStatus::Draft, 0)).await.unwrap();

        let err = posts.save(post("Same", PostStatus::Draft, 0)).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn toggle_twice_restores_state() {
        let store = InMemoryStore::new();
        let target = post("Liked", PostStatus::Published, 0);
        let post_id = target.id;
        BaseRepository::<Post, Uuid>::save(&store, target).await.unwrap();

        let likes: &dyn LikeRepository = &store;
        let user = Uuid::new_v4();

        assert_eq!(likes.toggle(user, post_id).await.unwrap(), LikeToggle::Liked);
        assert!(likes.exists(user, post_id).await.unwrap());
        assert_eq!(likes.count_for_post(post_id).await.unwrap(), 1);

        assert_eq!(likes.toggle(user, post_id).await.unwrap(), LikeToggle::Unliked);
        assert!(!likes.exists(user, post_id).await.unwrap());
        assert_eq!(likes.count_for_post(post_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn approved_comments_only_newest_first() {
        let store = InMemoryStore::new();
        let target = post("Talk", PostStatus::Published, 0);
        let post_id = target.id;
        BaseRepository::<Post, Uuid>::save(&store, target).await.unwrap();

        let comments: &dyn CommentRepository = &store;
        let mut older = comment(post_id, "older");
        older.approved = true;
        older.created_on = Utc::now() - Duration::minutes(5);
        let mut newer = comment(post_id, "newer");
        newer.approved = true;
        comments.save(older).await.unwrap();
        comments.save(newer).await.unwrap();
        comments.save(comment(post_id, "pending")).await.unwrap();

        let visible = comments.list_approved_for_post(post_id).await.unwrap();
        let bodies: Vec<_> = visible.iter().map(|c| c.body.as_str()).collect();

        assert_eq!(bodies, vec!["newer", "older"]);
        assert_eq!(comments.count_for_post(post_id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn comment_on_missing_post_is_rejected() {
        let store = InMemoryStore::new();
        let comments: &dyn CommentRepository = &store;

        let err = comments.save(comment(Uuid::new_v4(), "orphan")).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn deleting_post_cascades() {
        let store = InMemoryStore::new();
        let target = post("Doomed", PostStatus::Published, 0);
        let post_id = target.id;
        let posts: &dyn PostRepository = &store;
        posts.save(target).await.unwrap();

        let comments: &dyn CommentRepository = &store;
        comments.save(comment(post_id, "bye")).await.unwrap();
        let likes: &dyn LikeRepository = &store;
        likes.toggle(Uuid::new_v4(), post_id).await.unwrap();

        posts.delete(post_id).await.unwrap();

        assert_eq!(comments.count_for_post(post_id).await.unwrap(), 0);
        assert_eq!(likes.count_for_post(post_id).await.unwrap(), 0);
        assert!(matches!(posts.delete(post_id).await, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn users_are_unique_by_email_and_username() {
        let store = InMemoryStore::new();
        let users: &dyn UserRepository = &store;

        users
            .save(User::new("ada".into(), "ada@example.com".into(), "h".into()))
            .await
            .unwrap();

        let same_email = User::new("other".into(), "ada@example.com".into(), "h".into());
        assert!(users.save(same_email).await.is_err());

        let same_name = User::new("ada".into(), "other@example.com".into(), "h".into());
        assert!(users.save(same_name).await.is_err());

        assert!(users.find_by_username("ada").await.unwrap().is_some());
    }
}
