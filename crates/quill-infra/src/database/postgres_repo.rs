//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use quill_core::domain::{Comment, Like, LikeToggle, Page, PageRequest, Post, PostStatus, User};
use quill_core::error::RepoError;
use quill_core::ports::{CommentRepository, LikeRepository, PostRepository, UserRepository};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_like::{self, Entity as PostLikeEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_error, write_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository. Comments and likes are removed by
/// `ON DELETE CASCADE` when a post is deleted.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) if local.len() > 1 => format!("{first}***@{domain}"),
            _ => format!("***@{domain}"),
        },
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .filter(post::Column::Status.eq(PostStatus::Published.as_i16()))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn list_published(&self, request: PageRequest) -> Result<Page<Post>, RepoError> {
        tracing::debug!(page = request.page, per_page = request.per_page, "Listing published posts");

        let paginator = PostEntity::find()
            .filter(post::Column::Status.eq(PostStatus::Published.as_i16()))
            .order_by_desc(post::Column::CreatedOn)
            .paginate(&self.db, request.per_page);

        let total = paginator.num_items().await.map_err(query_error)?;
        if request.is_beyond(total) {
            return Ok(Page::new(Vec::new(), total, request));
        }

        let items = paginator
            .fetch_page(request.page.saturating_sub(1))
            .await
            .map_err(query_error)?;

        Ok(Page::new(
            items.into_iter().map(Into::into).collect(),
            total,
            request,
        ))
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_approved_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::Approved.eq(true))
            .order_by_desc(comment::Column::CreatedOn)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_for_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .count(&self.db)
            .await
            .map_err(query_error)
    }
}

/// PostgreSQL like relation. The composite primary key of `post_likes`
/// keeps each (user, post) pair unique.
pub struct PostgresLikeRepository {
    db: DbConn,
}

impl PostgresLikeRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LikeRepository for PostgresLikeRepository {
    async fn exists(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError> {
        let found = PostLikeEntity::find_by_id((user_id, post_id))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(found.is_some())
    }

    async fn toggle(&self, user_id: Uuid, post_id: Uuid) -> Result<LikeToggle, RepoError> {
        // Delete first: a matched row means the pair existed. Otherwise insert,
        // letting the primary key absorb a concurrent insert of the same pair.
        let removed = PostLikeEntity::delete_by_id((user_id, post_id))
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        if removed.rows_affected > 0 {
            return Ok(LikeToggle::Unliked);
        }

        let like: post_like::ActiveModel = Like::new(user_id, post_id).into();
        PostLikeEntity::insert(like)
            .on_conflict(
                OnConflict::columns([post_like::Column::UserId, post_like::Column::PostId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(write_error)?;

        Ok(LikeToggle::Liked)
    }

    async fn count_for_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        PostLikeEntity::find()
            .filter(post_like::Column::PostId.eq(post_id))
            .count(&self.db)
            .await
            .map_err(query_error)
    }
}
