//! Post list, post detail with comment submission, and post authoring.

use actix_web::{HttpResponse, web};

use quill_core::DomainError;
use quill_core::domain::{Comment, PageRequest, Post};
use quill_shared::dto::{CommentForm, CreatePostRequest, PageQuery};
use quill_shared::views::{CommentFormView, PostDetailView, PostListView};

use super::views::{comment_view, parse_status, post_summary, post_view};
use super::{POST_LIST_PATH, redirect_with_message};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Fixed size of a post list page.
pub const POSTS_PER_PAGE: u64 = 6;

/// A page named by the `page` query value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageNumber {
    Number(u64),
    Last,
}

/// Parse the `page` query value. Absent means the first page and `last` the
/// final one; anything else that is not a positive integer names no page.
fn parse_page(raw: Option<&str>) -> AppResult<PageNumber> {
    match raw.map(str::trim) {
        None => Ok(PageNumber::Number(1)),
        Some("last") => Ok(PageNumber::Last),
        Some(raw) => match raw.parse::<u64>() {
            Ok(page) if page >= 1 => Ok(PageNumber::Number(page)),
            _ => Err(AppError::NotFound(format!("Invalid page '{raw}'"))),
        },
    }
}

/// GET /
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let result = match parse_page(query.page.as_deref())? {
        PageNumber::Number(page) => {
            state
                .posts
                .list_published(PageRequest::new(page, POSTS_PER_PAGE))
                .await?
        }
        PageNumber::Last => {
            let head = state
                .posts
                .list_published(PageRequest::new(1, POSTS_PER_PAGE))
                .await?;
            match head.num_pages() {
                1 => head,
                last => {
                    state
                        .posts
                        .list_published(PageRequest::new(last, POSTS_PER_PAGE))
                        .await?
                }
            }
        }
    };

    if result.is_out_of_range() {
        return Err(AppError::NotFound(format!(
            "Page {} does not exist",
            result.page
        )));
    }

    let mut posts = Vec::with_capacity(result.items.len());
    for post in &result.items {
        let like_count = state.likes.count_for_post(post.id).await?;
        posts.push(post_summary(post, like_count));
    }

    Ok(HttpResponse::Ok().json(PostListView {
        posts,
        page: result.page,
        num_pages: result.num_pages(),
        total: result.total,
        has_next: result.has_next(),
        has_previous: result.has_previous(),
    }))
}

/// Everything the detail page shows, read before any write.
struct DetailContext {
    post: Post,
    comments: Vec<Comment>,
    liked: bool,
    like_count: u64,
}

impl DetailContext {
    async fn load(state: &AppState, slug: &str, requester: Option<&Identity>) -> AppResult<Self> {
        let post = state
            .posts
            .find_published_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post '{slug}' not found")))?;

        let comments = state.comments.list_approved_for_post(post.id).await?;
        let liked = match requester {
            Some(identity) => state.likes.exists(identity.user_id, post.id).await?,
            None => false,
        };
        let like_count = state.likes.count_for_post(post.id).await?;

        Ok(Self {
            post,
            comments,
            liked,
            like_count,
        })
    }

    fn render(&self, commented: bool) -> PostDetailView {
        PostDetailView {
            post: post_view(&self.post),
            comments: self.comments.iter().map(comment_view).collect(),
            commented,
            liked: self.liked,
            like_count: self.like_count,
            comment_form: CommentFormView::default(),
        }
    }
}

/// GET /post/{slug}/
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let context = DetailContext::load(&state, &slug, identity.0.as_ref()).await?;

    Ok(HttpResponse::Ok().json(context.render(false)))
}

/// POST /post/{slug}/
///
/// A valid comment is stored unapproved. An invalid one is dropped. Either
/// way the page comes back with `commented` set and a blank form.
pub async fn submit_comment(
    state: web::Data<AppState>,
    path: web::Path<String>,
    identity: Identity,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let context = DetailContext::load(&state, &slug, Some(&identity)).await?;

    match Comment::new(context.post.id, identity.comment_author(), &form.body) {
        Ok(comment) => {
            let saved = state.comments.save(comment).await?;
            tracing::info!(
                comment_id = %saved.id,
                post_id = %saved.post_id,
                user_id = %identity.user_id,
                "Comment submitted for moderation"
            );
        }
        Err(DomainError::Validation(problems)) => {
            tracing::debug!(?problems, slug = %slug, "Discarding invalid comment");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(HttpResponse::Ok().json(context.render(true)))
}

/// POST /posts/ - staff only.
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    if !identity.is_staff() {
        return Err(AppError::Forbidden("Only staff can publish posts".to_string()));
    }

    let req = body.into_inner();
    let status =
        parse_status(req.status.as_deref()).map_err(|e| AppError::Validation(vec![e]))?;
    let post = Post::new(identity.user_id, req.title, req.content, req.excerpt, status)?;

    if state.posts.find_by_slug(&post.slug).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "A post with slug '{}' already exists",
            post.slug
        )));
    }

    let saved = state.posts.save(post).await?;
    tracing::info!(post_id = %saved.id, slug = %saved.slug, "Post created");

    Ok(HttpResponse::Created().json(post_view(&saved)))
}

/// POST /post/{slug}/delete/ - the post's author or staff.
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let post = state
        .posts
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post '{slug}' not found")))?;

    if post.author_id != identity.user_id && !identity.is_staff() {
        return Err(AppError::Forbidden(
            "Only the author can delete this post".to_string(),
        ));
    }

    state.posts.delete(post.id).await?;
    tracing::info!(post_id = %post.id, user_id = %identity.user_id, "Post deleted");

    Ok(redirect_with_message(
        POST_LIST_PATH,
        "Post has been deleted successfully",
    ))
}
