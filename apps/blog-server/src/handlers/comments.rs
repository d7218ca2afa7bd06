//! Comment editing, deletion and moderation.
//!
//! Every route loads the comment, checks the requester may act on it, then
//! applies the change.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{Comment, Post};
use quill_shared::dto::CommentForm;
use quill_shared::views::{CommentDeleteView, CommentEditView, CommentFormView};

use super::views::comment_view;
use super::{HOME_PATH, POST_LIST_PATH, post_detail_path, redirect, redirect_with_message};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

async fn find_comment(state: &AppState, id: Uuid) -> AppResult<Comment> {
    state
        .comments
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Comment '{id}' not found")))
}

async fn find_owning_post(state: &AppState, comment: &Comment) -> AppResult<Post> {
    state
        .posts
        .find_by_id(comment.post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post '{}' not found", comment.post_id)))
}

/// Load a comment the requester is allowed to edit or delete.
async fn managed_comment(state: &AppState, id: Uuid, identity: &Identity) -> AppResult<Comment> {
    let comment = find_comment(state, id).await?;

    if let Err(denied) = comment.authorize_manage(identity.user_id, identity.is_staff()) {
        tracing::warn!(comment_id = %id, user_id = %identity.user_id, "Comment access denied");
        return Err(denied.into());
    }

    Ok(comment)
}

/// GET /comment/{id}/update/
pub async fn edit_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let comment = managed_comment(&state, path.into_inner(), &identity).await?;
    let post = find_owning_post(&state, &comment).await?;

    Ok(HttpResponse::Ok().json(CommentEditView {
        comment_id: comment.id,
        post_slug: post.slug,
        comment_form: CommentFormView { body: comment.body },
    }))
}

/// POST /comment/{id}/update/
pub async fn update_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    identity: Identity,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let mut comment = managed_comment(&state, path.into_inner(), &identity).await?;

    comment.edit(&form.body)?;
    let saved = state.comments.save(comment).await?;
    tracing::info!(comment_id = %saved.id, user_id = %identity.user_id, "Comment updated");

    Ok(redirect_with_message(
        HOME_PATH,
        "Comment has been updated successfully",
    ))
}

/// GET /comment/{id}/delete/
pub async fn confirm_delete_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let comment = managed_comment(&state, path.into_inner(), &identity).await?;
    let post = find_owning_post(&state, &comment).await?;

    Ok(HttpResponse::Ok().json(CommentDeleteView {
        comment: comment_view(&comment),
        post_slug: post.slug,
    }))
}

/// POST /comment/{id}/delete/
pub async fn delete_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let comment = managed_comment(&state, path.into_inner(), &identity).await?;

    state.comments.delete(comment.id).await?;
    tracing::info!(comment_id = %comment.id, user_id = %identity.user_id, "Comment deleted");

    Ok(redirect_with_message(
        POST_LIST_PATH,
        "Comment has been deleted successfully",
    ))
}

/// POST /comment/{id}/approve/ - staff only.
pub async fn approve_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    if !identity.is_staff() {
        return Err(AppError::Forbidden(
            "Only staff can moderate comments".to_string(),
        ));
    }

    let mut comment = find_comment(&state, path.into_inner()).await?;
    let post = find_owning_post(&state, &comment).await?;

    if !comment.approved {
        comment.approved = true;
        state.comments.save(comment).await?;
        tracing::info!(post_id = %post.id, moderator = %identity.user_id, "Comment approved");
    }

    Ok(redirect(&post_detail_path(&post.slug)))
}
