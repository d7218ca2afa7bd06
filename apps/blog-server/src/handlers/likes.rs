//! Like toggling.

use actix_web::{HttpResponse, web};

use super::{post_detail_path, redirect};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /like/{slug}/
///
/// Resolves the post by slug whatever its status, flips the requester's
/// like and sends them back to the detail page.
pub async fn toggle_like(
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

    let outcome = state.likes.toggle(identity.user_id, post.id).await?;
    tracing::info!(
        post_id = %post.id,
        user_id = %identity.user_id,
        liked = outcome.is_liked(),
        "Like toggled"
    );

    Ok(redirect(&post_detail_path(&slug)))
}
