//! Fixtures shared by handler tests.

use std::sync::Arc;

use actix_web::http::header;
use quill_core::domain::{Comment, CommentAuthor, Post, PostStatus, User};
use quill_infra::{Argon2PasswordService, JwtConfig, JwtTokenService};

use crate::state::AppState;

/// Build an initialized test service over `state` with every route mounted.
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state.clone()))
                .configure(crate::handlers::configure_routes),
        )
        .await
    };
}
pub(crate) use test_app;

pub(crate) fn test_state() -> AppState {
    let tokens = JwtTokenService::new(JwtConfig {
        secret: "test-secret".to_string(),
        expiration_hours: 1,
        issuer: "quill-test".to_string(),
    });
    AppState::in_memory(Arc::new(tokens), Arc::new(Argon2PasswordService::new()))
}

/// A stored user and a bearer token for them.
pub(crate) async fn seed_user(state: &AppState, username: &str, staff: bool) -> (User, String) {
    let mut user = User::new(
        username.to_string(),
        format!("{username}@example.com"),
        "not-a-real-hash".to_string(),
    );
    user.is_staff = staff;
    let user = state.users.save(user).await.unwrap();

    let token = state
        .tokens
        .generate_token(user.id, &user.username, &user.email, user.roles())
        .unwrap();
    (user, token)
}

pub(crate) async fn seed_post(
    state: &AppState,
    author: &User,
    title: &str,
    status: PostStatus,
) -> Post {
    let post = Post::new(
        author.id,
        title.to_string(),
        format!("All about {title}"),
        String::new(),
        status,
    )
    .unwrap();
    state.posts.save(post).await.unwrap()
}

pub(crate) async fn seed_comment(
    state: &AppState,
    post: &Post,
    author: &User,
    body: &str,
    approved: bool,
) -> Comment {
    let mut comment = Comment::new(
        post.id,
        CommentAuthor {
            user_id: author.id,
            name: author.username.clone(),
            email: author.email.clone(),
        },
        body,
    )
    .unwrap();
    comment.approved = approved;
    state.comments.save(comment).await.unwrap()
}

pub(crate) fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}
