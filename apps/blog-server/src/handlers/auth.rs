//! Account registration, login and the current-user lookup.

use actix_web::{HttpResponse, web};

use quill_core::domain::{MAX_NAME_LEN, User, looks_like_email};
use quill_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

fn validate_registration(req: &RegisterUserRequest) -> Vec<String> {
    let mut errors = Vec::new();

    let username = req.username.trim();
    if username.is_empty() {
        errors.push("Username is required".to_string());
    } else if username.chars().count() > MAX_NAME_LEN {
        errors.push(format!(
            "Username must be at most {MAX_NAME_LEN} characters"
        ));
    }
    if !looks_like_email(req.email.trim()) {
        errors.push("Invalid email address".to_string());
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }

    errors
}

fn issue_token(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let access_token = state
        .tokens
        .generate_token(user.id, &user.username, &user.email, user.roles())
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(AuthResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    })
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let errors = validate_registration(&req);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let username = req.username.trim().to_string();
    let email = req.email.trim().to_lowercase();

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }
    if state.users.find_by_username(&username).await?.is_some() {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    let password_hash = state
        .passwords
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let mut user = User::new(username, email, password_hash);
    user.is_staff = state.is_staff_email(&user.email);
    let user = state.users.save(user).await?;

    tracing::info!(user_id = %user.id, is_staff = user.is_staff, "User registered");

    Ok(HttpResponse::Created().json(issue_token(&state, &user)?))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_email(&req.email.trim().to_lowercase())
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid = state
        .passwords
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        tracing::warn!(user_id = %user.id, "Login rejected");
        return Err(AppError::Unauthorized);
    }

    Ok(HttpResponse::Ok().json(issue_token(&state, &user)?))
}

/// GET /api/auth/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(HttpResponse::Ok().json(UserResponse {
        id: user.id,
        roles: user.roles(),
        username: user.username,
        email: user.email,
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::json;

    use quill_core::domain::PostStatus;

    use super::*;
    use crate::handlers::testing::{bearer, seed_post, seed_user, test_app, test_state};

    fn register_request(username: &str, email: &str, password: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "username": username, "email": email, "password": password }))
    }

    #[actix_web::test]
    async fn register_login_and_me() {
        let state = test_state();
        let app = test_app!(state);

        let resp = test::call_service(
            &app,
            register_request("ada", "Ada@Example.com", "correct horse").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let auth: AuthResponse = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({ "email": "ada@example.com", "password": "correct horse" }))
                .to_request(),
        )
        .await;
        assert_eq!(auth.token_type, "Bearer");
        assert_eq!(auth.expires_in, 3600);

        let me: UserResponse = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/auth/me")
                .insert_header(bearer(&auth.access_token))
                .to_request(),
        )
        .await;
        assert_eq!(me.username, "ada");
        assert_eq!(me.email, "ada@example.com");
        assert_eq!(me.roles, vec!["user".to_string()]);
    }

    #[actix_web::test]
    async fn staff_emails_register_as_staff() {
        let state = test_state().with_staff_emails(vec!["editor@example.com".to_string()]);
        let app = test_app!(state);

        let auth: AuthResponse = test::call_and_read_body_json(
            &app,
            register_request("editor", "editor@example.com", "long enough").to_request(),
        )
        .await;

        let claims = state.tokens.validate_token(&auth.access_token).unwrap();
        assert!(claims.roles.iter().any(|r| r == "staff"));
    }

    #[actix_web::test]
    async fn duplicate_accounts_conflict() {
        let state = test_state();
        let app = test_app!(state);

        let resp = test::call_service(
            &app,
            register_request("ada", "ada@example.com", "password1").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = test::call_service(
            &app,
            register_request("other", "ADA@example.com", "password1").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = test::call_service(
            &app,
            register_request("ada", "new@example.com", "password1").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn invalid_registration_lists_every_problem() {
        let state = test_state();
        let app = test_app!(state);

        let resp = test::call_service(
            &app,
            register_request(" ", "nope", "short").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"].as_array().map(Vec::len), Some(3));
    }

    #[actix_web::test]
    async fn malformed_emails_are_rejected() {
        let state = test_state();
        let app = test_app!(state);

        for email in ["bob@", "@example.com", "a b@example.com", "a@b@example.com"] {
            let resp = test::call_service(
                &app,
                register_request("bob", email, "password1").to_request(),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY, "{email}");
        }
        assert!(state.users.find_by_username("bob").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn registered_users_can_comment() {
        let state = test_state();
        let (author, _) = seed_user(&state, "author", true).await;
        let post = seed_post(&state, &author, "Hello World", PostStatus::Published).await;
        let app = test_app!(state);

        let auth: AuthResponse = test::call_and_read_body_json(
            &app,
            register_request("bob", "bob@example.com", "password1").to_request(),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/post/hello-world/")
                .insert_header(bearer(&auth.access_token))
                .set_form([("body", "Great read")])
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(state.comments.count_for_post(post.id).await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn wrong_password_is_unauthorized() {
        let state = test_state();
        let app = test_app!(state);

        test::call_service(
            &app,
            register_request("ada", "ada@example.com", "password1").to_request(),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({ "email": "ada@example.com", "password": "password2" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn me_requires_a_token() {
        let state = test_state();
        let app = test_app!(state);

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/api/auth/me").to_request())
                .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
