//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod likes;
mod posts;
mod views;

#[cfg(test)]
pub(crate) mod testing;

use actix_web::{HttpResponse, http::header, web};
use quill_shared::ApiResponse;

/// Landing page. Comment edits return here.
pub const HOME_PATH: &str = "/";

/// Published post list. Deletions return here.
pub const POST_LIST_PATH: &str = "/";

/// Location of a post's detail page.
pub fn post_detail_path(slug: &str) -> String {
    format!("/post/{slug}/")
}

/// `303 See Other` to `location`.
pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// `303 See Other` carrying a success acknowledgment.
pub(crate) fn redirect_with_message(location: &str, message: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .json(ApiResponse::acknowledged(message))
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(posts::list_posts))
        .route("/posts/", web::post().to(posts::create_post))
        .service(
            web::resource("/post/{slug}/")
                .route(web::get().to(posts::post_detail))
                .route(web::post().to(posts::submit_comment)),
        )
        .route("/post/{slug}/delete/", web::post().to(posts::delete_post))
        .route("/like/{slug}/", web::post().to(likes::toggle_like))
        .service(
            web::resource("/comment/{id}/update/")
                .route(web::get().to(comments::edit_comment))
                .route(web::post().to(comments::update_comment)),
        )
        .service(
            web::resource("/comment/{id}/delete/")
                .route(web::get().to(comments::confirm_delete_comment))
                .route(web::post().to(comments::delete_comment)),
        )
        .route("/comment/{id}/approve/", web::post().to(comments::approve_comment))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register))
                        .route("/login", web::post().to(auth::login))
                        .route("/me", web::get().to(auth::me)),
                ),
        );
}
