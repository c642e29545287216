//! HTTP handlers and route configuration.

mod auth;
mod health;
mod messages;
mod notifications;
mod posts;
mod upload;
mod users;

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use ripple_shared::ErrorResponse;

use crate::middleware::error::{AppError, AppResult};
use crate::observability::RequestId;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/auth")
                    .route("/signup", web::post().to(auth::signup))
                    .route("/signin", web::post().to(auth::signin)),
            )
            // Everything below requires a bearer token
            .service(
                web::scope("/users")
                    .route("/search/{query}", web::get().to(users::search))
                    .route("/{id}/follow", web::post().to(users::follow))
                    .route("/{id}/unfollow", web::post().to(users::unfollow))
                    .route("/{key}/avatar", web::put().to(users::update_avatar))
                    .route("/{key}", web::get().to(users::get_user))
                    .route("/{key}", web::put().to(users::update_profile)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::post().to(posts::create))
                    .route("", web::get().to(posts::list))
                    .route("/user/{user_id}", web::get().to(posts::by_user))
                    .route("/saved/{user_id}", web::get().to(posts::saved))
                    .route("/{id}/save", web::post().to(posts::save))
                    .route("/{id}/save", web::delete().to(posts::unsave))
                    .route("/{id}/like", web::post().to(posts::like))
                    .route("/{id}/like", web::delete().to(posts::unlike))
                    .route("/{id}/comment", web::post().to(posts::comment))
                    .route("/{id}", web::delete().to(posts::delete)),
            )
            .service(
                web::scope("/messages")
                    .route("", web::post().to(messages::send))
                    .route(
                        "/conversations/{user_id}",
                        web::get().to(messages::conversations),
                    )
                    .route(
                        "/unread-count/{user_id}",
                        web::get().to(messages::unread_count),
                    )
                    .route(
                        "/read/{user_id}/{other_user_id}",
                        web::put().to(messages::mark_read),
                    )
                    .route("/{user_id}/{other_user_id}", web::get().to(messages::thread)),
            )
            .service(
                web::scope("/notifications")
                    .route("", web::post().to(notifications::create))
                    .route("/{user_id}", web::get().to(notifications::list))
                    .route("/{user_id}/read", web::put().to(notifications::mark_all_read))
                    .route("/{user_id}/{id}/read", web::put().to(notifications::mark_read)),
            ),
    )
    .default_service(web::to(not_found));
}

async fn not_found(request_id: RequestId) -> HttpResponse {
    HttpResponse::NotFound().json(
        ErrorResponse::not_found("No such route").with_request_id(request_id.as_str()),
    )
}

/// Parse a path or body id, naming it in the 400 when malformed.
pub(crate) fn parse_id(raw: &str, what: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::BadRequest(format!("Invalid {what} ID")))
}

/// Malformed JSON bodies render as problem details.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

#[cfg(test)]
mod tests;
