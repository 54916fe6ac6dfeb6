//! HTTP handlers and route configuration.

mod account;
mod auth;
mod health;
mod import;
mod posts;

use actix_web::web;

use quill_core::domain::ImageKind;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Sniff an uploaded body; anything but a supported image is refused.
fn uploaded_image(bytes: &[u8]) -> AppResult<ImageKind> {
    ImageKind::detect(bytes)
        .ok_or_else(|| AppError::BadRequest("Specify the correct file".to_string()))
}

/// Delete a stored upload whose database row could not be written.
async fn discard_upload(state: &AppState, relative_path: &str) {
    if let Err(e) = state.media.remove(relative_path).await {
        tracing::warn!(path = %relative_path, error = %e, "Failed to remove orphaned upload");
    }
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/logout", web::post().to(auth::logout)),
            )
            .service(
                web::scope("/users")
                    .route("/me", web::get().to(account::me))
                    .route("/me", web::put().to(account::update_me))
                    .route("/me/avatar", web::put().to(account::upload_avatar)),
            )
            .service(
                web::scope("/posts")
                    // fixed paths before `/{id}`
                    .route("/import", web::get().to(import::import_format))
                    .route("/import", web::post().to(import::import_posts))
                    .route("/export", web::get().to(import::export_posts))
                    .route("", web::get().to(posts::list_posts))
                    .route("", web::post().to(posts::create_post))
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}/images", web::post().to(posts::upload_image)),
            ),
    );
}
