//! Bulk import and export of posts files.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, web};

use quill_core::ImportOutcome;
use quill_core::import::{ImportError, write_record};
use quill_shared::dto::ImportFormatResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts/import
///
/// Describes the file the import endpoint expects.
pub async fn import_format(state: web::Data<AppState>) -> HttpResponse {
    let config = state.importer.config();

    HttpResponse::Ok().json(ImportFormatResponse {
        delimiter: config.delimiter.to_string(),
        fields: ["title", "content", "published_at"]
            .map(String::from)
            .to_vec(),
        date_format: "hh:mi:ss dd.mm.yyyy".to_string(),
        max_title_length: config.max_title_length,
        max_content_length: config.max_content_length,
        example: write_record(
            &["First post", "A short story", "12:01:23 03.04.2021"],
            config.delimiter,
        ),
    })
}

/// POST /api/posts/import
///
/// Body is the raw posts file. Always answers 200 with an [`ImportOutcome`];
/// either every line becomes a post or none does.
pub async fn import_posts(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Bytes,
) -> HttpResponse {
    let author = identity.user_id;
    let result = state.importer.run(author, &body).await;

    match &result {
        Ok(count) => {
            tracing::info!(%author, count, bytes = body.len(), "Posts file imported");
        }
        Err(ImportError::Unexpected(source)) => {
            tracing::error!(%author, kind = "unexpected", error = %source, "Posts import failed");
        }
        Err(err) => {
            tracing::warn!(%author, kind = err.kind(), line = ?err.line(), "Posts file rejected");
        }
    }

    HttpResponse::Ok().json(ImportOutcome::from(result))
}

/// GET /api/posts/export
///
/// The caller's posts in the import format.
pub async fn export_posts(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let posts = state.posts.find_by_author(identity.user_id).await?;
    let body = state.importer.export(&posts);

    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(body))
}
