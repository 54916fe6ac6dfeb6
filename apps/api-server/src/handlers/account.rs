//! The caller's own account.

use actix_web::{HttpResponse, web};

use quill_core::DomainError;
use quill_core::domain::User;
use quill_core::ports::{BaseRepository, MediaFolder};
use quill_shared::dto::{UpdateAccountRequest, UserResponse};

use super::auth::{account_errors, normalize_email};
use super::{discard_upload, uploaded_image};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub(crate) fn user_response(state: &AppState, user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        avatar_url: user.avatar_path.as_deref().map(|p| state.media.public_url(p)),
        username: user.username,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        created_at: user.created_at,
    }
}

async fn current_user(state: &AppState, identity: &Identity) -> AppResult<User> {
    state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| {
            DomainError::NotFound {
                entity_type: "User",
                id: identity.user_id,
            }
            .into()
        })
}

/// GET /api/users/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = current_user(&state, &identity).await?;
    Ok(HttpResponse::Ok().json(user_response(&state, user)))
}

/// PUT /api/users/me
pub async fn update_me(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateAccountRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let errors = account_errors(req.email.as_deref(), &req.first_name, &req.last_name);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let mut user = current_user(&state, &identity).await?;
    user.update_account(normalize_email(req.email), req.first_name, req.last_name);
    let user = state.users.update(user).await?;

    Ok(HttpResponse::Ok().json(user_response(&state, user)))
}

/// PUT /api/users/me/avatar
///
/// Body is the raw image file.
pub async fn upload_avatar(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let kind = uploaded_image(&body)?;
    let mut user = current_user(&state, &identity).await?;

    let path = state.media.store(MediaFolder::Avatars, kind, &body).await?;
    user.set_avatar(path.clone());
    let user = match state.users.update(user).await {
        Ok(user) => user,
        Err(e) => {
            discard_upload(&state, &path).await;
            return Err(e.into());
        }
    };

    tracing::info!(user_id = %user.id, "Avatar updated");
    Ok(HttpResponse::Ok().json(user_response(&state, user)))
}
