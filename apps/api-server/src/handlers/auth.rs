//! Registration, login and logout.

use std::time::Duration;

use actix_web::{HttpResponse, web};

use quill_core::DomainError;
use quill_core::domain::User;
use quill_core::ports::BaseRepository;
use quill_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest};

use crate::middleware::auth::{Identity, revoked_key};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MAX_USERNAME_LENGTH: usize = 150;
const MIN_PASSWORD_LENGTH: usize = 8;
pub(crate) const MAX_NAME_LENGTH: usize = 30;

fn is_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')
}

/// Every problem with a registration form, in field order.
fn registration_errors(req: &RegisterUserRequest) -> Vec<String> {
    let mut errors = Vec::new();

    let username_len = req.username.chars().count();
    if username_len == 0 || username_len > MAX_USERNAME_LENGTH {
        errors.push(format!(
            "Username must be 1 to {MAX_USERNAME_LENGTH} characters"
        ));
    } else if !req.username.chars().all(is_username_char) {
        errors.push("Username may contain only letters, digits and @/./+/-/_".to_string());
    }

    if req.password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        ));
    }
    if req.password != req.password_confirmation {
        errors.push("Password confirmation does not match".to_string());
    }

    errors.extend(account_errors(
        req.email.as_deref(),
        &req.first_name,
        &req.last_name,
    ));
    errors
}

/// Checks shared by registration and account editing.
pub(crate) fn account_errors(email: Option<&str>, first_name: &str, last_name: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if email.is_some_and(|e| !e.is_empty() && !e.contains('@')) {
        errors.push("Invalid email address".to_string());
    }
    if first_name.chars().count() > MAX_NAME_LENGTH {
        errors.push(format!("First name must be at most {MAX_NAME_LENGTH} characters"));
    }
    if last_name.chars().count() > MAX_NAME_LENGTH {
        errors.push(format!("Last name must be at most {MAX_NAME_LENGTH} characters"));
    }
    errors
}

/// Empty strings mean "no email".
pub(crate) fn normalize_email(email: Option<String>) -> Option<String> {
    email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty())
}

fn token_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = state.tokens.generate_token(user.id, &user.username)?;
    Ok(AuthResponse {
        access_token: token,
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

    let errors = registration_errors(&req);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    if state.users.find_by_username(&req.username).await?.is_some() {
        return Err(DomainError::Duplicate("Username already taken".to_string()).into());
    }

    let password_hash = state.passwords.hash(&req.password)?;

    let mut user = User::new(req.username, password_hash);
    user.update_account(normalize_email(req.email), req.first_name, req.last_name);
    let user = state.users.create(user).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok(HttpResponse::Created().json(token_response(&state, &user)?))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        tracing::debug!(username = %req.username, "Rejected login");
        return Err(AppError::Unauthorized);
    }

    Ok(HttpResponse::Ok().json(token_response(&state, &user)?))
}

/// POST /api/auth/logout
///
/// The token stays revoked until it would have expired.
pub async fn logout(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let remaining = identity.expires_at - chrono::Utc::now().timestamp();
    let ttl = Duration::from_secs(remaining.max(1) as u64);

    state
        .cache
        .set(&revoked_key(&identity.token), Some(ttl))
        .await;

    tracing::info!(user_id = %identity.user_id, "User logged out");
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, password: &str, confirmation: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            username: username.to_string(),
            password: password.to_string(),
            password_confirmation: confirmation.to_string(),
            email: None,
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(registration_errors(&request("writer_1", "long enough", "long enough")).is_empty());
    }

    #[test]
    fn test_registration_collects_every_error() {
        let mut req = request("bad name", "short", "other");
        req.email = Some("not-an-email".to_string());

        let errors = registration_errors(&req);
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_empty_email_is_none() {
        assert_eq!(normalize_email(Some("  ".to_string())), None);
        assert_eq!(
            normalize_email(Some("a@b.c".to_string())).as_deref(),
            Some("a@b.c")
        );
    }
}
