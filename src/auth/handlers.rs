use axum::{extract::State, routing::post, Json, Router};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{instrument, warn};

use crate::auth::dto::{LoginRequest, LoginResponse, MessageResponse, TokenPair};
use crate::auth::error::AuthError;
use crate::auth::extractors::{AuthUser, RefreshPrincipal};
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/admin/login", post(admin_login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn admin_login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!("malformed email in login request");
        return Err(AuthError::InvalidInput("Invalid email"));
    }

    let response = state
        .auth
        .admin_login(&payload.email, &payload.password)
        .await?;
    Ok(Json(response))
}

// Any request body is ignored; the refresh token travels in the
// Authorization header only.
#[instrument(skip_all)]
pub async fn refresh(
    State(state): State<AppState>,
    principal: RefreshPrincipal,
) -> Result<Json<TokenPair>, AuthError> {
    let tokens = state
        .auth
        .refresh_tokens(principal.user_id, &principal.refresh_token)
        .await?;
    Ok(Json(tokens))
}

#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MessageResponse>, AuthError> {
    let message = state.auth.logout(user_id).await?;
    Ok(Json(message))
}
