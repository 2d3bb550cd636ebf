use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use uuid::Uuid;

use crate::auth::error::AuthError;
use crate::auth::password::verify_secret;
use crate::auth::repo::UserStore;
use crate::state::AppState;

/// Extracts and validates an access bearer token, yielding the user ID.
#[derive(Debug)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = state
            .auth
            .keys()
            .verify_access(token)
            .map_err(|_| AuthError::Unauthenticated("Invalid or expired token"))?;
        Ok(AuthUser(claims.sub))
    }
}

/// Refresh guard evaluated before the refresh handler: verifies the bearer
/// value against the refresh secret, loads the subject, and compares the
/// raw token against the stored hash. Hands the raw token onward so the
/// handler can re-check it through the service.
#[derive(Debug)]
pub struct RefreshPrincipal {
    pub user_id: Uuid,
    pub email: String,
    pub refresh_token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for RefreshPrincipal {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let claims = state
            .auth
            .keys()
            .verify_refresh(token)
            .map_err(|_| AuthError::Unauthenticated("Invalid or expired refresh token"))?;

        let user = state
            .auth
            .store()
            .find_by_id(claims.sub)
            .await?
            .ok_or(AuthError::Unauthenticated("Access denied"))?;

        let stored = user
            .refresh_token_hash
            .as_deref()
            .ok_or(AuthError::Unauthenticated("Access denied"))?;

        if !verify_secret(token, stored)? {
            return Err(AuthError::Unauthenticated("Access denied"));
        }

        Ok(RefreshPrincipal {
            user_id: user.id,
            email: user.email,
            refresh_token: token.to_string(),
        })
    }
}

/// Pull the bearer value out of the Authorization header. Both token
/// families travel this way; the body is never consulted.
fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let auth = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::Unauthenticated("Missing Authorization header"))?;

    auth.strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))
        .map(str::trim)
        .ok_or(AuthError::Unauthenticated("Invalid auth scheme"))
}
