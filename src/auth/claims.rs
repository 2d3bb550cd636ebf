use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo_types::Role;

/// Access token payload: enough for downstream authorization checks
/// without a database round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: Uuid,    // user ID
    pub email: String,
    pub role: Role,
    pub name: String,
    pub iat: usize,   // issued at (unix timestamp)
    pub exp: usize,   // expires at (unix timestamp)
}

/// Refresh token payload. Minimal: its sole purpose is re-authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: Uuid,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}
