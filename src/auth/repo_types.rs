use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Account role. Only `admin` and `super_admin` may use the admin login path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                              // unique user ID
    pub email: String,                         // login identifier, unique
    #[serde(skip_serializing)]
    pub password_hash: String,                 // Argon2 hash, not exposed in JSON
    pub name: String,                          // display name
    pub role: Role,
    pub is_active: bool,
    #[serde(skip_serializing)]
    pub refresh_token_hash: Option<String>,    // Argon2 hash of the latest refresh token; None = no session
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Fields required to provision a new user. Only the seed path inserts.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
}
