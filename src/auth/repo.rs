use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, User};

/// Storage contract for user records. One concrete backing implementation
/// (Postgres); unit tests substitute an in-memory stand-in.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;

    /// Overwrite the stored refresh-token hash; `None` clears it. A single
    /// row UPDATE, so no partial write is ever visible. Returns whether a
    /// user row matched.
    async fn update_refresh_token_hash(
        &self,
        id: Uuid,
        hash: Option<&str>,
    ) -> anyhow::Result<bool>;

    /// Insert a new user. Only the seed routine provisions accounts.
    async fn insert(&self, user: NewUser) -> anyhow::Result<User>;
}

pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, role, is_active,
                   refresh_token_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, role, is_active,
                   refresh_token_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn update_refresh_token_hash(
        &self,
        id: Uuid,
        hash: Option<&str>,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token_hash = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(hash)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert(&self, user: NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, name, role, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password_hash, name, role, is_active,
                      refresh_token_hash, created_at, updated_at
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.role)
        .bind(user.is_active)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }
}
