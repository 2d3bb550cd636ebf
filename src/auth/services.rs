use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::dto::{LoginResponse, MessageResponse, PublicUser, TokenPair};
use crate::auth::error::AuthError;
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_secret, verify_secret};
use crate::auth::repo::UserStore;
use crate::auth::repo_types::User;

/// Orchestrates the three auth operations, each a short state transition
/// over one user record. Built once at startup and shared via router state.
pub struct AuthService {
    store: Arc<dyn UserStore>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, keys: JwtKeys) -> Self {
        Self { store, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    /// Email/password login, restricted to admin roles. Unknown email and
    /// wrong password produce the same message so account existence is not
    /// leaked.
    pub async fn admin_login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginResponse, AuthError> {
        let user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(AuthError::Unauthenticated("Invalid credentials"))?;

        if !user.role.is_admin() {
            warn!(user_id = %user.id, "admin login denied for non-admin role");
            return Err(AuthError::Forbidden(
                "Access denied. Admin privileges required",
            ));
        }

        if !user.is_active {
            warn!(user_id = %user.id, "admin login for inactive account");
            return Err(AuthError::Unauthenticated("Account is inactive"));
        }

        if !verify_secret(password, &user.password_hash)? {
            warn!(user_id = %user.id, "admin login invalid password");
            return Err(AuthError::Unauthenticated("Invalid credentials"));
        }

        let tokens = self.rotate(&user).await?;
        info!(user_id = %user.id, email = %user.email, "admin logged in");
        Ok(LoginResponse {
            user: PublicUser::from(&user),
            tokens,
        })
    }

    /// Exchange a valid refresh token for a fresh pair. The refresh guard
    /// has already verified the presented token's signature; the stored
    /// hash is re-checked here so the operation stands on its own.
    pub async fn refresh_tokens(
        &self,
        user_id: Uuid,
        presented: &str,
    ) -> Result<TokenPair, AuthError> {
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::Unauthenticated("Access denied"))?;

        let stored = user
            .refresh_token_hash
            .as_deref()
            .ok_or(AuthError::Unauthenticated("Access denied"))?;

        if !verify_secret(presented, stored)? {
            warn!(user_id = %user.id, "presented refresh token does not match stored hash");
            return Err(AuthError::Unauthenticated("Access denied"));
        }

        let tokens = self.rotate(&user).await?;
        info!(user_id = %user.id, "refresh tokens rotated");
        Ok(tokens)
    }

    /// Clear the stored refresh-token hash. Idempotent: logging out twice
    /// is not an error.
    pub async fn logout(&self, user_id: Uuid) -> Result<MessageResponse, AuthError> {
        self.store.update_refresh_token_hash(user_id, None).await?;
        info!(user_id = %user_id, "logged out");
        Ok(MessageResponse {
            message: "Logged out successfully".into(),
        })
    }

    /// Issue a fresh pair and overwrite the stored refresh hash. The
    /// previous refresh token becomes unusable as soon as the write lands.
    async fn rotate(&self, user: &User) -> Result<TokenPair, AuthError> {
        let tokens = self.keys.issue(user)?;
        let hash = hash_secret(&tokens.refresh_token)?;
        self.store
            .update_refresh_token_hash(user.id, Some(&hash))
            .await?;
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::memory::MemoryUserStore;
    use crate::auth::repo_types::{NewUser, Role};
    use crate::config::JwtConfig;

    fn make_service() -> AuthService {
        let keys = JwtKeys::new(&JwtConfig {
            access_secret: "test-access-secret".into(),
            refresh_secret: "test-refresh-secret".into(),
            access_ttl_minutes: 5,
            refresh_ttl_minutes: 60,
        });
        AuthService::new(Arc::new(MemoryUserStore::default()), keys)
    }

    async fn seed(
        service: &AuthService,
        email: &str,
        password: &str,
        role: Role,
        active: bool,
    ) -> User {
        service
            .store()
            .insert(NewUser {
                email: email.into(),
                password_hash: hash_secret(password).unwrap(),
                name: "Admin User".into(),
                role,
                is_active: active,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn login_returns_decodable_claims_and_stores_refresh_hash() {
        let service = make_service();
        let user = seed(&service, "admin@x.com", "Admin@123", Role::Admin, true).await;

        let response = service.admin_login("admin@x.com", "Admin@123").await.unwrap();
        assert_eq!(response.user.id, user.id);
        assert_eq!(response.user.role, Role::Admin);

        let claims = service
            .keys()
            .verify_access(&response.tokens.access_token)
            .unwrap();
        assert_eq!(claims.email, "admin@x.com");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.name, "Admin User");

        let stored = service.store().find_by_id(user.id).await.unwrap().unwrap();
        let hash = stored.refresh_token_hash.expect("hash stored after login");
        assert!(verify_secret(&response.tokens.refresh_token, &hash).unwrap());
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_use_same_message() {
        let service = make_service();
        seed(&service, "admin@x.com", "Admin@123", Role::Admin, true).await;

        let unknown = service
            .admin_login("nobody@x.com", "Admin@123")
            .await
            .unwrap_err();
        let mismatch = service
            .admin_login("admin@x.com", "wrong-password")
            .await
            .unwrap_err();

        assert!(matches!(unknown, AuthError::Unauthenticated(_)));
        assert!(matches!(mismatch, AuthError::Unauthenticated(_)));
        assert_eq!(unknown.to_string(), mismatch.to_string());
    }

    #[tokio::test]
    async fn plain_user_role_is_forbidden_even_with_correct_password() {
        let service = make_service();
        seed(&service, "member@x.com", "Admin@123", Role::User, true).await;

        let err = service
            .admin_login("member@x.com", "Admin@123")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Forbidden(_)));
    }

    #[tokio::test]
    async fn super_admin_may_log_in() {
        let service = make_service();
        seed(&service, "root@x.com", "Admin@123", Role::SuperAdmin, true).await;

        let response = service.admin_login("root@x.com", "Admin@123").await.unwrap();
        assert_eq!(response.user.role, Role::SuperAdmin);
    }

    #[tokio::test]
    async fn inactive_admin_is_rejected() {
        let service = make_service();
        seed(&service, "admin@x.com", "Admin@123", Role::Admin, false).await;

        let err = service
            .admin_login("admin@x.com", "Admin@123")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated(_)));
        assert_eq!(err.to_string(), "Account is inactive");
    }

    #[tokio::test]
    async fn refresh_rotates_and_invalidates_previous_token() {
        let service = make_service();
        let user = seed(&service, "admin@x.com", "Admin@123", Role::Admin, true).await;

        let login = service.admin_login("admin@x.com", "Admin@123").await.unwrap();
        let first = login.tokens.refresh_token;

        let rotated = service.refresh_tokens(user.id, &first).await.unwrap();
        assert_ne!(rotated.refresh_token, first);

        let err = service.refresh_tokens(user.id, &first).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn refresh_for_unknown_user_is_denied() {
        let service = make_service();
        let err = service
            .refresh_tokens(Uuid::new_v4(), "whatever")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated(_)));
        assert_eq!(err.to_string(), "Access denied");
    }

    #[tokio::test]
    async fn refresh_without_stored_hash_is_denied() {
        let service = make_service();
        let user = seed(&service, "admin@x.com", "Admin@123", Role::Admin, true).await;

        let err = service.refresh_tokens(user.id, "whatever").await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn logout_clears_session_and_blocks_refresh() {
        let service = make_service();
        let user = seed(&service, "admin@x.com", "Admin@123", Role::Admin, true).await;

        let login = service.admin_login("admin@x.com", "Admin@123").await.unwrap();
        service.logout(user.id).await.unwrap();

        let stored = service.store().find_by_id(user.id).await.unwrap().unwrap();
        assert!(stored.refresh_token_hash.is_none());

        let err = service
            .refresh_tokens(user.id, &login.tokens.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let service = make_service();
        let user = seed(&service, "admin@x.com", "Admin@123", Role::Admin, true).await;

        let first = service.logout(user.id).await.unwrap();
        let second = service.logout(user.id).await.unwrap();
        assert_eq!(first.message, second.message);
        assert_eq!(first.message, "Logged out successfully");
    }

    #[tokio::test]
    async fn login_then_rotate_full_scenario() {
        let service = make_service();
        let user = seed(&service, "admin@x.com", "Admin@123", Role::Admin, true).await;

        let login = service.admin_login("admin@x.com", "Admin@123").await.unwrap();
        let claims = service
            .keys()
            .verify_access(&login.tokens.access_token)
            .unwrap();
        assert_eq!(claims.role, Role::Admin);

        let rotated = service
            .refresh_tokens(user.id, &login.tokens.refresh_token)
            .await
            .unwrap();
        assert_ne!(rotated.access_token, login.tokens.access_token);
        assert_ne!(rotated.refresh_token, login.tokens.refresh_token);

        let err = service
            .refresh_tokens(user.id, &login.tokens.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated(_)));
    }
}
