use tracing::info;

use crate::auth::password::hash_secret;
use crate::auth::repo::UserStore;
use crate::auth::repo_types::{NewUser, Role};

const ADMIN_EMAIL: &str = "admin@backendgym.com";
const ADMIN_PASSWORD: &str = "Admin@123";
const ADMIN_NAME: &str = "Admin User";

/// Provision the first admin account through the store. Idempotent: does
/// nothing when the account already exists.
pub async fn seed_admin(store: &dyn UserStore) -> anyhow::Result<()> {
    if store.find_by_email(ADMIN_EMAIL).await?.is_some() {
        info!(email = ADMIN_EMAIL, "admin user already exists");
        return Ok(());
    }

    let password_hash = hash_secret(ADMIN_PASSWORD)?;
    let user = store
        .insert(NewUser {
            email: ADMIN_EMAIL.into(),
            password_hash,
            name: ADMIN_NAME.into(),
            role: Role::Admin,
            is_active: true,
        })
        .await?;

    info!(user_id = %user.id, email = %user.email, "admin user created");
    Ok(())
}
