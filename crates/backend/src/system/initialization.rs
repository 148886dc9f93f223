use anyhow::Result;
use contracts::system::users::{CreateUserDto, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};

use crate::system::users::{repository, service};

/// Seed the default operator when nobody can sign in yet.
/// Returns the new user id, or `None` when the table already had users.
pub async fn ensure_admin_user_exists() -> Result<Option<String>> {
    if repository::count_users().await? > 0 {
        return Ok(None);
    }

    let admin_id = service::create(CreateUserDto::default_admin()).await?;
    tracing::warn!(
        "No operators found, created {} / {} ({}). Change the password before going live.",
        DEFAULT_ADMIN_USERNAME,
        DEFAULT_ADMIN_PASSWORD,
        admin_id
    );
    Ok(Some(admin_id))
}
