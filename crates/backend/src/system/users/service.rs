use anyhow::Result;
use chrono::Utc;
use contracts::system::users::{CreateUserDto, User};

use super::repository;
use crate::system::auth::password;

/// Create an operator account, returns its id
pub async fn create(dto: CreateUserDto) -> Result<String> {
    let username = dto.validate()?;
    if repository::get_by_username(&username).await?.is_some() {
        anyhow::bail!("Username {} already exists", username);
    }

    let now = Utc::now().to_rfc3339();
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        username,
        full_name: dto.full_name.filter(|name| !name.trim().is_empty()),
        is_active: true,
        is_admin: dto.is_admin,
        created_at: now.clone(),
        updated_at: now,
        last_login_at: None,
    };
    let password_hash = password::hash_password(&dto.password)?;
    repository::create_with_password(&user, &password_hash).await?;

    tracing::info!("Created user {} ({})", user.username, user.id);
    Ok(user.id)
}

pub async fn get_by_id(id: &str) -> Result<Option<User>> {
    repository::get_by_id(id).await
}

/// Verify user credentials (for login).
/// `Ok(None)` means unknown user, inactive account or wrong password.
pub async fn verify_credentials(username: &str, password: &str) -> Result<Option<User>> {
    let user = match repository::get_by_username(username.trim()).await? {
        Some(u) => u,
        None => return Ok(None),
    };

    if !user.is_active {
        tracing::warn!("Login attempt for inactive user {}", user.username);
        return Ok(None);
    }

    let password_hash = repository::get_password_hash(&user.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Password hash not found"))?;

    if !password::verify_password(password, &password_hash)? {
        return Ok(None);
    }

    if let Err(e) = repository::update_last_login(&user.id).await {
        tracing::warn!("Failed to update last login for {}: {}", user.username, e);
    }

    Ok(Some(user))
}
