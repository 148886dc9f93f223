//! Access tokens (HS256 JWT) and opaque refresh tokens.
//!
//! The signing secret lives in `sys_settings` so tokens survive restarts. It
//! is created on first use and the derived keys are kept for the process.

use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Duration, Utc};
use contracts::system::auth::TokenClaims;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};
use sha2::{Digest, Sha256};

use crate::shared::data::db::get_connection;

const SECRET_SETTING: &str = "jwt_secret";
const ACCESS_TOKEN_HOURS: i64 = 12;
const REFRESH_TOKEN_DAYS: i64 = 30;

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

static KEYS: OnceCell<SigningKeys> = OnceCell::new();

fn claims_for(user_id: &str, username: &str, is_admin: bool, now: DateTime<Utc>) -> TokenClaims {
    TokenClaims {
        sub: user_id.to_string(),
        username: username.to_string(),
        is_admin,
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(ACCESS_TOKEN_HOURS)).timestamp() as usize,
    }
}

/// Signed access token for the console session
pub async fn generate_access_token(user_id: &str, username: &str, is_admin: bool) -> Result<String> {
    let claims = claims_for(user_id, username, is_admin, Utc::now());
    let keys = signing_keys().await?;
    encode(&Header::default(), &claims, &keys.encoding).context("Failed to encode access token")
}

/// Claims of a valid, unexpired access token
pub async fn validate_token(token: &str) -> Result<TokenClaims> {
    let keys = signing_keys().await?;
    let data = decode::<TokenClaims>(token, &keys.decoding, &Validation::default())
        .context("Failed to decode access token")?;
    Ok(data.claims)
}

/// Opaque refresh token; only its SHA-256 hash is stored
pub fn generate_refresh_token() -> String {
    random_base64(general_purpose::URL_SAFE_NO_PAD)
}

pub fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

/// Expiry written next to a new refresh token
pub fn calculate_refresh_token_expiration() -> String {
    (Utc::now() + Duration::days(REFRESH_TOKEN_DAYS)).to_rfc3339()
}

fn random_base64(engine: general_purpose::GeneralPurpose) -> String {
    let bytes: [u8; 32] = rand::random();
    engine.encode(bytes)
}

async fn signing_keys() -> Result<&'static SigningKeys> {
    if let Some(keys) = KEYS.get() {
        return Ok(keys);
    }
    let secret = load_or_create_secret().await?;
    Ok(KEYS.get_or_init(|| SigningKeys {
        encoding: EncodingKey::from_secret(secret.as_bytes()),
        decoding: DecodingKey::from_secret(secret.as_bytes()),
    }))
}

async fn load_or_create_secret() -> Result<String> {
    if let Some(secret) = read_setting(SECRET_SETTING).await? {
        return Ok(secret);
    }
    let now = Utc::now().to_rfc3339();
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT OR IGNORE INTO sys_settings (key, value, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
            [
                SECRET_SETTING.into(),
                random_base64(general_purpose::STANDARD).into(),
                "Signing secret of console access tokens".into(),
                now.clone().into(),
                now.into(),
            ],
        ))
        .await
        .context("Failed to store signing secret")?;
    tracing::info!("Generated a new token signing secret");

    // another request may have inserted first; the stored value wins
    read_setting(SECRET_SETTING)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Signing secret missing after insert"))
}

async fn read_setting(key: &str) -> Result<Option<String>> {
    let row = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT value FROM sys_settings WHERE key = ?",
            [key.into()],
        ))
        .await?;
    row.map(|r| r.try_get::<String>("", "value"))
        .transpose()
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_tokens_are_unique_and_hashed() {
        let a = generate_refresh_token();
        let b = generate_refresh_token();
        assert_ne!(a, b);
        assert_eq!(hash_token(&a), hash_token(&a));
        assert_eq!(hash_token(&a).len(), 64);
        assert_ne!(hash_token(&a), hash_token(&b));
    }

    #[test]
    fn test_claims_lifetime() {
        let now = Utc::now();
        let claims = claims_for("u1", "admin", true, now);
        assert_eq!(claims.exp - claims.iat, 12 * 3600);
        assert_eq!(claims.sub, "u1");
    }

    #[test]
    fn test_refresh_expiration_is_in_future() {
        let exp = DateTime::parse_from_rfc3339(&calculate_refresh_token_expiration()).unwrap();
        assert!(exp.with_timezone(&Utc) > Utc::now() + Duration::days(29));
    }
}
