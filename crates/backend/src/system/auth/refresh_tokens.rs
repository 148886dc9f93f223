//! Server-side ledger of issued refresh tokens. Only hashes are stored.

use anyhow::{anyhow, Result};
use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement, Value};

use super::jwt;
use crate::shared::data::db::get_connection;

async fn execute<const N: usize>(sql: &str, values: [Value; N]) -> Result<u64> {
    let result = get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            sql,
            values,
        ))
        .await?;
    Ok(result.rows_affected())
}

pub async fn store(user_id: &str, token: &str) -> Result<()> {
    execute(
        "INSERT INTO sys_refresh_tokens (id, user_id, token_hash, expires_at, created_at)
         VALUES (?, ?, ?, ?, ?)",
        [
            uuid::Uuid::new_v4().to_string().into(),
            user_id.into(),
            jwt::hash_token(token).into(),
            jwt::calculate_refresh_token_expiration().into(),
            Utc::now().to_rfc3339().into(),
        ],
    )
    .await?;
    Ok(())
}

/// Owner of a token that is neither expired nor revoked
pub async fn owner_of(token: &str) -> Result<String> {
    let row = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT user_id FROM sys_refresh_tokens
             WHERE token_hash = ? AND expires_at > ? AND revoked_at IS NULL",
            [jwt::hash_token(token).into(), Utc::now().to_rfc3339().into()],
        ))
        .await?
        .ok_or_else(|| anyhow!("Invalid or expired refresh token"))?;
    Ok(row.try_get("", "user_id")?)
}

/// Revoking an unknown or already revoked token is not an error
pub async fn revoke(token: &str) -> Result<()> {
    let revoked = execute(
        "UPDATE sys_refresh_tokens SET revoked_at = ? WHERE token_hash = ? AND revoked_at IS NULL",
        [Utc::now().to_rfc3339().into(), jwt::hash_token(token).into()],
    )
    .await?;
    tracing::debug!("Revoked {} refresh token(s)", revoked);
    Ok(())
}
