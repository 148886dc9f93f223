use anyhow::{Context, Result};
use chrono::Utc;
use contracts::system::users::User;
use sea_orm::{ConnectionTrait, DatabaseBackend, QueryResult, Statement, Value};

use crate::shared::data::db::get_connection;

const SELECT_USER: &str = "SELECT id, username, full_name, is_active, is_admin, \
     created_at, updated_at, last_login_at FROM sys_users";

/// SQLite keeps booleans as 0/1 integers
fn flag(value: bool) -> Value {
    i32::from(value).into()
}

fn user_from_row(row: &QueryResult) -> Result<User> {
    Ok(User {
        id: row.try_get("", "id")?,
        username: row.try_get("", "username")?,
        full_name: row.try_get("", "full_name")?,
        is_active: row.try_get::<i32>("", "is_active")? != 0,
        is_admin: row.try_get::<i32>("", "is_admin")? != 0,
        created_at: row.try_get("", "created_at")?,
        updated_at: row.try_get("", "updated_at")?,
        last_login_at: row.try_get("", "last_login_at")?,
    })
}

async fn find_one(column: &str, value: &str) -> Result<Option<User>> {
    let sql = format!("{} WHERE {} = ?", SELECT_USER, column);
    get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &sql,
            [value.into()],
        ))
        .await
        .with_context(|| format!("Failed to look up user by {}", column))?
        .as_ref()
        .map(user_from_row)
        .transpose()
}

pub async fn create_with_password(user: &User, password_hash: &str) -> Result<()> {
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT INTO sys_users (id, username, password_hash, full_name, is_active, is_admin, \
             created_at, updated_at, last_login_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            [
                user.id.as_str().into(),
                user.username.as_str().into(),
                password_hash.into(),
                user.full_name.clone().into(),
                flag(user.is_active),
                flag(user.is_admin),
                user.created_at.as_str().into(),
                user.updated_at.as_str().into(),
                user.last_login_at.clone().into(),
            ],
        ))
        .await
        .with_context(|| format!("Failed to insert user {}", user.username))?;
    Ok(())
}

pub async fn get_by_id(id: &str) -> Result<Option<User>> {
    find_one("id", id).await
}

pub async fn get_by_username(username: &str) -> Result<Option<User>> {
    find_one("username", username).await
}

pub async fn get_password_hash(user_id: &str) -> Result<Option<String>> {
    let row = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT password_hash FROM sys_users WHERE id = ?",
            [user_id.into()],
        ))
        .await?;
    row.map(|r| r.try_get::<String>("", "password_hash"))
        .transpose()
        .map_err(Into::into)
}

pub async fn update_last_login(id: &str) -> Result<()> {
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE sys_users SET last_login_at = ? WHERE id = ?",
            [Utc::now().to_rfc3339().into(), id.into()],
        ))
        .await
        .context("Failed to update last login")?;
    Ok(())
}

pub async fn count_users() -> Result<usize> {
    let row = get_connection()
        .query_one(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(*) AS count FROM sys_users".to_string(),
        ))
        .await?;
    let count = match row {
        Some(r) => r.try_get::<i64>("", "count")?,
        None => 0,
    };
    Ok(usize::try_from(count).unwrap_or_default())
}
