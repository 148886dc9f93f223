use serde::{Deserialize, Serialize};

use super::auth::UserInfo;

/// Account seeded into an empty user table
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";

pub const MIN_PASSWORD_LENGTH: usize = 4;

/// Console operator account. Timestamps are RFC 3339 strings as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: String,
    pub updated_at: String,
    pub last_login_at: Option<String>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        UserInfo {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            is_admin: user.is_admin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("Username cannot be empty")]
    EmptyUsername,
    #[error("Username cannot contain whitespace")]
    UsernameWhitespace,
    #[error("Password must be at least {} characters", MIN_PASSWORD_LENGTH)]
    PasswordTooShort,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserDto {
    pub username: String,
    pub password: String,
    pub full_name: Option<String>,
    pub is_admin: bool,
}

impl CreateUserDto {
    pub fn default_admin() -> Self {
        Self {
            username: DEFAULT_ADMIN_USERNAME.into(),
            password: DEFAULT_ADMIN_PASSWORD.into(),
            full_name: Some("관리자".into()),
            is_admin: true,
        }
    }

    /// Trimmed username, or the first rule the input breaks
    pub fn validate(&self) -> Result<String, UserValidationError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if username.chars().any(char::is_whitespace) {
            return Err(UserValidationError::UsernameWhitespace);
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(UserValidationError::PasswordTooShort);
        }
        Ok(username.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(username: &str, password: &str) -> CreateUserDto {
        CreateUserDto {
            username: username.into(),
            password: password.into(),
            full_name: None,
            is_admin: false,
        }
    }

    #[test]
    fn test_create_user_rules() {
        assert_eq!(dto("  kim ", "1234").validate(), Ok("kim".to_string()));
        assert_eq!(dto("   ", "1234").validate(), Err(UserValidationError::EmptyUsername));
        assert_eq!(dto("kim lee", "1234").validate(), Err(UserValidationError::UsernameWhitespace));
        assert_eq!(dto("kim", "abc").validate(), Err(UserValidationError::PasswordTooShort));
        assert!(CreateUserDto::default_admin().validate().is_ok());
    }

    #[test]
    fn test_user_info_drops_account_fields() {
        let user = User {
            id: "u1".into(),
            username: "admin".into(),
            full_name: None,
            is_active: true,
            is_admin: true,
            created_at: "2024-01-01T00:00:00+00:00".into(),
            updated_at: "2024-01-01T00:00:00+00:00".into(),
            last_login_at: None,
        };
        let info = UserInfo::from(user);
        assert_eq!(info.username, "admin");
        assert!(info.is_admin);
        assert_eq!(info.display_name(), "admin");
    }
}
