use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Messages shown under the login inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginFieldErrors {
    pub username: Option<&'static str>,
    pub password: Option<&'static str>,
}

impl LoginFieldErrors {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }
}

impl LoginRequest {
    pub fn field_errors(&self) -> LoginFieldErrors {
        LoginFieldErrors {
            username: self
                .username
                .trim()
                .is_empty()
                .then_some("아이디를 입력하세요."),
            password: self.password.is_empty().then_some("비밀번호를 입력하세요."),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub full_name: Option<String>,
    pub is_admin: bool,
}

impl UserInfo {
    /// Name shown in the header: full name when set
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// user id
    pub sub: String,
    pub username: String,
    pub is_admin: bool,
    pub exp: usize,
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_field_errors() {
        let empty = LoginRequest::default().field_errors();
        assert_eq!(empty.username, Some("아이디를 입력하세요."));
        assert_eq!(empty.password, Some("비밀번호를 입력하세요."));

        let filled = LoginRequest {
            username: "admin".into(),
            password: " ".into(),
        };
        assert!(filled.field_errors().is_empty());
    }
}
