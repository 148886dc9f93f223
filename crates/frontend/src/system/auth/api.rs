use contracts::system::auth::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserInfo,
};
use gloo_net::http::{Request, Response};
use serde::{de::DeserializeOwned, Serialize};

use super::storage;
use crate::shared::api_utils::{api_url, response_error};

const UNREACHABLE: &str = "서버에 연결할 수 없습니다.";

/// `Authorization` header value for the stored access token
pub fn bearer() -> Option<String> {
    storage::get_access_token().map(|token| format!("Bearer {}", token))
}

async fn post_json<B: Serialize>(path: &str, body: &B) -> Result<Response, String> {
    Request::post(&api_url(path))
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| {
            log::warn!("POST {} failed: {}", path, e);
            UNREACHABLE.to_string()
        })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    response
        .json::<T>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn login(request: &LoginRequest) -> Result<LoginResponse, String> {
    let response = post_json("/api/system/auth/login", request).await?;
    match response.status() {
        401 => Err("아이디 또는 비밀번호가 올바르지 않습니다.".to_string()),
        _ if !response.ok() => Err(response_error(response, "로그인에 실패했습니다.").await),
        _ => read_json(response).await,
    }
}

/// New access token for a stored refresh token
pub async fn refresh_token(refresh_token: String) -> Result<RefreshResponse, String> {
    let response = post_json("/api/system/auth/refresh", &RefreshRequest { refresh_token }).await?;
    if !response.ok() {
        return Err(format!("Refresh failed: {}", response.status()));
    }
    read_json(response).await
}

/// Revoke the refresh token on the server
pub async fn logout(refresh_token: String) -> Result<(), String> {
    let response = post_json("/api/system/auth/logout", &RefreshRequest { refresh_token }).await?;
    if !response.ok() {
        return Err(format!("Logout failed: {}", response.status()));
    }
    Ok(())
}

pub async fn get_current_user(access_token: &str) -> Result<UserInfo, String> {
    let response = Request::get(&api_url("/api/system/auth/me"))
        .header("Authorization", &format!("Bearer {}", access_token))
        .send()
        .await
        .map_err(|_| UNREACHABLE.to_string())?;
    if !response.ok() {
        return Err(format!("Session check failed: {}", response.status()));
    }
    read_json(response).await
}
