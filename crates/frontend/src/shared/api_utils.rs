//! API utilities for frontend-backend communication

use super::config;

/// Base URL for API requests
///
/// `ADMIN_API_BASE` wins when it was set at build time; otherwise the
/// backend is expected on port 3000 of the host serving the page,
/// e.g. "http://localhost:3000". Empty string if window is not available.
pub fn api_base() -> String {
    if let Some(base) = config::api_base_override() {
        return base.to_string();
    }
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Full API URL from a path starting with "/api/"
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Image URLs from the backend are relative (`/uploads/..`); blob: and
/// absolute URLs are left as they are.
pub fn asset_url(url: &str) -> String {
    if url.starts_with('/') {
        api_url(url)
    } else {
        url.to_string()
    }
}

/// Message for a non-2xx response: the body the backend sent, or the
/// fallback with the status code when the body is empty.
pub async fn response_error(response: gloo_net::http::Response, fallback: &str) -> String {
    let status = response.status();
    if status == 401 {
        return "로그인이 만료되었습니다. 다시 로그인하세요.".to_string();
    }
    let body = response.text().await.unwrap_or_default();
    let body = body.trim();
    if body.is_empty() {
        format!("{} ({})", fallback, status)
    } else {
        body.to_string()
    }
}
