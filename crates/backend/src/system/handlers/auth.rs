use axum::{extract::Json, http::StatusCode};
use contracts::system::auth::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserInfo};

use crate::system::auth::{extractor::CurrentUser, jwt, refresh_tokens};
use crate::system::users::service as user_service;

fn internal(context: &'static str) -> impl FnOnce(anyhow::Error) -> StatusCode {
    move |e| {
        tracing::error!("{}: {}", context, e);
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// POST /api/system/auth/login
pub async fn login(Json(request): Json<LoginRequest>) -> Result<Json<LoginResponse>, StatusCode> {
    if !request.field_errors().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let Some(user) = user_service::verify_credentials(&request.username, &request.password)
        .await
        .map_err(internal("Credential check failed"))?
    else {
        tracing::info!("Rejected sign-in for {}", request.username);
        return Err(StatusCode::UNAUTHORIZED);
    };

    let access_token = jwt::generate_access_token(&user.id, &user.username, user.is_admin)
        .await
        .map_err(internal("Failed to issue access token"))?;
    let refresh_token = jwt::generate_refresh_token();
    refresh_tokens::store(&user.id, &refresh_token)
        .await
        .map_err(internal("Failed to store refresh token"))?;

    tracing::info!("User {} signed in", user.username);
    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        user: user.into(),
    }))
}

/// POST /api/system/auth/refresh
pub async fn refresh(
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, StatusCode> {
    let user_id = refresh_tokens::owner_of(&request.refresh_token)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let user = user_service::get_by_id(&user_id)
        .await
        .map_err(internal("User lookup failed"))?
        .filter(|u| u.is_active)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let access_token = jwt::generate_access_token(&user.id, &user.username, user.is_admin)
        .await
        .map_err(internal("Failed to issue access token"))?;
    Ok(Json(RefreshResponse { access_token }))
}

/// POST /api/system/auth/logout
pub async fn logout(Json(request): Json<RefreshRequest>) -> Result<StatusCode, StatusCode> {
    refresh_tokens::revoke(&request.refresh_token)
        .await
        .map_err(internal("Failed to revoke refresh token"))?;
    Ok(StatusCode::OK)
}

/// GET /api/system/auth/me
pub async fn current_user(operator: CurrentUser) -> Result<Json<UserInfo>, StatusCode> {
    user_service::get_by_id(operator.user_id())
        .await
        .map_err(internal("User lookup failed"))?
        .map(|user| Json(user.into()))
        .ok_or(StatusCode::NOT_FOUND)
}
