use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use contracts::system::auth::TokenClaims;

/// Operator behind the request, taken from the claims `require_auth` stored.
///
/// `async fn handler(operator: CurrentUser, ...)`; routes without the
/// middleware answer 401.
pub struct CurrentUser(pub TokenClaims);

impl CurrentUser {
    pub fn user_id(&self) -> &str {
        &self.0.sub
    }

    pub fn username(&self) -> &str {
        &self.0.username
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<TokenClaims>() {
            Some(claims) => Ok(CurrentUser(claims.clone())),
            None => {
                tracing::warn!("{} reached without auth claims", parts.uri.path());
                Err(StatusCode::UNAUTHORIZED)
            }
        }
    }
}
