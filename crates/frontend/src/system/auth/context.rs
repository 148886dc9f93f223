use contracts::system::auth::{LoginRequest, UserInfo};
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::guard::Session;
use super::{api, storage};
use crate::shared::config;

#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub user_info: Option<UserInfo>,
}

impl AuthState {
    fn signed_in(access_token: String, user_info: UserInfo) -> Self {
        Self {
            access_token: Some(access_token),
            user_info: Some(user_info),
        }
    }

    pub fn session(&self) -> Session {
        if config::auth_mock() {
            Session::Bypass
        } else if self.access_token.is_some() {
            Session::Authenticated
        } else {
            Session::Anonymous
        }
    }
}

fn sign_out_locally(set_auth_state: WriteSignal<AuthState>) {
    storage::clear_tokens();
    set_auth_state.set(AuthState::default());
}

/// Auth context provider component
///
/// A stored access token counts as a session right away so a reload does not
/// bounce through the login screen; it is then checked against `/me` and,
/// failing that, renewed with the refresh token or dropped.
#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let (auth_state, set_auth_state) = signal(AuthState {
        access_token: storage::get_access_token(),
        user_info: None,
    });

    if let Some(access_token) = auth_state.get_untracked().access_token {
        spawn_local(async move {
            restore_session(access_token, set_auth_state).await;
        });
    }

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

async fn restore_session(access_token: String, set_auth_state: WriteSignal<AuthState>) {
    match resume(access_token).await {
        Ok(state) => set_auth_state.set(state),
        Err(e) => {
            log::info!("Stored session dropped: {}", e);
            sign_out_locally(set_auth_state);
        }
    }
}

/// Stored token if `/me` accepts it, otherwise one renewed with the refresh token
async fn resume(access_token: String) -> Result<AuthState, String> {
    if let Ok(user_info) = api::get_current_user(&access_token).await {
        return Ok(AuthState::signed_in(access_token, user_info));
    }

    let refresh_token = storage::get_refresh_token().ok_or("no refresh token")?;
    let renewed = api::refresh_token(refresh_token).await?.access_token;
    storage::save_access_token(&renewed);
    let user_info = api::get_current_user(&renewed).await?;
    Ok(AuthState::signed_in(renewed, user_info))
}

/// Hook to access auth state
pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state =
        use_context::<ReadSignal<AuthState>>().expect("AuthProvider not found in component tree");
    let set_auth_state =
        use_context::<WriteSignal<AuthState>>().expect("AuthProvider not found in component tree");

    (auth_state, set_auth_state)
}

/// Sign in and store the tokens
pub async fn do_login(
    request: LoginRequest,
    set_auth_state: WriteSignal<AuthState>,
) -> Result<(), String> {
    let response = api::login(&request).await?;

    storage::save_tokens(&response.access_token, &response.refresh_token);
    log::info!("Signed in as {}", response.user.username);

    set_auth_state.set(AuthState::signed_in(response.access_token, response.user));
    Ok(())
}

/// Revoke the refresh token (best effort) and forget the session
pub async fn do_logout(set_auth_state: WriteSignal<AuthState>) {
    if let Some(refresh_token) = storage::get_refresh_token() {
        if let Err(e) = api::logout(refresh_token).await {
            log::warn!("Logout request failed: {}", e);
        }
    }

    sign_out_locally(set_auth_state);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operator() -> UserInfo {
        UserInfo {
            id: "u1".into(),
            username: "admin".into(),
            full_name: None,
            is_admin: true,
        }
    }

    #[test]
    fn test_sign_out_drops_session() {
        let (state, set_state) = signal(AuthState::signed_in("token".into(), operator()));
        assert!(state.get_untracked().access_token.is_some());

        sign_out_locally(set_state);

        let after = state.get_untracked();
        assert!(after.access_token.is_none());
        assert!(after.user_info.is_none());
        if !config::auth_mock() {
            assert_eq!(after.session(), Session::Anonymous);
        }
        assert_eq!(storage::get_access_token(), None);
        assert_eq!(storage::get_refresh_token(), None);
    }
}
