//! Session tokens kept in `localStorage` so a reload stays signed in.

use web_sys::{window, Storage};

const ACCESS_TOKEN_KEY: &str = "admin_access_token";
const REFRESH_TOKEN_KEY: &str = "admin_refresh_token";

/// `None` outside the browser, so native unit tests see an empty store
fn local_storage() -> Option<Storage> {
    if cfg!(not(target_arch = "wasm32")) {
        return None;
    }
    window()?.local_storage().ok()?
}

fn write(key: &str, value: &str) {
    if let Some(storage) = local_storage() {
        if storage.set_item(key, value).is_err() {
            log::warn!("localStorage rejected {}", key);
        }
    }
}

/// Missing and empty entries both read as `None`
fn read(key: &str) -> Option<String> {
    local_storage()?
        .get_item(key)
        .ok()
        .flatten()
        .filter(|value| !value.is_empty())
}

pub fn save_tokens(access_token: &str, refresh_token: &str) {
    write(ACCESS_TOKEN_KEY, access_token);
    write(REFRESH_TOKEN_KEY, refresh_token);
}

pub fn save_access_token(token: &str) {
    write(ACCESS_TOKEN_KEY, token);
}

pub fn get_access_token() -> Option<String> {
    read(ACCESS_TOKEN_KEY)
}

pub fn get_refresh_token() -> Option<String> {
    read(REFRESH_TOKEN_KEY)
}

pub fn clear_tokens() {
    if let Some(storage) = local_storage() {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
            let _ = storage.remove_item(key);
        }
    }
}
