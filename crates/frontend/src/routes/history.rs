//! Browser history integration: the requested route lives in a signal and
//! is mirrored into the address bar with `pushState`/`replaceState`.

use leptos::prelude::*;
use wasm_bindgen::JsValue;

use crate::system::auth::guard::AppRoute;

#[derive(Clone, Copy)]
pub struct Navigator {
    requested: RwSignal<AppRoute>,
}

impl Navigator {
    /// Start from the current location and follow back/forward buttons
    pub fn new() -> Self {
        let (path, search) = current_location();
        let requested = RwSignal::new(AppRoute::from_location(&path, &search));

        let _ = window_event_listener(leptos::ev::popstate, move |_| {
            let (path, search) = current_location();
            requested.set(AppRoute::from_location(&path, &search));
        });

        Self { requested }
    }

    pub fn requested(&self) -> Signal<AppRoute> {
        self.requested.into()
    }

    pub fn navigate(&self, route: AppRoute) {
        if self.requested.get_untracked() == route {
            return;
        }
        push_url(&route.href());
        self.requested.set(route);
    }

    /// Record the route the guard actually entered without a new history entry
    pub fn sync_url(&self, route: &AppRoute) {
        let href = route.href();
        let (path, search) = current_location();
        if format!("{}{}", path, search) != href {
            replace_url(&href);
        }
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_navigator() -> Navigator {
    use_context::<Navigator>().expect("Navigator not found in component tree")
}

fn current_location() -> (String, String) {
    let Some(window) = web_sys::window() else {
        return (String::from("/"), String::new());
    };
    let location = window.location();
    (
        location.pathname().unwrap_or_else(|_| "/".to_string()),
        location.search().unwrap_or_default(),
    )
}

fn push_url(href: &str) {
    if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
        if let Err(e) = history.push_state_with_url(&JsValue::NULL, "", Some(href)) {
            log::warn!("pushState failed: {:?}", e);
        }
    }
}

fn replace_url(href: &str) {
    if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
        if let Err(e) = history.replace_state_with_url(&JsValue::NULL, "", Some(href)) {
            log::warn!("replaceState failed: {:?}", e);
        }
    }
}
