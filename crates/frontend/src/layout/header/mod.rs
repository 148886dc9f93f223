//! AdminHeader - top navigation bar of the admin screens.
//!
//! Contains the screen switch buttons (active one highlighted), the signed-in
//! user name and the logout button.

use crate::routes::history::use_navigator;
use crate::shared::icons::icon;
use crate::system::auth::context::{do_logout, use_auth};
use crate::system::auth::guard::{self, AppRoute};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

#[component]
pub fn AdminHeader(active: AppRoute) -> impl IntoView {
    let (auth_state, set_auth_state) = use_auth();
    let navigator = use_navigator();

    let nav_button = move |route: AppRoute, label: &'static str| {
        let appearance = if route == active {
            ButtonAppearance::Primary
        } else {
            ButtonAppearance::Secondary
        };
        view! {
            <Button
                appearance=appearance
                size=ButtonSize::Small
                on_click=move |_| navigator.navigate(route.clone())
            >
                {label}
            </Button>
        }
    };

    let logout = move |_| {
        spawn_local(async move {
            do_logout(set_auth_state).await;
            navigator.navigate(guard::after_logout());
        });
    };

    view! {
        <header class="admin-header">
            <nav class="admin-header__nav">
                {nav_button(AppRoute::Products, "상품 등록")}
                {nav_button(AppRoute::Sales, "상품 판매내역")}
            </nav>

            <div class="admin-header__actions">
                {move || auth_state.get().user_info.map(|user| view! {
                    <span class="admin-header__user">{user.display_name().to_string()}</span>
                })}
                <Button size=ButtonSize::Small on_click=logout>
                    {icon("logout")}
                    "로그아웃"
                </Button>
            </div>
        </header>
    }
}
