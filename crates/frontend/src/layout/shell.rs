use leptos::prelude::*;

use super::header::AdminHeader;
use crate::system::auth::guard::AppRoute;

/// Frame of every admin screen: header on top, the screen below.
///
/// Only rendered for routes the guard let through.
#[component]
pub fn AdminShell(active: AppRoute, children: Children) -> impl IntoView {
    view! {
        <div class="admin-layout">
            <AdminHeader active=active />
            <div class="admin-main">{children()}</div>
        </div>
    }
}
