use crate::dashboards::d001_sales_report::ui::SalesScreen;
use crate::domain::a001_product::ui::list::ProductsScreen;
use crate::layout::shell::AdminShell;
use crate::routes::history::Navigator;
use crate::system::auth::context::use_auth;
use crate::system::auth::guard::{self, AppRoute};
use crate::system::pages::login::LoginPage;
use leptos::prelude::*;

#[component]
pub fn AppRoutes() -> impl IntoView {
    let (auth_state, _) = use_auth();
    let navigator = Navigator::new();
    provide_context(navigator);

    let requested = navigator.requested();
    let current = Memo::new(move |_| guard::resolve(auth_state.get().session(), requested.get()));

    Effect::new(move |_| {
        let route = current.get();
        navigator.sync_url(&route);
    });

    view! {
        {move || match current.get() {
            AppRoute::Login { redirect } => view! { <LoginPage redirect=redirect /> }.into_any(),
            AppRoute::Products => view! {
                <AdminShell active=AppRoute::Products>
                    <ProductsScreen />
                </AdminShell>
            }.into_any(),
            AppRoute::Sales => view! {
                <AdminShell active=AppRoute::Sales>
                    <SalesScreen />
                </AdminShell>
            }.into_any(),
        }}
    }
}
