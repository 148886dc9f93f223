use crate::routes::routes::AppRoutes;
use crate::shared::config;
use crate::shared::data_source::DataSource;
use crate::system::auth::context::AuthProvider;
use leptos::prelude::*;
use thaw::ConfigProvider;

#[component]
pub fn App() -> impl IntoView {
    // One data source for the whole session, picked from the build configuration.
    let kind = config::data_source_kind();
    log::info!("Data source: {:?}", kind);
    provide_context(DataSource::create(kind));

    view! {
        <ConfigProvider>
            <AuthProvider>
                <AppRoutes />
            </AuthProvider>
        </ConfigProvider>
    }
}
