//! Catalog admin console (Leptos CSR).

pub mod app;
pub mod dashboards;
pub mod domain;
pub mod layout;
pub mod routes;
pub mod shared;
pub mod system;

use wasm_bindgen::prelude::wasm_bindgen;

fn log_level() -> log::Level {
    if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    _ = console_log::init_with_level(log_level());
    console_error_panic_hook::set_once();

    log::info!("Admin console starting");
    leptos::mount::mount_to_body(app::App);
}
