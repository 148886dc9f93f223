use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower_http::services::ServeDir;

use crate::{handlers, system};

/// Multipart product forms carry up to five images
const PRODUCT_BODY_LIMIT: usize = 30 * 1024 * 1024;

/// All application routes; `uploads_dir` is published under `/uploads`
pub fn configure_routes(uploads_dir: &Path) -> Router {
    let require_auth = || middleware::from_fn(system::auth::middleware::require_auth);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SYSTEM AUTH ROUTES (PUBLIC)
        // ========================================
        .route(
            "/api/system/auth/login",
            post(system::handlers::auth::login),
        )
        .route(
            "/api/system/auth/refresh",
            post(system::handlers::auth::refresh),
        )
        .route(
            "/api/system/auth/logout",
            post(system::handlers::auth::logout),
        )
        .route(
            "/api/system/auth/me",
            get(system::handlers::auth::current_user).layer(require_auth()),
        )
        // ========================================
        // A001 PRODUCT
        // ========================================
        .route(
            "/api/a001/product",
            get(handlers::a001_product::list_all)
                .post(handlers::a001_product::create)
                .layer(DefaultBodyLimit::max(PRODUCT_BODY_LIMIT))
                .layer(require_auth()),
        )
        .route(
            "/api/a001/product/:id",
            get(handlers::a001_product::get_by_id)
                .put(handlers::a001_product::update)
                .delete(handlers::a001_product::delete)
                .layer(DefaultBodyLimit::max(PRODUCT_BODY_LIMIT))
                .layer(require_auth()),
        )
        // ========================================
        // D001 SALES REPORT
        // ========================================
        .route(
            "/api/d001/sales",
            get(handlers::d001_sales::get_sales).layer(require_auth()),
        )
        .route(
            "/api/d001/sales/entries",
            post(handlers::d001_sales::record_entry).layer(require_auth()),
        )
        .nest_service("/uploads", ServeDir::new(uploads_dir))
}
