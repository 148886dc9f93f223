use std::net::SocketAddr;

use axum::http::{header, Method};
use axum::middleware;
use backend::{dashboards, domain, routes, shared, system};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

/// The console is served from another origin during `trunk serve`
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
}

async fn bind(port: u16) -> anyhow::Result<TcpListener> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Listening on http://{}", addr);
            Ok(listener)
        }
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
            tracing::error!("Port {} is already in use; set [server] port in config.toml", port);
            Err(e.into())
        }
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            Err(e.into())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = shared::config::load_config()?;
    let db_path = shared::config::get_database_path(&config);
    shared::data::db::initialize_database(Some(&db_path.to_string_lossy()))
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;
    system::initialization::ensure_admin_user_exists().await?;

    let uploads_dir = shared::config::get_uploads_dir(&config);
    domain::a001_product::image_storage::initialize(uploads_dir.clone()).await?;
    dashboards::d001_sales_report::source::initialize(config.sales.source)?;

    let app = routes::configure_routes(&uploads_dir)
        .fallback_service(ServeDir::new("dist"))
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .layer(cors_layer());

    let listener = bind(config.server.port).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
