use axum::body::to_bytes;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Local;

use crate::shared::format::byte_count;

/// Console line per HTTP request:
/// local time, duration, response size, status, method and path.
///
/// Static files under `/uploads` are streamed through without buffering.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    if uri.path().starts_with("/uploads/") {
        print_line(
            status_color(response.status()),
            start.elapsed().as_millis(),
            "stream",
            response.status(),
            &method,
            uri.path(),
        );
        return response;
    }

    let (parts, body) = response.into_parts();

    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!("Failed to read response body of {} {}: {}", method, uri.path(), e);
            print_line("33", start.elapsed().as_millis(), "error", parts.status, &method, uri.path());
            return Response::from_parts(parts, Body::default());
        }
    };

    print_line(
        status_color(parts.status),
        start.elapsed().as_millis(),
        &byte_count(bytes.len()),
        parts.status,
        &method,
        uri.path(),
    );

    Response::from_parts(parts, Body::from(bytes))
}

/// Cyan for success, brown for everything else
fn status_color(status: StatusCode) -> &'static str {
    if status.is_success() {
        "36"
    } else {
        "33"
    }
}

fn print_line(color: &str, millis: u128, size: &str, status: StatusCode, method: &Method, path: &str) {
    let timestamp = Local::now();
    println!(
        "\x1b[{}m{}\x1b[0m | {:>5}ms | {:>12} | {} {:>6} {}",
        color,
        timestamp.format("%H:%M:%S"),
        millis,
        size,
        status.as_u16(),
        method,
        path
    );
}
