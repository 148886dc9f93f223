use axum::{
    extract::{Multipart, Path},
    http::StatusCode,
    Json,
};
use contracts::domain::a001_product::aggregate::Product;
use uuid::Uuid;

use crate::domain::a001_product::image_storage::UploadedImage;
use crate::domain::a001_product::service::{self, ProductServiceError, ProductUpload};
use crate::system::auth::extractor::CurrentUser;

type ApiError = (StatusCode, String);

fn map_error(e: ProductServiceError) -> ApiError {
    match e {
        ProductServiceError::Validation(v) => (StatusCode::BAD_REQUEST, v.to_string()),
        ProductServiceError::NotFound => (StatusCode::NOT_FOUND, "product not found".into()),
        ProductServiceError::Internal(err) => {
            tracing::error!("Product operation failed: {:#}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
        }
    }
}

fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| (StatusCode::BAD_REQUEST, format!("invalid id: {}", id)))
}

fn bad_multipart(e: axum::extract::multipart::MultipartError) -> ApiError {
    tracing::warn!("Malformed multipart body: {}", e);
    (StatusCode::BAD_REQUEST, e.body_text())
}

/// Collect the form parts. Parts of `images` in a format we do not store are skipped.
async fn read_upload(mut multipart: Multipart) -> Result<ProductUpload, ApiError> {
    let mut upload = ProductUpload::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => upload.form.title = field.text().await.map_err(bad_multipart)?,
            "description" => upload.form.description = field.text().await.map_err(bad_multipart)?,
            "price" => upload.form.price = field.text().await.map_err(bad_multipart)?,
            "existingUrls[]" | "existingUrls" => {
                upload.existing_urls.push(field.text().await.map_err(bad_multipart)?)
            }
            "images" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                if !UploadedImage::is_image(&content_type) {
                    tracing::debug!("Skipping non-image part ({})", content_type);
                    continue;
                }
                let file_name = field.file_name().map(String::from);
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                if bytes.is_empty() {
                    continue;
                }
                upload.images.push(UploadedImage {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            other => tracing::debug!("Ignoring multipart field {:?}", other),
        }
    }

    Ok(upload)
}

/// GET /api/a001/product
pub async fn list_all() -> Result<Json<Vec<Product>>, StatusCode> {
    match service::list_all().await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to list products: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/a001/product/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Product>, StatusCode> {
    let uuid = Uuid::parse_str(&id).map_err(|_| StatusCode::BAD_REQUEST)?;
    match service::get_by_id(uuid).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to load product {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/a001/product (multipart)
pub async fn create(
    operator: CurrentUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let upload = read_upload(multipart).await?;
    let product = service::create(upload).await.map_err(map_error)?;
    tracing::info!("Product {} created by {}", product.id.value(), operator.username());
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/a001/product/:id (multipart)
pub async fn update(
    operator: CurrentUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Product>, ApiError> {
    let uuid = parse_id(&id)?;
    let upload = read_upload(multipart).await?;
    let product = service::update(uuid, upload).await.map_err(map_error)?;
    tracing::info!("Product {} updated by {}", uuid, operator.username());
    Ok(Json(product))
}

/// DELETE /api/a001/product/:id
pub async fn delete(operator: CurrentUser, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let uuid = parse_id(&id)?;
    service::delete(uuid).await.map_err(map_error)?;
    tracing::info!("Product {} deleted by {} ({})", uuid, operator.username(), operator.user_id());
    Ok(StatusCode::NO_CONTENT)
}
