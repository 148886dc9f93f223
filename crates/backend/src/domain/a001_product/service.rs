use contracts::domain::a001_product::aggregate::{
    split_images, FormMode, Product, ProductForm, ProductValidationError,
};
use uuid::Uuid;

use super::image_storage::{self, UploadedImage};
use super::repository;

#[derive(Debug, thiserror::Error)]
pub enum ProductServiceError {
    #[error(transparent)]
    Validation(#[from] ProductValidationError),
    #[error("product not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Parsed multipart body of the create/edit forms
#[derive(Debug, Clone, Default)]
pub struct ProductUpload {
    pub form: ProductForm,
    /// `existingUrls[]`: images of the product the operator kept
    pub existing_urls: Vec<String>,
    /// `images`: newly attached files
    pub images: Vec<UploadedImage>,
}

pub async fn list_all() -> anyhow::Result<Vec<Product>> {
    repository::list_all().await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Product>> {
    repository::get_by_id(id).await
}

pub async fn create(upload: ProductUpload) -> Result<Product, ProductServiceError> {
    let fields = upload.form.validate(FormMode::Create, upload.images.len())?;

    let image_urls = image_storage::store(&upload.images).await?;
    let mut aggregate = Product::new_for_insert(fields, image_urls);
    aggregate.validate()?;

    if let Err(e) = repository::insert(&aggregate).await {
        image_storage::remove(&aggregate.image_urls).await;
        return Err(e.into());
    }

    tracing::info!("Created product {} ({})", aggregate.id.value(), aggregate.title);
    Ok(aggregate)
}

pub async fn update(id: Uuid, upload: ProductUpload) -> Result<Product, ProductServiceError> {
    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or(ProductServiceError::NotFound)?;

    let (kept, dropped) = split_images(&aggregate.image_urls, &upload.existing_urls);
    let fields = upload
        .form
        .validate(FormMode::Edit, kept.len() + upload.images.len())?;

    let new_urls = image_storage::store(&upload.images).await?;
    let image_urls: Vec<String> = kept.into_iter().chain(new_urls.iter().cloned()).collect();

    aggregate.update(fields, image_urls);
    aggregate.validate()?;
    aggregate.before_write();

    if let Err(e) = repository::update(&aggregate).await {
        image_storage::remove(&new_urls).await;
        return Err(e.into());
    }

    image_storage::remove(&dropped).await;
    tracing::info!(
        "Updated product {} (kept {}, added {}, removed {} images)",
        id,
        aggregate.image_urls.len() - new_urls.len(),
        new_urls.len(),
        dropped.len()
    );
    Ok(aggregate)
}

/// Soft delete; the image files are removed right away
pub async fn delete(id: Uuid) -> Result<(), ProductServiceError> {
    let aggregate = repository::get_by_id(id)
        .await?
        .ok_or(ProductServiceError::NotFound)?;

    if !repository::soft_delete(id).await? {
        return Err(ProductServiceError::NotFound);
    }

    image_storage::remove(&aggregate.image_urls).await;
    tracing::info!("Deleted product {}", id);
    Ok(())
}
