//! Product image files on local disk, published under `/uploads/<file>`.

use anyhow::{bail, Result};
use axum::body::Bytes;
use contracts::domain::a001_product::aggregate::image_extension;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

pub const PUBLIC_PREFIX: &str = "/uploads/";

static UPLOADS_DIR: OnceCell<PathBuf> = OnceCell::new();

/// One `images` part of a multipart product form
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadedImage {
    pub fn is_image(content_type: &str) -> bool {
        image_extension(content_type).is_some()
    }

    /// Taken from the content type only; the client's file name never reaches disk
    fn extension(&self) -> Option<&'static str> {
        image_extension(&self.content_type)
    }
}

pub async fn initialize(dir: PathBuf) -> Result<()> {
    tokio::fs::create_dir_all(&dir).await?;
    tracing::info!("Product images are stored in {}", dir.display());
    UPLOADS_DIR
        .set(dir)
        .map_err(|_| anyhow::anyhow!("Uploads directory is already initialized"))
}

pub fn uploads_dir() -> Result<&'static Path> {
    UPLOADS_DIR
        .get()
        .map(PathBuf::as_path)
        .ok_or_else(|| anyhow::anyhow!("Uploads directory has not been initialized"))
}

/// Write the images and return their public URLs, in input order
pub async fn store(images: &[UploadedImage]) -> Result<Vec<String>> {
    store_in(uploads_dir()?, images).await
}

/// Delete the files behind `urls`; failures are logged, not returned
pub async fn remove(urls: &[String]) {
    match uploads_dir() {
        Ok(dir) => remove_in(dir, urls).await,
        Err(e) => tracing::error!("Cannot remove images: {}", e),
    }
}

pub async fn store_in(dir: &Path, images: &[UploadedImage]) -> Result<Vec<String>> {
    let mut urls = Vec::with_capacity(images.len());
    for image in images {
        let Some(extension) = image.extension() else {
            remove_in(dir, &urls).await;
            bail!(
                "Refusing to store {:?} as {}",
                image.file_name.as_deref().unwrap_or("<unnamed>"),
                image.content_type
            );
        };
        let file_name = format!("{}.{}", uuid::Uuid::new_v4(), extension);
        if let Err(e) = tokio::fs::write(dir.join(&file_name), &image.bytes).await {
            // roll back what was already written
            remove_in(dir, &urls).await;
            return Err(anyhow::anyhow!("Failed to write image {}: {}", file_name, e));
        }
        urls.push(format!("{}{}", PUBLIC_PREFIX, file_name));
    }
    Ok(urls)
}

pub async fn remove_in(dir: &Path, urls: &[String]) {
    for url in urls {
        let Some(file_name) = local_file_name(url) else {
            tracing::debug!("Skipping foreign image url {}", url);
            continue;
        };
        match tokio::fs::remove_file(dir.join(file_name)).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove image {}: {}", url, e),
        }
    }
}

/// File name behind one of our own URLs; anything else yields `None`
pub fn local_file_name(url: &str) -> Option<&str> {
    let name = url.strip_prefix(PUBLIC_PREFIX)?;
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_');
    valid.then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: Option<&str>, content_type: &str) -> UploadedImage {
        UploadedImage {
            file_name: name.map(String::from),
            content_type: content_type.into(),
            bytes: Bytes::from_static(b"\x89PNG"),
        }
    }

    #[test]
    fn test_local_file_name() {
        assert_eq!(local_file_name("/uploads/abc.png"), Some("abc.png"));
        assert_eq!(local_file_name("/uploads/../secret"), None);
        assert_eq!(local_file_name("/uploads/"), None);
        assert_eq!(local_file_name("https://placehold.co/80x80"), None);
        assert_eq!(local_file_name("/uploads/a/b.png"), None);
    }

    #[test]
    fn test_extension_choice() {
        assert_eq!(image(Some("Banana.JPG"), "image/jpeg").extension(), Some("jpg"));
        assert_eq!(image(None, "image/webp").extension(), Some("webp"));
        assert_eq!(image(Some("noext"), "image/png").extension(), Some("png"));
        assert!(UploadedImage::is_image("image/png"));
        assert!(!UploadedImage::is_image("text/plain"));
        assert!(!UploadedImage::is_image("image/svg+xml"));
    }

    #[tokio::test]
    async fn test_client_file_name_does_not_pick_extension() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(image(Some("x.html"), "image/png").extension(), Some("png"));

        let urls = store_in(dir.path(), &[image(Some("x.html"), "image/png")])
            .await
            .unwrap();
        assert!(urls[0].ends_with(".png"));

        let err = store_in(dir.path(), &[image(Some("a.png"), "image/png"), image(Some("x.svg"), "image/svg+xml")])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("image/svg+xml"));
        // only the file from the first call is left
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_store_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let urls = store_in(dir.path(), &[image(Some("a.png"), "image/png"), image(None, "image/gif")])
            .await
            .unwrap();
        assert_eq!(urls.len(), 2);
        for url in &urls {
            assert!(url.starts_with(PUBLIC_PREFIX));
            assert!(dir.path().join(local_file_name(url).unwrap()).exists());
        }

        remove_in(dir.path(), &urls[..1]).await;
        assert!(!dir.path().join(local_file_name(&urls[0]).unwrap()).exists());
        assert!(dir.path().join(local_file_name(&urls[1]).unwrap()).exists());

        // already gone is fine
        remove_in(dir.path(), &urls[..1]).await;
    }
}
