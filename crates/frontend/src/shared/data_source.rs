//! Where the console gets its data from.
//!
//! `DataSource` is chosen once in `App` from `ADMIN_DATA_SOURCE` and handed
//! to the screens through context. `Remote` talks to the backend; `Mock`
//! keeps a product catalog in memory and generates sales figures in the
//! browser, so the console can be clicked through without a server.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Duration, Utc};
use contracts::dashboards::d001_sales_report::{mock_buckets, SalesBucket, SalesQuery};
use contracts::domain::a001_product::aggregate::{
    split_images, FormMode, Product, ProductFields, ProductForm,
};
use leptos::prelude::*;
use uuid::Uuid;

use super::config::DataSourceKind;
use crate::dashboards::d001_sales_report::api as sales_api;
use crate::domain::a001_product::api as product_api;

/// What the product form submits
#[derive(Debug, Clone, Default)]
pub struct ProductSubmission {
    pub form: ProductForm,
    /// Images of the edited product that stay
    pub existing_urls: Vec<String>,
    /// Newly picked files
    pub files: Vec<web_sys::File>,
}

impl ProductSubmission {
    pub fn image_total(&self) -> usize {
        self.existing_urls.len() + self.files.len()
    }
}

#[derive(Clone)]
pub enum DataSource {
    Mock(MockCatalog),
    Remote,
}

impl DataSource {
    pub fn create(kind: DataSourceKind) -> Self {
        match kind {
            DataSourceKind::Mock => DataSource::Mock(MockCatalog::seeded()),
            DataSourceKind::Remote => DataSource::Remote,
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self, DataSource::Mock(_))
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, String> {
        match self {
            DataSource::Mock(catalog) => Ok(catalog.list()),
            DataSource::Remote => product_api::fetch_products().await,
        }
    }

    pub async fn create_product(&self, submission: ProductSubmission) -> Result<Product, String> {
        match self {
            DataSource::Mock(catalog) => {
                let fields = submission
                    .form
                    .validate(FormMode::Create, submission.image_total())
                    .map_err(|e| e.to_string())?;
                let urls = object_urls(&submission.files)?;
                Ok(catalog.insert(fields, urls))
            }
            DataSource::Remote => product_api::create_product(&submission).await,
        }
    }

    pub async fn update_product(
        &self,
        id: Uuid,
        submission: ProductSubmission,
    ) -> Result<Product, String> {
        match self {
            DataSource::Mock(catalog) => {
                let fields = submission
                    .form
                    .validate(FormMode::Edit, submission.image_total())
                    .map_err(|e| e.to_string())?;
                let urls = object_urls(&submission.files)?;
                let (product, dropped) = catalog
                    .update(id, fields, &submission.existing_urls, urls)
                    .ok_or_else(|| "상품을 찾을 수 없습니다.".to_string())?;
                revoke_object_urls(&dropped);
                Ok(product)
            }
            DataSource::Remote => product_api::update_product(id, &submission).await,
        }
    }

    pub async fn delete_product(&self, id: Uuid) -> Result<(), String> {
        match self {
            DataSource::Mock(catalog) => {
                let removed = catalog
                    .remove(id)
                    .ok_or_else(|| "상품을 찾을 수 없습니다.".to_string())?;
                revoke_object_urls(&removed.image_urls);
                Ok(())
            }
            DataSource::Remote => product_api::delete_product(id).await,
        }
    }

    /// Buckets of `query`, ordered, one per unit step of the range
    pub async fn fetch_sales(&self, query: &SalesQuery) -> Result<Vec<SalesBucket>, String> {
        match self {
            DataSource::Mock(_) => Ok(mock_buckets(query.from, query.to, query.grain, || {
                js_sys::Math::random()
            })),
            DataSource::Remote => sales_api::fetch_sales(query).await,
        }
    }
}

pub fn use_data_source() -> DataSource {
    use_context::<DataSource>().expect("DataSource not found in context")
}

fn object_urls(files: &[web_sys::File]) -> Result<Vec<String>, String> {
    files
        .iter()
        .map(|file| {
            web_sys::Url::create_object_url_with_blob(file)
                .map_err(|e| format!("이미지를 읽을 수 없습니다: {:?}", e))
        })
        .collect()
}

fn revoke_object_urls(urls: &[String]) {
    for url in urls.iter().filter(|u| u.starts_with("blob:")) {
        let _ = web_sys::Url::revoke_object_url(url);
    }
}

// ============================================================================
// Mock catalog
// ============================================================================

const MOCK_PRODUCTS: [(&str, &str, i64); 3] = [
    ("바나나 보관함", "노랗고 튼튼한 보관함", 12900),
    ("초코 바나나 세트", "초콜릿 바나나 세 송이가 들어 있는 선물 세트", 8900),
    ("바나나 스티커팩", "바나나 캐릭터 스티커 20종", 3500),
];

const MOCK_IMAGE: &str = "https://placehold.co/80x80?text=Banana";

/// In-memory products of the mock data source
#[derive(Clone, Default)]
pub struct MockCatalog {
    products: Arc<Mutex<Vec<Product>>>,
}

impl MockCatalog {
    pub fn seeded() -> Self {
        let catalog = Self::default();
        let now = Utc::now();
        let mut items = catalog.lock();
        for (i, (title, description, price)) in MOCK_PRODUCTS.iter().enumerate() {
            let mut product = Product::new_for_insert(
                ProductFields {
                    title: title.to_string(),
                    description: description.to_string(),
                    price: *price,
                },
                vec![MOCK_IMAGE.to_string()],
            );
            // listed in seed order
            product.metadata.updated_at = now - Duration::minutes(i as i64 + 1);
            items.push(product);
        }
        drop(items);
        catalog
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Product>> {
        self.products.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Most recently updated first, like the backend list
    pub fn list(&self) -> Vec<Product> {
        let mut items = self.lock().clone();
        items.sort_by(|a, b| b.metadata.updated_at.cmp(&a.metadata.updated_at));
        items
    }

    pub fn insert(&self, fields: ProductFields, image_urls: Vec<String>) -> Product {
        let product = Product::new_for_insert(fields, image_urls);
        self.lock().push(product.clone());
        product
    }

    /// Apply an edit; returns the product and the image URLs it no longer uses
    pub fn update(
        &self,
        id: Uuid,
        fields: ProductFields,
        existing_urls: &[String],
        new_urls: Vec<String>,
    ) -> Option<(Product, Vec<String>)> {
        let mut items = self.lock();
        let product = items.iter_mut().find(|p| p.id.value() == id)?;
        let (kept, dropped) = split_images(&product.image_urls, existing_urls);
        product.update(fields, kept.into_iter().chain(new_urls).collect());
        product.before_write();
        Some((product.clone(), dropped))
    }

    pub fn remove(&self, id: Uuid) -> Option<Product> {
        let mut items = self.lock();
        let index = items.iter().position(|p| p.id.value() == id)?;
        Some(items.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(title: &str, price: i64) -> ProductFields {
        ProductFields {
            title: title.into(),
            description: "설명".into(),
            price,
        }
    }

    #[test]
    fn test_seeded_catalog() {
        let catalog = MockCatalog::seeded();
        let items = catalog.list();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title, "바나나 보관함");
        assert_eq!(items[0].price, 12900);
        assert!(items.iter().all(|p| p.image_urls.len() == 1));
    }

    #[test]
    fn test_insert_lists_first() {
        let catalog = MockCatalog::seeded();
        let created = catalog.insert(fields("바나나 키링", 4500), vec!["blob:a".into()]);
        assert_eq!(catalog.list()[0].id, created.id);
    }

    #[test]
    fn test_update_keeps_and_drops_images() {
        let catalog = MockCatalog::default();
        let created = catalog.insert(
            fields("바나나 보관함", 12900),
            vec!["blob:a".into(), "blob:b".into()],
        );

        let (updated, dropped) = catalog
            .update(
                created.id.value(),
                fields("바나나 보관함 L", 15900),
                &["blob:b".to_string()],
                vec!["blob:c".into()],
            )
            .unwrap();

        assert_eq!(updated.title, "바나나 보관함 L");
        assert_eq!(updated.image_urls, vec!["blob:b".to_string(), "blob:c".to_string()]);
        assert_eq!(dropped, vec!["blob:a".to_string()]);
        assert_eq!(updated.metadata.version, 1);
        assert_eq!(catalog.list()[0], updated);
    }

    #[test]
    fn test_unknown_ids() {
        let catalog = MockCatalog::seeded();
        assert!(catalog
            .update(Uuid::new_v4(), fields("x", 1), &[], vec![])
            .is_none());
        assert!(catalog.remove(Uuid::new_v4()).is_none());
        assert_eq!(catalog.list().len(), 3);
    }

    #[test]
    fn test_remove() {
        let catalog = MockCatalog::seeded();
        let first = catalog.list()[0].clone();
        let removed = catalog.remove(first.id.value()).unwrap();
        assert_eq!(removed.id, first.id);
        assert_eq!(catalog.list().len(), 2);
    }
}
