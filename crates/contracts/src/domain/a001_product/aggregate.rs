use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{AggregateId, EntityMetadata};

/// Upper bound of images attached to one product (kept + newly uploaded)
pub const MAX_IMAGES: usize = 5;

// ============================================================================
// ID Type
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub Uuid);

impl ProductId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for ProductId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ProductId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Validation
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductValidationError {
    #[error("제목을 입력하세요.")]
    TitleRequired,
    #[error("설명을 입력하세요.")]
    DescriptionRequired,
    #[error("가격은 숫자로 입력하세요.")]
    PriceNotNumber,
    #[error("0 이상이어야 합니다.")]
    NegativePrice,
    #[error("이미지 파일을 1장 이상 첨부해 주세요.")]
    ImagesRequired,
    #[error("이미지는 최대 5장까지 업로드할 수 있습니다.")]
    TooManyImages,
}

/// Per-field messages of a product form, rendered next to each input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFieldErrors {
    pub title: Option<ProductValidationError>,
    pub description: Option<ProductValidationError>,
    pub price: Option<ProductValidationError>,
    pub images: Option<ProductValidationError>,
}

impl ProductFieldErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.images.is_none()
    }

    /// First error in form order
    pub fn first(&self) -> Option<ProductValidationError> {
        self.title
            .clone()
            .or_else(|| self.description.clone())
            .or_else(|| self.price.clone())
            .or_else(|| self.images.clone())
    }
}

/// Whether the form creates a product or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// Price as typed by the user: an integer number of won, `>= 0`.
/// A fractional part is accepted and truncated like a numeric input would.
pub fn parse_price(raw: &str) -> Result<i64, ProductValidationError> {
    let raw = raw.trim();
    let value = if let Ok(v) = raw.parse::<i64>() {
        v
    } else {
        let v = raw
            .parse::<f64>()
            .map_err(|_| ProductValidationError::PriceNotNumber)?;
        if !v.is_finite() {
            return Err(ProductValidationError::PriceNotNumber);
        }
        v.trunc() as i64
    };
    if value < 0 {
        return Err(ProductValidationError::NegativePrice);
    }
    Ok(value)
}

pub fn validate_image_count(mode: FormMode, total: usize) -> Result<(), ProductValidationError> {
    if mode == FormMode::Create && total == 0 {
        return Err(ProductValidationError::ImagesRequired);
    }
    if total > MAX_IMAGES {
        return Err(ProductValidationError::TooManyImages);
    }
    Ok(())
}

/// How many more images may be picked given what is already attached
pub fn remaining_slots(attached: usize) -> usize {
    MAX_IMAGES.saturating_sub(attached)
}

/// Raster formats accepted for product images, with the stored file extension
pub const ACCEPTED_IMAGE_TYPES: [(&str, &str); 4] = [
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

/// Stored extension for an accepted MIME type; parameters and case are ignored.
/// Anything else, including SVG, is not an image as far as the catalog goes.
pub fn image_extension(content_type: &str) -> Option<&'static str> {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    ACCEPTED_IMAGE_TYPES
        .iter()
        .find(|(mime, _)| mime.eq_ignore_ascii_case(essence))
        .map(|(_, ext)| *ext)
}

// ============================================================================
// Form (text fields of the multipart body)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductForm {
    pub title: String,
    pub description: String,
    /// Raw text of the price input
    pub price: String,
}

/// Text fields after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub title: String,
    pub description: String,
    pub price: i64,
}

impl ProductForm {
    pub fn from_product(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
        }
    }

    /// Check every rule and collect one message per field
    pub fn field_errors(&self, mode: FormMode, image_total: usize) -> ProductFieldErrors {
        ProductFieldErrors {
            title: self
                .title
                .trim()
                .is_empty()
                .then_some(ProductValidationError::TitleRequired),
            description: self
                .description
                .trim()
                .is_empty()
                .then_some(ProductValidationError::DescriptionRequired),
            price: parse_price(&self.price).err(),
            images: validate_image_count(mode, image_total).err(),
        }
    }

    pub fn validate(
        &self,
        mode: FormMode,
        image_total: usize,
    ) -> Result<ProductFields, ProductValidationError> {
        if let Some(err) = self.field_errors(mode, image_total).first() {
            return Err(err);
        }
        Ok(ProductFields {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            price: parse_price(&self.price)?,
        })
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    /// Price in won
    pub price: i64,
    #[serde(rename = "imageUrls")]
    pub image_urls: Vec<String>,
    pub metadata: EntityMetadata,
}

impl Product {
    pub fn new_for_insert(fields: ProductFields, image_urls: Vec<String>) -> Self {
        Self {
            id: ProductId::new_v4(),
            title: fields.title,
            description: fields.description,
            price: fields.price,
            image_urls,
            metadata: EntityMetadata::new(),
        }
    }

    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }

    /// Apply validated fields and the resulting image list
    pub fn update(&mut self, fields: ProductFields, image_urls: Vec<String>) {
        self.title = fields.title;
        self.description = fields.description;
        self.price = fields.price;
        self.image_urls = image_urls;
    }

    /// Image shown in the list thumbnail
    pub fn cover_image(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }

    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if self.title.trim().is_empty() {
            return Err(ProductValidationError::TitleRequired);
        }
        if self.description.trim().is_empty() {
            return Err(ProductValidationError::DescriptionRequired);
        }
        if self.price < 0 {
            return Err(ProductValidationError::NegativePrice);
        }
        if self.image_urls.len() > MAX_IMAGES {
            return Err(ProductValidationError::TooManyImages);
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.metadata.record_write();
    }
}

/// Split the current images into (kept, dropped) by the list the form sent back.
///
/// URLs the product never had are ignored, so a client cannot attach
/// arbitrary files by naming them. Order follows the current list.
pub fn split_images(current: &[String], requested: &[String]) -> (Vec<String>, Vec<String>) {
    current
        .iter()
        .cloned()
        .partition(|url| requested.contains(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension_allowlist() {
        assert_eq!(image_extension("image/png"), Some("png"));
        assert_eq!(image_extension("IMAGE/JPEG; charset=binary"), Some("jpg"));
        assert_eq!(image_extension("image/svg+xml"), None);
        assert_eq!(image_extension("text/html"), None);
        assert_eq!(image_extension(""), None);
    }

    fn form(title: &str, description: &str, price: &str) -> ProductForm {
        ProductForm {
            title: title.into(),
            description: description.into(),
            price: price.into(),
        }
    }

    #[test]
    fn test_valid_form_is_trimmed() {
        let fields = form("  바나나 보관함 ", "노랗고 튼튼한 보관함", "12900")
            .validate(FormMode::Create, 1)
            .unwrap();
        assert_eq!(fields.title, "바나나 보관함");
        assert_eq!(fields.price, 12900);
    }

    #[test]
    fn test_required_text_fields() {
        let errors = form(" ", "", "100").field_errors(FormMode::Edit, 0);
        assert_eq!(errors.title, Some(ProductValidationError::TitleRequired));
        assert_eq!(errors.description, Some(ProductValidationError::DescriptionRequired));
        assert_eq!(errors.price, None);
        assert_eq!(errors.images, None);
        assert_eq!(errors.first(), Some(ProductValidationError::TitleRequired));
    }

    #[test]
    fn test_price_rules() {
        assert_eq!(parse_price("0"), Ok(0));
        assert_eq!(parse_price(" 1500 "), Ok(1500));
        assert_eq!(parse_price("99.9"), Ok(99));
        assert_eq!(parse_price("-1"), Err(ProductValidationError::NegativePrice));
        assert_eq!(parse_price(""), Err(ProductValidationError::PriceNotNumber));
        assert_eq!(parse_price("abc"), Err(ProductValidationError::PriceNotNumber));
        assert_eq!(parse_price("NaN"), Err(ProductValidationError::PriceNotNumber));
    }

    #[test]
    fn test_image_count_limits() {
        assert_eq!(
            validate_image_count(FormMode::Create, 0),
            Err(ProductValidationError::ImagesRequired)
        );
        assert_eq!(validate_image_count(FormMode::Edit, 0), Ok(()));
        assert_eq!(validate_image_count(FormMode::Create, 5), Ok(()));
        assert_eq!(
            validate_image_count(FormMode::Edit, 6),
            Err(ProductValidationError::TooManyImages)
        );
        assert_eq!(remaining_slots(2), 3);
        assert_eq!(remaining_slots(7), 0);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ProductValidationError::NegativePrice.to_string(), "0 이상이어야 합니다.");
        assert_eq!(
            ProductValidationError::TooManyImages.to_string(),
            "이미지는 최대 5장까지 업로드할 수 있습니다."
        );
    }

    #[test]
    fn test_update_and_json_shape() {
        let fields = form("A", "B", "10").validate(FormMode::Create, 1).unwrap();
        let mut product = Product::new_for_insert(fields, vec!["/uploads/a.png".into()]);
        assert_eq!(product.cover_image(), Some("/uploads/a.png"));

        let edited = form("A2", "B2", "20").validate(FormMode::Edit, 0).unwrap();
        product.update(edited, vec![]);
        product.before_write();
        assert_eq!(product.price, 20);
        assert_eq!(product.metadata.version, 1);
        assert!(product.validate().is_ok());

        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("imageUrls").is_some());
        assert_eq!(ProductForm::from_product(&product).price, "20");
    }

    #[test]
    fn test_product_id_string_form() {
        let id = ProductId::new_v4();
        assert_eq!(ProductId::from_string(&id.as_string()), Ok(id));
        assert!(ProductId::from_string("not-a-uuid").is_err());
    }

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_images_keeps_requested() {
        let current = urls(&["/uploads/a.png", "/uploads/b.png", "/uploads/c.png"]);
        let (kept, dropped) = split_images(&current, &urls(&["/uploads/c.png", "/uploads/a.png"]));
        assert_eq!(kept, urls(&["/uploads/a.png", "/uploads/c.png"]));
        assert_eq!(dropped, urls(&["/uploads/b.png"]));
    }

    #[test]
    fn test_split_images_ignores_unknown_urls() {
        let current = urls(&["/uploads/a.png"]);
        let (kept, dropped) = split_images(&current, &urls(&["/uploads/evil.png"]));
        assert!(kept.is_empty());
        assert_eq!(dropped, current);
    }

    #[test]
    fn test_split_images_nothing_sent_back_drops_all() {
        let current = urls(&["/uploads/a.png", "/uploads/b.png"]);
        let (kept, dropped) = split_images(&current, &[]);
        assert!(kept.is_empty());
        assert_eq!(dropped.len(), 2);
    }
}
