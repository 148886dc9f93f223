use chrono::{DateTime, Utc};
use contracts::domain::a001_product::aggregate::Product;
use uuid::Uuid;

/// Which dialog of the products screen is open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductsDialog {
    #[default]
    Closed,
    Create,
    Edit(Uuid),
    ConfirmDelete(Uuid),
}

impl ProductsDialog {
    pub fn is_create(&self) -> bool {
        matches!(self, ProductsDialog::Create)
    }

    pub fn editing(&self) -> Option<Uuid> {
        match self {
            ProductsDialog::Edit(id) => Some(*id),
            _ => None,
        }
    }

    pub fn deleting(&self) -> Option<Uuid> {
        match self {
            ProductsDialog::ConfirmDelete(id) => Some(*id),
            _ => None,
        }
    }

    /// Edit/delete only open for rows that are still listed
    pub fn open_for(products: &[Product], id: Uuid, delete: bool) -> Self {
        if !products.iter().any(|p| p.id.value() == id) {
            return ProductsDialog::Closed;
        }
        if delete {
            ProductsDialog::ConfirmDelete(id)
        } else {
            ProductsDialog::Edit(id)
        }
    }
}

/// Put a saved product at the top of the list, replacing its old row
pub fn upsert(products: &mut Vec<Product>, saved: Product) {
    products.retain(|p| p.id != saved.id);
    products.insert(0, saved);
}

pub fn remove(products: &mut Vec<Product>, id: Uuid) {
    products.retain(|p| p.id.value() != id);
}

/// `2024. 3. 5.` as the list shows the last change
pub fn format_updated(at: DateTime<Utc>) -> String {
    at.format("%Y. %-m. %-d.").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use contracts::domain::a001_product::aggregate::ProductFields;

    fn product(title: &str) -> Product {
        Product::new_for_insert(
            ProductFields {
                title: title.into(),
                description: "설명".into(),
                price: 1000,
            },
            vec![],
        )
    }

    #[test]
    fn test_dialog_accessors() {
        let id = Uuid::new_v4();
        assert!(ProductsDialog::Create.is_create());
        assert_eq!(ProductsDialog::Edit(id).editing(), Some(id));
        assert_eq!(ProductsDialog::Edit(id).deleting(), None);
        assert_eq!(ProductsDialog::ConfirmDelete(id).deleting(), Some(id));
        assert_eq!(ProductsDialog::default(), ProductsDialog::Closed);
    }

    #[test]
    fn test_open_for_unknown_row_stays_closed() {
        let items = vec![product("바나나 보관함")];
        let id = items[0].id.value();
        assert_eq!(ProductsDialog::open_for(&items, id, false), ProductsDialog::Edit(id));
        assert_eq!(
            ProductsDialog::open_for(&items, id, true),
            ProductsDialog::ConfirmDelete(id)
        );
        assert_eq!(
            ProductsDialog::open_for(&items, Uuid::new_v4(), true),
            ProductsDialog::Closed
        );
    }

    #[test]
    fn test_upsert_and_remove() {
        let mut items = vec![product("a"), product("b")];
        let mut edited = items[1].clone();
        edited.title = "b2".into();

        upsert(&mut items, edited.clone());
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], edited);

        let created = product("c");
        upsert(&mut items, created.clone());
        assert_eq!(items[0], created);
        assert_eq!(items.len(), 3);

        remove(&mut items, edited.id.value());
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|p| p.id != edited.id));
    }

    #[test]
    fn test_format_updated() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();
        assert_eq!(format_updated(at), "2024. 3. 5.");
    }
}
