use contracts::domain::a001_product::aggregate::{
    image_extension, remaining_slots, FormMode, Product, ProductFieldErrors, ProductForm,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use uuid::Uuid;

use crate::shared::data_source::{DataSource, ProductSubmission};

/// A newly picked file with its preview URL
#[derive(Debug, Clone)]
pub struct SelectedImage {
    pub file: web_sys::File,
    pub preview_url: String,
}

/// ViewModel of the product create/edit form
#[derive(Clone, Copy)]
pub struct ProductFormViewModel {
    pub mode: FormMode,
    pub editing_id: Option<Uuid>,
    pub form: RwSignal<ProductForm>,
    pub existing_urls: RwSignal<Vec<String>>,
    pub files: RwSignal<Vec<SelectedImage>, LocalStorage>,
    pub errors: RwSignal<ProductFieldErrors>,
    pub server_error: RwSignal<Option<String>>,
    pub submitting: RwSignal<bool>,
}

impl ProductFormViewModel {
    pub fn new(product: Option<&Product>) -> Self {
        Self {
            mode: if product.is_some() {
                FormMode::Edit
            } else {
                FormMode::Create
            },
            editing_id: product.map(|p| p.id.value()),
            form: RwSignal::new(product.map(ProductForm::from_product).unwrap_or_default()),
            existing_urls: RwSignal::new(product.map(|p| p.image_urls.clone()).unwrap_or_default()),
            files: RwSignal::new_local(Vec::new()),
            errors: RwSignal::new(ProductFieldErrors::default()),
            server_error: RwSignal::new(None),
            submitting: RwSignal::new(false),
        }
    }

    pub fn image_total(&self) -> usize {
        self.existing_urls.with(Vec::len) + self.files.with(Vec::len)
    }

    pub fn remaining(&self) -> usize {
        remaining_slots(self.image_total())
    }

    /// Take image files from the picker, up to the free slots
    pub fn add_files(&self, list: &web_sys::FileList) {
        let attached = self.image_total();
        let incoming: Vec<web_sys::File> = (0..list.length())
            .filter_map(|i| list.get(i))
            .filter(|file| is_image_type(&file.type_()))
            .collect();

        let take = accept_count(attached, incoming.len());
        if take < incoming.len() {
            log::info!("Skipped {} image(s) over the limit", incoming.len() - take);
        }

        let picked: Vec<SelectedImage> = incoming
            .into_iter()
            .take(take)
            .filter_map(|file| {
                web_sys::Url::create_object_url_with_blob(&file)
                    .ok()
                    .map(|preview_url| SelectedImage { file, preview_url })
            })
            .collect();

        if !picked.is_empty() {
            self.files.update(|files| files.extend(picked));
            self.errors.update(|e| e.images = None);
        }
    }

    pub fn remove_existing(&self, index: usize) {
        self.existing_urls.update(|urls| {
            if index < urls.len() {
                urls.remove(index);
            }
        });
    }

    pub fn remove_new(&self, index: usize) {
        self.files.update(|files| {
            if index < files.len() {
                let removed = files.remove(index);
                let _ = web_sys::Url::revoke_object_url(&removed.preview_url);
            }
        });
    }

    /// Revoke the preview URLs when the form goes away
    pub fn release_previews(&self) {
        let _ = self.files.try_with_untracked(|files| {
            for image in files {
                let _ = web_sys::Url::revoke_object_url(&image.preview_url);
            }
        });
    }

    /// Validate and send the form; `on_saved` gets the stored product
    pub fn save_command(&self, data_source: DataSource, on_saved: Callback<Product>) {
        if self.submitting.get_untracked() {
            return;
        }

        let form = self.form.get_untracked();
        let existing_urls = self.existing_urls.get_untracked();
        let files: Vec<web_sys::File> = self
            .files
            .with_untracked(|files| files.iter().map(|s| s.file.clone()).collect());

        let errors = form.field_errors(self.mode, existing_urls.len() + files.len());
        let valid = errors.is_empty();
        self.errors.set(errors);
        if !valid {
            return;
        }

        let submission = ProductSubmission {
            form,
            existing_urls,
            files,
        };

        self.submitting.set(true);
        self.server_error.set(None);

        let vm = *self;
        spawn_local(async move {
            let result = match vm.editing_id {
                Some(id) => data_source.update_product(id, submission).await,
                None => data_source.create_product(submission).await,
            };
            vm.submitting.set(false);
            match result {
                Ok(product) => on_saved.run(product),
                Err(e) => {
                    log::error!("Saving product failed: {}", e);
                    vm.server_error.set(Some(e));
                }
            }
        });
    }
}

pub fn is_image_type(content_type: &str) -> bool {
    image_extension(content_type).is_some()
}

/// How many of `incoming` files fit next to `attached` images
pub fn accept_count(attached: usize, incoming: usize) -> usize {
    incoming.min(remaining_slots(attached))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_count() {
        assert_eq!(accept_count(0, 3), 3);
        assert_eq!(accept_count(3, 3), 2);
        assert_eq!(accept_count(5, 1), 0);
        assert_eq!(accept_count(7, 1), 0);
        assert_eq!(accept_count(0, 9), 5);
    }

    #[test]
    fn test_is_image_type() {
        assert!(is_image_type("image/png"));
        assert!(is_image_type("image/webp"));
        assert!(!is_image_type("image/svg+xml"));
        assert!(!is_image_type("application/pdf"));
        assert!(!is_image_type(""));
    }
}
