//! Product form UI module
//!
//! - view_model.rs: form state, image picking and the save command
//! - view.rs: Leptos component (pure UI)

mod view;
mod view_model;

pub use view::ProductForm;
pub use view_model::ProductFormViewModel;
