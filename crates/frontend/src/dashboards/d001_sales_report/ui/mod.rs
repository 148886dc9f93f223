pub mod product_select;
pub mod state;
mod view;

pub use view::SalesScreen;
