pub mod details;
pub mod list;
pub mod row_menu;
