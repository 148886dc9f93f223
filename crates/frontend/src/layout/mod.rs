pub mod header;
pub mod shell;
