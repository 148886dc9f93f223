pub mod date_bucket;
pub mod format;
