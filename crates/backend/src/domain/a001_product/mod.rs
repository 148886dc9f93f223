pub mod image_storage;
pub mod repository;
pub mod service;
