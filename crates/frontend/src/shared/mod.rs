pub mod api_utils;
pub mod config;
pub mod data_source;
pub mod icons;
