pub mod image_storage;
pub mod product_service;
