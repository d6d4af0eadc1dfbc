use std::sync::Arc;

use chrono::Utc;

use crate::{
    error::{AppError, Result},
    models::{ImageUpload, Product, ProductFields, ProductRecord},
    services::image_storage::ImageStorage,
    store::ProductStore,
};

/// Keeps product rows and their image files in step.
///
/// File and row writes are not transactional: a failure between the two
/// leaves either an orphaned file or a row pointing at a missing one.
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
    storage: ImageStorage,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>, storage: ImageStorage) -> Self {
        Self { store, storage }
    }

    pub fn storage(&self) -> &ImageStorage {
        &self.storage
    }

    pub async fn check_health(&self) -> Result<()> {
        self.store.check_health().await
    }

    pub async fn list(&self) -> Result<Vec<Product>> {
        self.store.find_all().await
    }

    pub async fn get(&self, id: i32) -> Result<Product> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", id)))
    }

    pub async fn create(&self, fields: ProductFields, image: ImageUpload) -> Result<Product> {
        let created_at = Utc::now();
        let image_file_name =
            ImageStorage::storage_name(&image.file_name, created_at.timestamp_millis());

        self.storage.store(&image_file_name, &image.bytes).await?;

        let record = ProductRecord {
            id: None,
            name: fields.name,
            brand: fields.brand,
            category: fields.category,
            price: fields.price,
            description: fields.description,
            created_at,
            image_file_name,
        };

        let product = self.store.save(record).await?;

        tracing::info!(
            "Created product {} with image {}",
            product.id,
            product.image_file_name
        );

        Ok(product)
    }

    /// Overwrites all editable columns. The stored image is only touched
    /// when `image` is `Some`.
    pub async fn update(
        &self,
        id: i32,
        fields: ProductFields,
        image: Option<ImageUpload>,
    ) -> Result<Product> {
        let mut record = ProductRecord::from(self.get(id).await?);

        if let Some(image) = image {
            self.discard_image(&record.image_file_name).await;

            let image_file_name =
                ImageStorage::storage_name(&image.file_name, Utc::now().timestamp_millis());
            self.storage.store(&image_file_name, &image.bytes).await?;

            record.image_file_name = image_file_name;
        }

        record.apply(fields);

        let product = self.store.save(record).await?;

        tracing::info!("Updated product {}", product.id);

        Ok(product)
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        let product = self.get(id).await?;

        self.discard_image(&product.image_file_name).await;
        self.store.delete(product.id).await?;

        tracing::info!("Deleted product {}", product.id);

        Ok(())
    }

    // Failure here never aborts the caller.
    async fn discard_image(&self, file_name: &str) {
        if let Err(e) = self.storage.remove(file_name).await {
            tracing::warn!("Failed to remove image {}: {}", file_name, e);
        }
    }
}
