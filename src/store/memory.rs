use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ProductStore;
use crate::{
    error::{AppError, Result},
    models::{Product, ProductRecord},
};

/// Process-local store. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    last_id: i32,
    rows: BTreeMap<i32, Product>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn find_all(&self) -> Result<Vec<Product>> {
        let inner = self.inner.read().await;
        Ok(inner.rows.values().rev().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>> {
        let inner = self.inner.read().await;
        Ok(inner.rows.get(&id).cloned())
    }

    async fn save(&self, record: ProductRecord) -> Result<Product> {
        let mut inner = self.inner.write().await;

        // created_at is immutable once the row exists
        let (id, created_at) = match record.id {
            Some(id) => {
                let existing = inner
                    .rows
                    .get(&id)
                    .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;
                (id, existing.created_at)
            }
            None => {
                inner.last_id += 1;
                (inner.last_id, record.created_at)
            }
        };

        let product = Product {
            id,
            name: record.name,
            brand: record.brand,
            category: record.category,
            price: record.price,
            description: record.description,
            created_at,
            image_file_name: record.image_file_name,
        };
        inner.rows.insert(id, product.clone());

        Ok(product)
    }

    async fn delete(&self, id: i32) -> Result<()> {
        self.inner.write().await.rows.remove(&id);
        Ok(())
    }

    async fn check_health(&self) -> Result<()> {
        Ok(())
    }
}
