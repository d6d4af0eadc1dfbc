use async_trait::async_trait;
use sqlx::PgPool;

use super::ProductStore;
use crate::{
    database,
    error::Result,
    models::{Product, ProductRecord},
    queries::product_queries,
};

#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn find_all(&self) -> Result<Vec<Product>> {
        product_queries::find_all(&self.pool).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>> {
        product_queries::find_by_id(&self.pool, id).await
    }

    async fn save(&self, record: ProductRecord) -> Result<Product> {
        match record.id {
            Some(id) => product_queries::update_product(&self.pool, id, &record).await,
            None => product_queries::create_product(&self.pool, &record).await,
        }
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let deleted = product_queries::delete_product(&self.pool, id).await?;
        if deleted == 0 {
            tracing::warn!("Product {} was already gone when deleting", id);
        }
        Ok(())
    }

    async fn check_health(&self) -> Result<()> {
        database::check_health(&self.pool).await
    }
}
