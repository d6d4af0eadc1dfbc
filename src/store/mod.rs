mod memory;
mod postgres;

use async_trait::async_trait;

use crate::{
    error::Result,
    models::{Product, ProductRecord},
};

pub use memory::MemoryProductStore;
pub use postgres::PgProductStore;

/// Persistence seam for products.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, highest id first.
    async fn find_all(&self) -> Result<Vec<Product>>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>>;

    /// Inserts when `record.id` is `None`, otherwise overwrites the row.
    async fn save(&self, record: ProductRecord) -> Result<Product>;

    async fn delete(&self, id: i32) -> Result<()>;

    async fn check_health(&self) -> Result<()>;
}
