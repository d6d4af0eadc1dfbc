use sqlx::PgPool;

use crate::{
    error::Result,
    models::{Product, ProductRecord},
};

pub async fn find_all(pool: &PgPool) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY id DESC")
        .fetch_all(pool)
        .await?;

    Ok(products)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

pub async fn create_product(pool: &PgPool, record: &ProductRecord) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (
            name, brand, category, price, description, created_at, image_file_name
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(&record.name)
    .bind(&record.brand)
    .bind(&record.category)
    .bind(record.price)
    .bind(&record.description)
    .bind(record.created_at)
    .bind(&record.image_file_name)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

/// Overwrites every mutable column. `created_at` is never touched.
pub async fn update_product(pool: &PgPool, id: i32, record: &ProductRecord) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        UPDATE products
        SET
            name = $1,
            brand = $2,
            category = $3,
            price = $4,
            description = $5,
            image_file_name = $6
        WHERE id = $7
        RETURNING *
        "#,
    )
    .bind(&record.name)
    .bind(&record.brand)
    .bind(&record.category)
    .bind(record.price)
    .bind(&record.description)
    .bind(&record.image_file_name)
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

pub async fn delete_product(pool: &PgPool, id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
