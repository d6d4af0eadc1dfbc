use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use http::StatusCode;

use crate::{
    AppState,
    error::{AppError, Result},
    models::Product,
    utils::extractors::extract_product_form,
};

pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state.products.list().await?;

    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>> {
    let product = state.products.get(id).await?;

    Ok(Json(product))
}

pub async fn create_product(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Product>)> {
    let (fields, image) = extract_product_form(multipart).await?.validate()?;
    let image =
        image.ok_or_else(|| AppError::BadRequest("The image file is required".to_string()))?;

    let product = state.products.create(fields, image).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<Product>> {
    let (fields, image) = extract_product_form(multipart).await?.validate()?;

    let product = state.products.update(id, fields, image).await?;

    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    state.products.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
