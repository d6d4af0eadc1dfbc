use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::{
    config::{AppConfig, StoreBackend},
    database,
    error::{AppError, Result},
    routes,
    services::{image_storage::ImageStorage, product_service::ProductService},
    store::{MemoryProductStore, PgProductStore, ProductStore},
};

#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    let store: Arc<dyn ProductStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let pool = database::create_pool(&config.database).await?;
            Arc::new(PgProductStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory product store, data will not survive a restart");
            Arc::new(MemoryProductStore::new())
        }
    };

    tokio::fs::create_dir_all(&config.storage.upload_dir).await?;
    tracing::info!(
        "Serving product images from {}",
        config.storage.upload_dir.display()
    );

    let storage = ImageStorage::new(config.storage.upload_dir.clone());
    let state = AppState {
        products: ProductService::new(store, storage),
    };

    let allowed_origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| AppError::ConfigError(format!("Invalid CORS origin: {}", origin)))
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_origin(allowed_origins);

    let app = router(state)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(cors);

    Ok(app)
}

/// Routes plus static serving of the image directory under `/images`.
pub fn router(state: AppState) -> Router {
    let images = ServeDir::new(state.products.storage().dir());

    routes::create_router()
        .nest_service("/images", images)
        .with_state(state)
}
