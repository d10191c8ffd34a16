//! Library catalog server
//!
//! Authors, books, libraries and their librarians, exposed as a REST JSON API
//! with role-based access and token authentication.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

/// Open the connection pool and apply pending migrations
pub async fn connect_database(config: &config::DatabaseConfig) -> AppResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect(&config.url)
        .await?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to run database migrations: {}", e)))?;

    tracing::info!("Database migrations completed");

    Ok(pool)
}
