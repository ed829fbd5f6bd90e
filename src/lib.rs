//! Perpus Library Management Server
//!
//! REST JSON API for a small library: user registration with email OTP
//! verification, bearer-token sessions, staff-managed categories and books,
//! profiles and borrowings.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Wire repository and services from a configuration and a pool
    pub fn new(config: AppConfig, pool: sqlx::PgPool) -> AppResult<Self> {
        let redis = services::redis::RedisService::new(&config.redis.url)?;
        let repository = repository::Repository::new(pool);
        let services = services::Services::new(repository, &config, redis);

        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(services),
        })
    }
}
