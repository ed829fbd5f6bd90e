//! Business logic services

pub mod borrowings;
pub mod catalog;
pub mod email;
pub mod redis;
pub mod users;

use crate::{
    config::{AppConfig, BorrowingConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub catalog: catalog::CatalogService,
    pub borrowings: borrowings::BorrowingsService,
    pub email: email::EmailService,
    pub redis: redis::RedisService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig, redis_service: redis::RedisService) -> Self {
        let email = email::EmailService::new(config.email.clone());
        let borrowing_config: BorrowingConfig = config.borrowing.clone();

        Self {
            users: users::UsersService::new(
                repository.clone(),
                config.auth.clone(),
                email.clone(),
                redis_service.clone(),
            ),
            catalog: catalog::CatalogService::new(repository.clone()),
            borrowings: borrowings::BorrowingsService::new(repository.clone(), borrowing_config),
            email,
            redis: redis_service,
            repository,
        }
    }
}
