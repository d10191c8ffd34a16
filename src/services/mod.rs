//! Business logic services

pub mod catalog;
pub mod queries;
pub mod redis;
pub mod users;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub catalog: catalog::CatalogService,
    pub queries: queries::QueryService,
    pub users: users::UsersService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        redis_service: redis::RedisService,
    ) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            queries: queries::QueryService::new(repository.clone()),
            users: users::UsersService::new(repository.clone(), auth_config, redis_service),
            repository,
        }
    }
}
