//! Redis service for revoked token ids

use std::sync::Arc;

use redis::{aio::ConnectionManager, AsyncCommands, Client};
use tokio::sync::OnceCell;

use crate::error::{AppError, AppResult};

/// Clones share one connection manager, opened on first use
#[derive(Clone)]
pub struct RedisService {
    client: Client,
    manager: Arc<OnceCell<ConnectionManager>>,
}

fn revoked_key(jti: &str) -> String {
    format!("revoked_token:{}", jti)
}

impl RedisService {
    /// Create a new Redis service and check the connection
    pub async fn new(url: &str) -> AppResult<Self> {
        let service = Self::from_url(url)?;

        let mut conn = service.get_connection().await?;
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection test failed: {}", e)))?;

        Ok(service)
    }

    /// Create the client without connecting
    pub fn from_url(url: &str) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;
        Ok(Self {
            client,
            manager: Arc::new(OnceCell::new()),
        })
    }

    /// Mark a token id as revoked until the token would have expired
    pub async fn revoke_token(&self, jti: &str, ttl_seconds: u64) -> AppResult<()> {
        let mut conn = self.get_connection().await?;
        conn.set_ex::<_, _, ()>(revoked_key(jti), "1", ttl_seconds.max(1))
            .await?;
        Ok(())
    }

    pub async fn is_token_revoked(&self, jti: &str) -> AppResult<bool> {
        let mut conn = self.get_connection().await?;
        let exists: bool = conn.exists(revoked_key(jti)).await?;
        Ok(exists)
    }

    /// Handle on the shared connection; reconnects by itself after failures
    pub async fn get_connection(&self) -> AppResult<ConnectionManager> {
        let manager = self
            .manager
            .get_or_try_init(|| ConnectionManager::new(self.client.clone()))
            .await
            .map_err(|e| AppError::Internal(format!("Failed to get Redis connection: {}", e)))?;
        Ok(manager.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revoked_key() {
        assert_eq!(revoked_key("abc"), "revoked_token:abc");
    }

    #[test]
    fn test_from_url_rejects_garbage() {
        assert!(RedisService::from_url("not a url").is_err());
        assert!(RedisService::from_url("redis://127.0.0.1:6379").is_ok());
    }

    #[test]
    fn test_clones_share_one_connection_slot() {
        let service = RedisService::from_url("redis://127.0.0.1:6379").unwrap();
        let clone = service.clone();
        assert!(Arc::ptr_eq(&service.manager, &clone.manager));
        assert!(!service.manager.initialized());
    }
}
