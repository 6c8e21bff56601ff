//! Redis 포트폴리오 저장소.

use std::sync::Arc;

use async_trait::async_trait;
use compass_core::Portfolio;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use tokio::sync::RwLock;
use tracing::info;

use super::{portfolio_key, PortfolioStore};
use crate::error::StoreError;

/// Redis 단일 키 저장소.
#[derive(Clone)]
pub struct RedisPortfolioStore {
    key: String,
    connection: Arc<RwLock<MultiplexedConnection>>,
}

impl RedisPortfolioStore {
    /// Redis에 연결합니다.
    pub async fn connect(url: &str, namespace: &str) -> Result<Self, StoreError> {
        info!("Redis 연결 중...");

        let client = Client::open(url)?;
        let connection = client.get_multiplexed_async_connection().await?;

        info!("Redis 연결 완료");

        Ok(Self {
            key: portfolio_key(namespace),
            connection: Arc::new(RwLock::new(connection)),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl PortfolioStore for RedisPortfolioStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn load(&self) -> Result<Option<Portfolio>, StoreError> {
        let mut conn = self.connection.write().await;
        let value: Option<String> = conn.get(&self.key).await?;

        match value {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, portfolio: &Portfolio) -> Result<(), StoreError> {
        let json = serde_json::to_string(portfolio)?;
        let mut conn = self.connection.write().await;
        let _: () = conn.set(&self.key, json).await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        let mut conn = self.connection.write().await;
        let pong: String = redis::cmd("PING").query_async(&mut *conn).await?;
        Ok(pong == "PONG")
    }
}
