//! 포트폴리오 저장소.
//!
//! 단일 네임스페이스 키(`{namespace}:portfolio:v1`)에 포트폴리오 JSON을 저장합니다.
//! 읽은 뒤 쓰는 방식이며 동시성 제어는 하지 않습니다.

mod memory;
mod redis;

pub use self::memory::InMemoryPortfolioStore;
pub use self::redis::RedisPortfolioStore;

use async_trait::async_trait;
use compass_core::Portfolio;

use crate::error::StoreError;

/// 저장소 키.
pub fn portfolio_key(namespace: &str) -> String {
    format!("{}:portfolio:v1", namespace)
}

/// 포트폴리오 저장소 트레잇.
#[async_trait]
pub trait PortfolioStore: Send + Sync {
    /// 백엔드 이름.
    fn backend(&self) -> &'static str;

    /// 저장된 포트폴리오. 없으면 `None`.
    async fn load(&self) -> Result<Option<Portfolio>, StoreError>;

    /// 포트폴리오 저장 (덮어쓰기).
    async fn save(&self, portfolio: &Portfolio) -> Result<(), StoreError>;

    /// 백엔드 상태 확인.
    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
