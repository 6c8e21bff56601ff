//! 인메모리 포트폴리오 저장소.

use std::collections::HashMap;

use async_trait::async_trait;
use compass_core::Portfolio;
use tokio::sync::RwLock;

use super::{portfolio_key, PortfolioStore};
use crate::error::StoreError;

/// 직렬화된 JSON을 메모리에 보관하는 저장소.
///
/// Redis 백엔드와 같은 직렬화 경로를 거치므로 테스트와 로컬 실행에 사용합니다.
#[derive(Debug)]
pub struct InMemoryPortfolioStore {
    key: String,
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryPortfolioStore {
    pub fn new(namespace: &str) -> Self {
        Self {
            key: portfolio_key(namespace),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl PortfolioStore for InMemoryPortfolioStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn load(&self) -> Result<Option<Portfolio>, StoreError> {
        let entries = self.entries.read().await;
        match entries.get(&self.key) {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, portfolio: &Portfolio) -> Result<(), StoreError> {
        let json = serde_json::to_string(portfolio)?;
        self.entries.write().await.insert(self.key.clone(), json);
        Ok(())
    }
}
