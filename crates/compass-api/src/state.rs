//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! `AppState`는 `main`에서 한 번 생성되어 `Arc`로 공유됩니다.
//! 전역 싱글턴 없이 소스와 저장소를 트레잇 객체로 주입합니다.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use compass_core::Portfolio;
use compass_data::{
    mock_macro_inputs, InMemoryPortfolioStore, MacroFetch, MacroInputSource, MockMacroSource,
    PortfolioStore, StoreError, UpstreamFetchError,
};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::services::refresh::RefreshService;

/// 마지막으로 성공한 매크로 입력 조회.
#[derive(Debug, Clone)]
pub struct MacroSnapshot {
    pub fetch: MacroFetch,
    pub fetched_at: DateTime<Utc>,
}

/// 요청 하나에 사용할 매크로 입력.
#[derive(Debug, Clone)]
pub struct ResolvedInputs {
    pub fetch: MacroFetch,
    /// 목 데이터를 사용했는지 여부
    pub used_mock: bool,
    /// 라이브 조회가 실패해 목으로 대체한 경우의 사유
    pub error: Option<String>,
}

impl ResolvedInputs {
    fn mock(error: Option<String>) -> Self {
        Self {
            fetch: MacroFetch::complete(mock_macro_inputs()),
            used_mock: true,
            error,
        }
    }
}

/// 애플리케이션 공유 상태.
pub struct AppState {
    /// 매크로 입력 소스 (라이브 또는 목)
    pub source: Arc<dyn MacroInputSource>,

    /// 포트폴리오 저장소
    pub store: Arc<dyn PortfolioStore>,

    /// 백그라운드 갱신 태스크가 채우는 최근 스냅샷
    pub snapshot: RwLock<Option<MacroSnapshot>>,

    /// 백그라운드 갱신 주기
    pub refresh_interval: Duration,

    /// API 버전
    pub version: String,

    /// 서버 시작 시각
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        source: Arc<dyn MacroInputSource>,
        store: Arc<dyn PortfolioStore>,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            source,
            store,
            snapshot: RwLock::new(None),
            refresh_interval,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: Utc::now(),
        }
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }

    /// 소스에서 새로 조회해 스냅샷을 교체합니다.
    ///
    /// 실패하면 기존 스냅샷을 유지합니다.
    pub async fn refresh_snapshot(&self) -> Result<MacroSnapshot, UpstreamFetchError> {
        let fetch = self.source.fetch_macro_inputs().await?;
        let snapshot = MacroSnapshot {
            fetch,
            fetched_at: Utc::now(),
        };
        *self.snapshot.write().await = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// 요청에 사용할 매크로 입력 결정.
    ///
    /// `force_mock`이거나 소스가 목이면 목 입력을 씁니다. 그 외에는
    /// 스냅샷을 우선 사용하고, 없으면 즉시 조회합니다. 조회 실패 시
    /// 목 입력으로 대체하고 사유를 함께 돌려줍니다.
    pub async fn resolve_inputs(&self, force_mock: bool) -> ResolvedInputs {
        if force_mock || self.source.is_mock() {
            return ResolvedInputs::mock(None);
        }

        if let Some(snapshot) = self.snapshot.read().await.as_ref() {
            return ResolvedInputs {
                fetch: snapshot.fetch.clone(),
                used_mock: false,
                error: None,
            };
        }

        match self.refresh_snapshot().await {
            Ok(snapshot) => ResolvedInputs {
                fetch: snapshot.fetch,
                used_mock: false,
                error: None,
            },
            Err(e) => {
                warn!(source = self.source.name(), error = %e, "매크로 입력 조회 실패, 목 데이터로 대체");
                ResolvedInputs::mock(Some(e.to_string()))
            }
        }
    }

    /// 저장된 포트폴리오. 없으면 데모 보유 종목을 쓰는 기본값.
    pub async fn load_portfolio(&self) -> Result<Portfolio, StoreError> {
        Ok(self.store.load().await?.unwrap_or_default())
    }

    /// 백그라운드 갱신 태스크 시작.
    ///
    /// 목 소스에는 갱신할 것이 없으므로 `None`을 돌려줍니다.
    pub fn start_refresh(self: &Arc<Self>, shutdown: CancellationToken) -> Option<JoinHandle<()>> {
        if self.source.is_mock() {
            return None;
        }
        let service = RefreshService::new(Arc::clone(self), self.refresh_interval);
        Some(tokio::spawn(service.run(shutdown)))
    }
}

/// 테스트용 상태 (목 소스, 메모리 저장소).
pub fn create_test_state() -> AppState {
    AppState::new(
        Arc::new(MockMacroSource),
        Arc::new(InMemoryPortfolioStore::new("engine-compass-test")),
        Duration::from_secs(300),
    )
}
