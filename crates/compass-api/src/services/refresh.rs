//! 매크로 입력 갱신 서비스.
//!
//! 주기적으로 소스를 조회해 `AppState`의 스냅샷을 교체합니다.
//! 실패하면 직전 스냅샷을 그대로 둡니다.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::state::AppState;

/// 매크로 입력 갱신 서비스.
pub struct RefreshService {
    state: Arc<AppState>,
    interval: Duration,
}

impl RefreshService {
    pub fn new(state: Arc<AppState>, interval: Duration) -> Self {
        Self { state, interval }
    }

    /// 메인 루프. 첫 틱은 즉시 실행됩니다.
    pub async fn run(self, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            source = self.state.source.name(),
            interval_secs = self.interval.as_secs(),
            "매크로 갱신 서비스 시작"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => self.refresh_once().await,

                _ = shutdown.cancelled() => {
                    info!("매크로 갱신 서비스 종료");
                    break;
                }
            }
        }
    }

    async fn refresh_once(&self) {
        match self.state.refresh_snapshot().await {
            Ok(snapshot) => info!(
                fallback_fields = snapshot.fetch.fallback_fields.len(),
                vix = snapshot.fetch.inputs.vix,
                "매크로 입력 갱신 완료"
            ),
            Err(e) => error!(error = %e, "매크로 입력 갱신 실패, 직전 스냅샷 유지"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use compass_data::{
        mock_macro_inputs, InMemoryPortfolioStore, MacroFetch, MacroInputSource,
        UpstreamFetchError,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 호출 횟수를 세는 라이브 소스.
    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MacroInputSource for CountingSource {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn fetch_macro_inputs(&self) -> Result<MacroFetch, UpstreamFetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(MacroFetch::complete(mock_macro_inputs()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_fills_snapshot_and_stops_on_cancel() {
        let source = Arc::new(CountingSource::default());
        let state = Arc::new(AppState::new(
            source.clone(),
            Arc::new(InMemoryPortfolioStore::new("t")),
            Duration::from_secs(60),
        ));
        let shutdown = CancellationToken::new();
        let handle = state.start_refresh(shutdown.clone()).unwrap();

        tokio::time::sleep(Duration::from_secs(125)).await;
        assert!(state.snapshot.read().await.is_some());
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);

        shutdown.cancel();
        handle.await.unwrap();
    }
}
