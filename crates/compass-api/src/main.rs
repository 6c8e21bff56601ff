//! Engine Compass API 서버.
//!
//! 설정을 로드하고 매크로 소스와 포트폴리오 저장소를 선택한 뒤
//! axum 서버를 시작합니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::{header, Method, StatusCode};
use axum::Router;
use compass_core::{init_logging, AppConfig, LogConfig, StorageBackend};
use compass_data::{
    InMemoryPortfolioStore, LiveMacroSource, MacroInputSource, MockMacroSource, PortfolioStore,
    RedisPortfolioStore,
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use compass_api::routes::create_router;
use compass_api::state::AppState;

/// CORS 레이어.
///
/// `CORS_ORIGINS`(쉼표 구분)가 있으면 해당 origin만 허용하고,
/// 없으면 개발 모드로 모든 origin을 허용합니다.
fn cors_layer() -> CorsLayer {
    let allow_origin = match std::env::var("CORS_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
                AllowOrigin::any()
            } else {
                info!("CORS configured with {} allowed origins", origins.len());
                AllowOrigin::list(origins)
            }
        }
        _ => {
            warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// 설정에 따른 매크로 입력 소스.
///
/// 목 모드이거나 FRED 키가 없으면 목 소스를 씁니다.
fn build_source(config: &AppConfig) -> anyhow::Result<Arc<dyn MacroInputSource>> {
    let has_key = config
        .data
        .fred_api_key
        .as_deref()
        .is_some_and(|k| !k.trim().is_empty());

    if config.data.use_mock || !has_key {
        if !config.data.use_mock {
            warn!("FRED API key not configured, serving mock macro inputs");
        }
        return Ok(Arc::new(MockMacroSource));
    }

    let source = LiveMacroSource::new(&config.data, config.fallback.clone())
        .context("failed to build live macro source")?;
    Ok(Arc::new(source))
}

/// 설정에 따른 포트폴리오 저장소.
async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn PortfolioStore>> {
    let namespace = &config.storage.namespace;
    match config.storage.backend {
        StorageBackend::Memory => {
            warn!("Using in-memory portfolio store, data is lost on restart");
            Ok(Arc::new(InMemoryPortfolioStore::new(namespace)))
        }
        StorageBackend::Redis => {
            let store = RedisPortfolioStore::connect(&config.storage.redis_url, namespace)
                .await
                .context("failed to connect to Redis")?;
            Ok(Arc::new(store))
        }
    }
}

fn create_app(state: Arc<AppState>, request_timeout: Duration) -> Router {
    create_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout))
        .layer(cors_layer())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let config = AppConfig::load_default().context("failed to load configuration")?;

    init_logging(LogConfig::from_app_config(&config.logging))
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let source = build_source(&config)?;
    let store = build_store(&config).await?;
    info!(
        source = source.name(),
        store = store.backend(),
        key = %config.portfolio_key(),
        "Dependencies ready"
    );

    let state = Arc::new(AppState::new(
        source,
        store,
        Duration::from_secs(config.data.refresh_interval_secs),
    ));

    // 백그라운드 태스크 종료용 토큰
    let shutdown_token = CancellationToken::new();
    let refresh_handle = state.start_refresh(shutdown_token.clone());

    let app = create_app(
        state,
        Duration::from_secs(config.server.request_timeout_secs),
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server address")?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_token.clone()))
        .await?;

    info!("Server shutdown initiated, cleaning up...");
    shutdown_token.cancel();

    if let Some(handle) = refresh_handle {
        if tokio::time::timeout(Duration::from_secs(10), handle).await.is_err() {
            warn!("Refresh task did not stop in time");
        }
    }

    info!("Server stopped gracefully");
    Ok(())
}

/// Ctrl+C 또는 SIGTERM을 기다린 뒤 종료 토큰을 취소합니다.
async fn shutdown_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => warn!("Received SIGTERM, initiating graceful shutdown..."),
    }

    shutdown_token.cancel();
}
