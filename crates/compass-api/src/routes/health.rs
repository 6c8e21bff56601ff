//! 헬스 체크 엔드포인트.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// 헬스 체크 응답.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// "healthy" | "degraded"
    pub status: String,
    pub version: String,
    pub uptime_secs: i64,
    pub timestamp: String,
    pub components: ComponentHealth,
}

/// 개별 컴포넌트 상태.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentHealth {
    pub storage: ComponentStatus,
    pub macro_source: ComponentStatus,
}

/// 컴포넌트 상태.
#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentStatus {
    /// "up" | "down" | "stale"
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentStatus {
    fn new(status: &str, message: impl Into<String>) -> Self {
        Self {
            status: status.to_string(),
            message: Some(message.into()),
        }
    }
}

/// liveness probe. GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// readiness probe. GET /health/ready
///
/// 저장소가 응답하지 않으면 503. 라이브 소스 스냅샷이 아직 없으면
/// degraded이지만 요청은 목 데이터로 처리할 수 있으므로 200입니다.
pub async fn health_ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut overall = "healthy";
    let mut status_code = StatusCode::OK;

    let backend = state.store.backend();
    let storage = match state.store.health_check().await {
        Ok(true) => ComponentStatus::new("up", backend),
        Ok(false) | Err(_) => {
            overall = "degraded";
            status_code = StatusCode::SERVICE_UNAVAILABLE;
            ComponentStatus::new("down", format!("{} 연결 실패", backend))
        }
    };

    let source_name = state.source.name();
    let macro_source = if state.source.is_mock() {
        ComponentStatus::new("up", source_name)
    } else {
        match state.snapshot.read().await.as_ref() {
            Some(snapshot) => ComponentStatus::new(
                "up",
                format!("{} (fetched {})", source_name, snapshot.fetched_at.to_rfc3339()),
            ),
            None => {
                overall = "degraded";
                ComponentStatus::new("stale", format!("{}: 스냅샷 없음", source_name))
            }
        }
    };

    let response = HealthResponse {
        status: overall.to_string(),
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        components: ComponentHealth {
            storage,
            macro_source,
        },
    };

    (status_code, Json(response))
}

/// 헬스 체크 라우터.
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health_check))
        .route("/ready", get(health_ready))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_ready_with_mock_state() {
        use crate::state::create_test_state;

        let app = Router::new()
            .nest("/health", health_router())
            .with_state(Arc::new(create_test_state()));

        let response = app
            .oneshot(Request::builder().uri("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.components.storage.status, "up");
    }
}
