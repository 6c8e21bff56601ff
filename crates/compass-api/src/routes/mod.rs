//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/v1/engines` - 엔진 카탈로그와 스코어
//! - `/api/v1/portfolio` - 포트폴리오 조회/저장/요약
//! - `/api/v1/policy` - 주간 액션 정책과 제안 이동

pub mod engines;
pub mod health;
pub mod policy;
pub mod portfolio;

pub use engines::{engines_router, EnginesListResponse, MockQuery, ScoresResponse};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use policy::{policy_router, PolicyQuery, PolicyResponse};
pub use portfolio::{portfolio_router, UpdatePortfolioRequest};

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// `/api/v1` 아래 라우터.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/engines", engines_router())
        .nest("/portfolio", portfolio_router())
        .nest("/policy", policy_router())
}

/// 헬스 체크와 API를 합친 전체 라우터 (상태 미적용).
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .nest("/api/v1", create_api_router())
}
