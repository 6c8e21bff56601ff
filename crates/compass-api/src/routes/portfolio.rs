//! 포트폴리오 엔드포인트.
//!
//! - `GET /api/v1/portfolio` - 저장된 포트폴리오 (없으면 데모 기본값)
//! - `PUT /api/v1/portfolio` - 검증 후 저장
//! - `GET /api/v1/portfolio/summary` - 엔진/레이어 델타 요약

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use compass_core::{EngineId, Holding, Portfolio, TargetBand};
use compass_engine::{compute_summary, PortfolioSummary};
use serde::Deserialize;
use tracing::info;

use crate::error::{store_error, validation_error, ApiResult};
use crate::state::AppState;

/// 포트폴리오 저장 요청. `updatedAt`은 서버가 기록합니다.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePortfolioRequest {
    #[serde(default)]
    pub holdings: Vec<Holding>,
    #[serde(default)]
    pub custom_targets: Option<BTreeMap<EngineId, TargetBand>>,
    #[serde(default)]
    pub use_demo_holdings: bool,
}

impl From<UpdatePortfolioRequest> for Portfolio {
    fn from(req: UpdatePortfolioRequest) -> Self {
        Portfolio {
            holdings: req.holdings,
            custom_targets: req.custom_targets,
            use_demo_holdings: req.use_demo_holdings,
            updated_at: Utc::now(),
        }
    }
}

/// GET /api/v1/portfolio
pub async fn get_portfolio(State(state): State<Arc<AppState>>) -> ApiResult<Json<Portfolio>> {
    let portfolio = state.load_portfolio().await.map_err(store_error)?;
    Ok(Json(portfolio))
}

/// PUT /api/v1/portfolio
///
/// 비중 합계가 100이 아니어도 저장합니다. 유효성은 요약의 `isValid`로 드러납니다.
pub async fn put_portfolio(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdatePortfolioRequest>,
) -> ApiResult<Json<Portfolio>> {
    let portfolio = Portfolio::from(request);
    portfolio.validate().map_err(validation_error)?;

    state.store.save(&portfolio).await.map_err(store_error)?;
    info!(
        holdings = portfolio.holdings.len(),
        demo = portfolio.use_demo_holdings,
        backend = state.store.backend(),
        "포트폴리오 저장"
    );
    Ok(Json(portfolio))
}

/// GET /api/v1/portfolio/summary
pub async fn get_summary(State(state): State<Arc<AppState>>) -> ApiResult<Json<PortfolioSummary>> {
    let portfolio = state.load_portfolio().await.map_err(store_error)?;
    Ok(Json(compute_summary(&portfolio, &portfolio.targets())))
}

/// 포트폴리오 라우터.
pub fn portfolio_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_portfolio).put(put_portfolio))
        .route("/summary", get(get_summary))
}
