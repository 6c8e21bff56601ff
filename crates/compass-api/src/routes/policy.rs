//! 주간 액션 정책 엔드포인트.
//!
//! `GET /api/v1/policy?mock=bool&breadth=confirming|diverging&creditMicrostress=GREEN|YELLOW|RED`
//!
//! BTC 추세 확인 신호는 매크로 입력에서 가져오고, 나머지 확인 신호는
//! 쿼리로 받습니다. 빠진 신호는 해당 규칙만 건너뜁니다.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use compass_core::{AlertLevel, BreadthSignal, Confirmations, MacroState};
use compass_engine::{
    build_action_policy, compute_suggested_moves, compute_summary, macro_state, ActionPolicy,
    SuggestedMoves,
};
use serde::{Deserialize, Serialize};

use crate::error::{store_error, ApiResult};
use crate::routes::engines::score_or_mock;
use crate::state::AppState;

/// 정책 쿼리.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyQuery {
    #[serde(default)]
    pub mock: bool,
    pub breadth: Option<BreadthSignal>,
    pub credit_microstress: Option<AlertLevel>,
}

/// 정책 응답.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyResponse {
    pub macro_state: MacroState,
    pub policy: ActionPolicy,
    pub suggested_moves: SuggestedMoves,
    pub used_mock_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /api/v1/policy
pub async fn get_policy(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PolicyQuery>,
) -> ApiResult<Json<PolicyResponse>> {
    let scored = score_or_mock(state.resolve_inputs(query.mock).await)?;
    let scoring = &scored.scoring;

    let macro_state = macro_state(&scored.inputs);
    let confirmations = Confirmations {
        breadth: query.breadth,
        btc_trend: Some(scored.inputs.btc_trend),
        credit_microstress: query.credit_microstress,
    };

    let policy = build_action_policy(&macro_state, &scoring.engine_scores, &confirmations);

    let portfolio = state.load_portfolio().await.map_err(store_error)?;
    let summary = compute_summary(&portfolio, &portfolio.targets());
    let suggested_moves = compute_suggested_moves(
        &summary.engine_deltas,
        &macro_state,
        &scoring.engine_scores,
        &confirmations,
    );

    Ok(Json(PolicyResponse {
        macro_state,
        policy,
        suggested_moves,
        used_mock_data: scored.used_mock,
        error: scored.error,
    }))
}

/// 정책 라우터.
pub fn policy_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(get_policy))
}
