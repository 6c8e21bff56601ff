//! 엔진 카탈로그와 스코어링 엔드포인트.
//!
//! - `GET /api/v1/engines` - 카탈로그
//! - `GET /api/v1/engines/{id}` - 단일 엔진
//! - `GET /api/v1/engines/scores?mock=bool` - 현재 매크로 입력으로 스코어링

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use compass_core::{get_engine, list_engines, Engine, MacroInputs};
use compass_data::mock_macro_inputs;
use compass_engine::{score_all_engines, ScoringOutput};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{compass_error, not_found, ApiResult};
use crate::state::{AppState, ResolvedInputs};

/// `mock` 쿼리 파라미터.
#[derive(Debug, Default, Deserialize)]
pub struct MockQuery {
    #[serde(default)]
    pub mock: bool,
}

/// 카탈로그 응답.
#[derive(Debug, Serialize)]
pub struct EnginesListResponse {
    pub engines: &'static [Engine],
    pub total: usize,
}

/// 스코어링 응답.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoresResponse {
    pub success: bool,
    pub data: ScoringOutput,
    pub macro_inputs: MacroInputs,
    /// 대체 상수로 채워진 입력 필드
    pub fallback_fields: Vec<String>,
    pub used_mock_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /api/v1/engines
pub async fn list_engines_handler() -> Json<EnginesListResponse> {
    let engines = list_engines();
    Json(EnginesListResponse {
        engines,
        total: engines.len(),
    })
}

/// GET /api/v1/engines/{id}
pub async fn get_engine_handler(Path(id): Path<String>) -> ApiResult<Json<&'static Engine>> {
    get_engine(&id)
        .map(Json)
        .ok_or_else(|| not_found("ENGINE_NOT_FOUND", format!("엔진을 찾을 수 없습니다: {}", id)))
}

/// 스코어링까지 마친 매크로 입력.
pub(crate) struct ScoredInputs {
    pub inputs: MacroInputs,
    pub fallback_fields: Vec<String>,
    pub scoring: ScoringOutput,
    pub used_mock: bool,
    /// 스코어링 실패로 목 입력을 다시 스코어링했는지 여부
    pub scoring_fallback: bool,
    pub error: Option<String>,
}

/// 입력을 스코어링하고, 실패하면 목 입력으로 다시 스코어링합니다.
pub(crate) fn score_or_mock(resolved: ResolvedInputs) -> ApiResult<ScoredInputs> {
    match score_all_engines(&resolved.fetch.inputs) {
        Ok(scoring) => Ok(ScoredInputs {
            inputs: resolved.fetch.inputs,
            fallback_fields: resolved.fetch.fallback_fields,
            scoring,
            used_mock: resolved.used_mock,
            scoring_fallback: false,
            error: resolved.error,
        }),
        Err(e) => {
            warn!(error = %e, "스코어링 실패, 목 입력으로 대체");
            let inputs = mock_macro_inputs();
            let scoring = score_all_engines(&inputs).map_err(|e| compass_error(e.into()))?;
            Ok(ScoredInputs {
                inputs,
                fallback_fields: Vec::new(),
                scoring,
                used_mock: true,
                scoring_fallback: true,
                error: Some(e.to_string()),
            })
        }
    }
}

/// GET /api/v1/engines/scores
///
/// 입력 조회가 실패하면 `usedMockData`와 `error`로 알리고, 스코어링이
/// 실패해 목 입력으로 다시 스코어링한 경우에만 `fallback: true`를 붙입니다.
pub async fn scores_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MockQuery>,
) -> ApiResult<Json<ScoresResponse>> {
    let scored = score_or_mock(state.resolve_inputs(query.mock).await)?;

    Ok(Json(ScoresResponse {
        success: true,
        data: scored.scoring,
        macro_inputs: scored.inputs,
        fallback_fields: scored.fallback_fields,
        used_mock_data: scored.used_mock,
        fallback: scored.scoring_fallback.then_some(true),
        error: scored.error,
    }))
}

/// 엔진 라우터.
pub fn engines_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_engines_handler))
        .route("/scores", get(scores_handler))
        .route("/{id}", get(get_engine_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_unknown_engine_is_not_found() {
        let (status, Json(body)) = get_engine_handler(Path("rockets".to_string()))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "ENGINE_NOT_FOUND");
    }

    #[test]
    fn test_invalid_inputs_fall_back_to_mock_scoring() {
        let mut inputs = mock_macro_inputs();
        inputs.vix = f64::NAN;
        let resolved = ResolvedInputs {
            fetch: compass_data::MacroFetch::complete(inputs),
            used_mock: false,
            error: None,
        };

        let scored = score_or_mock(resolved).unwrap();
        assert!(scored.used_mock);
        assert!(scored.scoring_fallback);
        assert!(scored.error.is_some());
        assert_eq!(scored.inputs, mock_macro_inputs());
    }

    #[test]
    fn test_fetch_failure_is_not_a_scoring_fallback() {
        let resolved = ResolvedInputs {
            fetch: compass_data::MacroFetch::complete(mock_macro_inputs()),
            used_mock: true,
            error: Some("FRED_API_KEY 없음".to_string()),
        };

        let scored = score_or_mock(resolved).unwrap();
        assert!(scored.used_mock);
        assert!(!scored.scoring_fallback);
        assert_eq!(scored.error.as_deref(), Some("FRED_API_KEY 없음"));
    }

    /// 항상 실패하는 라이브 소스.
    struct FailingSource;

    #[async_trait::async_trait]
    impl compass_data::MacroInputSource for FailingSource {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn fetch_macro_inputs(
            &self,
        ) -> Result<compass_data::MacroFetch, compass_data::UpstreamFetchError> {
            Err(compass_data::UpstreamFetchError::MissingApiKey)
        }
    }

    #[tokio::test]
    async fn test_scores_on_failed_fetch_omit_fallback() {
        let state = Arc::new(AppState::new(
            Arc::new(FailingSource),
            Arc::new(compass_data::InMemoryPortfolioStore::new("t")),
            std::time::Duration::from_secs(60),
        ));

        let Json(response) = scores_handler(State(state), Query(MockQuery::default()))
            .await
            .unwrap();
        assert!(response.used_mock_data);
        assert!(response.error.is_some());
        assert!(response.fallback.is_none());
    }

    #[tokio::test]
    async fn test_list_has_twelve_engines() {
        let Json(response) = list_engines_handler().await;
        assert_eq!(response.total, 12);
    }
}
