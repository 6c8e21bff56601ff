//! 통합 API 에러 응답 타입.
//!
//! 모든 엔드포인트가 같은 에러 형식을 사용합니다.
//!
//! ```json
//! {
//!   "code": "ENGINE_NOT_FOUND",
//!   "message": "엔진을 찾을 수 없습니다: rockets",
//!   "timestamp": 1738300800
//! }
//! ```

use axum::http::StatusCode;
use axum::Json;
use compass_core::{CompassError, ValidationError};
use compass_data::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 통합 API 에러 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "ENGINE_NOT_FOUND", "VALIDATION_ERROR")
    pub code: String,
    /// 사람이 읽을 수 있는 메시지
    pub message: String,
    /// 추가 상세 정보
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Unix timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 타임스탬프 포함 에러 생성.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(code: impl Into<String>, message: impl Into<String>, details: Value) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// 핸들러 Result 타입.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;

/// 404 응답.
pub fn not_found(code: &str, message: impl Into<String>) -> (StatusCode, Json<ApiErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ApiErrorResponse::new(code, message)))
}

/// 도메인 에러를 HTTP 상태와 에러 코드로 변환합니다.
pub fn compass_error(err: CompassError) -> (StatusCode, Json<ApiErrorResponse>) {
    let (status, code) = match &err {
        CompassError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        CompassError::Classification(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "CLASSIFICATION_UNCERTAIN")
        }
        CompassError::UpstreamFetch(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_FETCH_ERROR"),
        CompassError::PolicyInputIncomplete(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "POLICY_INPUT_INCOMPLETE")
        }
        CompassError::Storage(_) => (StatusCode::SERVICE_UNAVAILABLE, "STORAGE_ERROR"),
        CompassError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
        CompassError::Serialization(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "SERIALIZATION_ERROR")
        }
    };

    if status.is_server_error() {
        tracing::error!(code, error = %err, "요청 처리 실패");
    }

    let body = match &err {
        CompassError::Validation(v) => ApiErrorResponse::with_details(
            code,
            err.to_string(),
            serde_json::json!({ "field": v.field, "reason": v.reason }),
        ),
        _ => ApiErrorResponse::new(code, err.to_string()),
    };
    (status, Json(body))
}

/// 400 검증 에러 응답. 필드와 사유를 `details`에 담습니다.
pub fn validation_error(err: ValidationError) -> (StatusCode, Json<ApiErrorResponse>) {
    compass_error(err.into())
}

/// 저장소 에러 응답.
pub fn store_error(err: StoreError) -> (StatusCode, Json<ApiErrorResponse>) {
    compass_error(err.into())
}
