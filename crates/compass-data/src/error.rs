//! 데이터 계층 오류 타입.

use compass_core::{CompassError, ValidationError};
use thiserror::Error;

/// 외부 데이터 조회 오류.
///
/// 호출자는 이 오류를 받으면 목 데이터로 대체하고 응답에 표시합니다.
#[derive(Debug, Error)]
pub enum UpstreamFetchError {
    /// HTTP 전송 실패 (연결, 타임아웃)
    #[error("HTTP 요청 실패 ({source_name}): {message}")]
    Http { source_name: String, message: String },

    /// 비정상 상태 코드
    #[error("API 응답 오류 ({source_name}): HTTP {status}")]
    Status { source_name: String, status: u16 },

    /// 응답 파싱 실패
    #[error("응답 파싱 실패 ({source_name}): {message}")]
    Parse { source_name: String, message: String },

    /// FRED API 키 미설정
    #[error("FRED API 키가 설정되지 않았습니다")]
    MissingApiKey,

    /// 관측값 없음
    #[error("데이터 없음: {0}")]
    NoData(String),

    /// 조합된 레코드가 검증을 통과하지 못함
    #[error("조회된 매크로 입력이 유효하지 않음: {0}")]
    InvalidRecord(#[from] ValidationError),
}

impl UpstreamFetchError {
    pub(crate) fn http(source_name: &str, err: reqwest::Error) -> Self {
        Self::Http {
            source_name: source_name.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn parse(source_name: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            source_name: source_name.to_string(),
            message: message.into(),
        }
    }
}

impl From<UpstreamFetchError> for CompassError {
    fn from(err: UpstreamFetchError) -> Self {
        CompassError::UpstreamFetch(err.to_string())
    }
}

/// 포트폴리오 저장소 오류.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 백엔드 연결/명령 실패
    #[error("저장소 백엔드 오류: {0}")]
    Backend(String),

    /// 직렬화/역직렬화 실패
    #[error("저장소 직렬화 오류: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<StoreError> for CompassError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Serialization(e) => CompassError::Serialization(e.to_string()),
            other => CompassError::Storage(other.to_string()),
        }
    }
}
