//! 매크로 대시보드의 에러 타입.
//!
//! 이 모듈은 시스템 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 입력 검증 실패.
///
/// 매크로 입력 레코드의 특정 필드가 누락되었거나 범위를 벗어났을 때 발생합니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    /// 문제가 된 필드 이름 (camelCase, 와이어 형식 기준)
    pub field: String,
    /// 사람이 읽을 수 있는 사유
    pub reason: String,
}

impl ValidationError {
    /// 새 검증 에러 생성.
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum CompassError {
    /// 잘못되거나 누락된 매크로 입력
    #[error("검증 에러: {0}")]
    Validation(#[from] ValidationError),

    /// 분류 불확실 (정적 테이블에 없는 티커)
    #[error("분류 불확실: {0}")]
    Classification(String),

    /// 외부 데이터 소스 조회 실패
    #[error("업스트림 조회 에러: {0}")]
    UpstreamFetch(String),

    /// 선택적 확인 신호 누락
    #[error("정책 입력 불완전: {0}")]
    PolicyInputIncomplete(String),

    /// 저장소 에러
    #[error("저장소 에러: {0}")]
    Storage(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 핵심 작업을 위한 Result 타입.
pub type CompassResult<T> = Result<T, CompassError>;

impl CompassError {
    /// 치명적인 에러인지 확인합니다.
    ///
    /// 잘못된 매크로 입력만 호출자가 처리해야 하는 하드 실패이며,
    /// 나머지는 결과를 저하시킬 뿐 파이프라인을 멈추지 않습니다.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CompassError::Validation(_) | CompassError::Config(_))
    }

    /// 목 데이터로 대체 가능한 에러인지 확인합니다.
    pub fn is_recoverable_with_mock(&self) -> bool {
        matches!(
            self,
            CompassError::UpstreamFetch(_) | CompassError::Validation(_)
        )
    }
}

impl From<serde_json::Error> for CompassError {
    fn from(err: serde_json::Error) -> Self {
        CompassError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("hyOAS", "must be finite");
        assert_eq!(err.to_string(), "hyOAS: must be finite");
    }

    #[test]
    fn test_error_fatal() {
        let err: CompassError = ValidationError::new("vix", "negative").into();
        assert!(err.is_fatal());

        let err = CompassError::PolicyInputIncomplete("breadth".to_string());
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_error_recoverable_with_mock() {
        assert!(CompassError::UpstreamFetch("timeout".to_string()).is_recoverable_with_mock());
        assert!(!CompassError::Storage("redis down".to_string()).is_recoverable_with_mock());
    }
}
