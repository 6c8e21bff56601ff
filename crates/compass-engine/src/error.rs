//! 스코어링 오류 타입.

use compass_core::{CompassError, ValidationError};
use thiserror::Error;

/// 스코어링 오류.
///
/// 잘못된 매크로 입력만이 스코어링을 실패시킬 수 있습니다.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScoringError {
    #[error("매크로 입력 검증 실패: {0}")]
    Validation(#[from] ValidationError),
}

impl From<ScoringError> for CompassError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::Validation(e) => CompassError::Validation(e),
        }
    }
}
