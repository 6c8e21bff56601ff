//! 엔진 스코어 결과 타입.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::engine::EngineId;

/// 엔진 비중 의견.
///
/// - **Overweight**: 점수 >= 65
/// - **Neutral**: 35 < 점수 < 65
/// - **Underweight**: 점수 <= 35
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stance {
    Overweight,
    Neutral,
    Underweight,
}

impl Stance {
    /// 비중확대 하한.
    pub const OVERWEIGHT_MIN: u8 = 65;
    /// 비중축소 상한.
    pub const UNDERWEIGHT_MAX: u8 = 35;

    /// 클램프된 점수로부터 의견 도출.
    pub fn from_score(score: u8) -> Self {
        if score >= Self::OVERWEIGHT_MIN {
            Self::Overweight
        } else if score <= Self::UNDERWEIGHT_MAX {
            Self::Underweight
        } else {
            Self::Neutral
        }
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Overweight => "OVERWEIGHT",
            Self::Neutral => "NEUTRAL",
            Self::Underweight => "UNDERWEIGHT",
        };
        write!(f, "{}", s)
    }
}

/// 게이트 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineStatus {
    #[default]
    Active,
    /// 하드 비토 발동. 의견은 OVERWEIGHT가 될 수 없음.
    Gated,
}

/// 점수에 기여한 요인.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drivers {
    pub helps: Vec<String>,
    pub hurts: Vec<String>,
}

/// 엔진 하나의 스코어링 결과.
///
/// 생성 후 변경되지 않으며 매 호출마다 다시 계산됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineScore {
    pub engine: EngineId,
    /// 0~100
    pub score: u8,
    pub stance: Stance,
    pub status: EngineStatus,
    /// 0~100
    pub confidence: u8,
    pub reasons: Vec<String>,
    pub drivers: Drivers,
}

impl EngineScore {
    pub fn is_gated(&self) -> bool {
        self.status == EngineStatus::Gated
    }
}
