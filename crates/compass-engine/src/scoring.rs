//! 엔진 스코어링 인터프리터.
//!
//! 카탈로그의 선언적 규칙 테이블을 하나의 함수로 평가합니다.
//!
//! # 점수 계산
//!
//! 1. 기준점 50에서 시작
//! 2. 규칙 테이블을 순서대로 평가, 성립한 규칙의 델타를 누적
//! 3. [0, 100]으로 클램프 후 의견 결정 (>= 65 OVERWEIGHT, <= 35 UNDERWEIGHT)
//! 4. 게이트 발동 시 GATED, 의견은 점수 < 50이면 UNDERWEIGHT 아니면 NEUTRAL
//!
//! # 신뢰도
//!
//! `40 + 5 * min(발동 규칙 수, 6) + 30 * 합의도`
//!
//! 합의도는 `|Σhelps - Σhurts| / (Σhelps + Σhurts)`이며, 게이트된 엔진은 최소 75.

use serde::Serialize;
use tracing::debug;

use compass_core::{
    list_engines, Bucket, Drivers, Engine, EngineScore, EngineStatus, MacroInputs, Regime, Stance,
};

use crate::error::ScoringError;
use crate::regime::{classify_regime, primary_drivers, watch_triggers};

/// 기준 점수.
pub const BASELINE_SCORE: i32 = 50;
/// 게이트된 엔진의 최소 신뢰도.
pub const GATED_MIN_CONFIDENCE: u8 = 75;

const CONFIDENCE_BASE: f64 = 40.0;
const CONFIDENCE_PER_RULE: f64 = 5.0;
const CONFIDENCE_RULE_CAP: usize = 6;
const CONFIDENCE_AGREEMENT_WEIGHT: f64 = 30.0;

/// 매크로 케이스 요약.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroCase {
    pub regime: Regime,
    pub description: String,
    pub primary_drivers: Vec<String>,
    pub watch_triggers: Vec<String>,
}

/// 전체 스코어링 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringOutput {
    pub macro_case: MacroCase,
    /// 카탈로그 순서
    pub engine_scores: Vec<EngineScore>,
}

impl ScoringOutput {
    /// 게이트된 엔진 점수만.
    pub fn gated(&self) -> impl Iterator<Item = &EngineScore> {
        self.engine_scores.iter().filter(|s| s.is_gated())
    }
}

/// 12개 엔진 전체 스코어링.
///
/// 입력 검증에 실패하면 `ScoringError::Validation`. 기본값으로 대체하지 않습니다.
pub fn score_all_engines(inputs: &MacroInputs) -> Result<ScoringOutput, ScoringError> {
    inputs.validate()?;

    let regime = classify_regime(inputs);
    let engine_scores: Vec<EngineScore> =
        list_engines().iter().map(|e| score_engine(e, inputs)).collect();

    debug!(
        regime = %regime,
        gated = engine_scores.iter().filter(|s| s.is_gated()).count(),
        "엔진 스코어링 완료"
    );

    Ok(ScoringOutput {
        macro_case: MacroCase {
            regime,
            description: regime.description().to_string(),
            primary_drivers: primary_drivers(inputs, regime),
            watch_triggers: watch_triggers(inputs, regime),
        },
        engine_scores,
    })
}

/// 단일 엔진 스코어링.
///
/// 입력은 이미 검증되었다고 가정합니다.
pub fn score_engine(engine: &Engine, inputs: &MacroInputs) -> EngineScore {
    let mut raw = BASELINE_SCORE;
    let mut reasons = Vec::new();
    let mut drivers = Drivers::default();
    let mut fired = 0usize;
    let mut helps_total = 0i32;
    let mut hurts_total = 0i32;

    for rule in engine.rules.iter().filter(|r| r.when.holds(inputs)) {
        fired += 1;
        raw += rule.delta;
        reasons.push(format!("{:+} {}", rule.delta, rule.reason));
        match rule.bucket() {
            Bucket::Helps => {
                helps_total += rule.delta;
                drivers.helps.push(rule.reason.to_string());
            }
            Bucket::Hurts => {
                hurts_total += -rule.delta;
                drivers.hurts.push(rule.reason.to_string());
            }
        }
    }

    let score = raw.clamp(0, 100) as u8;
    let mut stance = Stance::from_score(score);
    let mut status = EngineStatus::Active;

    for gate in engine.gates.iter().filter(|g| g.when.holds(inputs)) {
        status = EngineStatus::Gated;
        reasons.push(gate.reason.to_string());
    }

    if status == EngineStatus::Gated {
        stance = if i32::from(score) < BASELINE_SCORE {
            Stance::Underweight
        } else {
            Stance::Neutral
        };
        debug!(engine = %engine.id, score, "게이트 발동");
    }

    let agreement = if helps_total + hurts_total == 0 {
        0.0
    } else {
        f64::from((helps_total - hurts_total).abs()) / f64::from(helps_total + hurts_total)
    };
    let mut confidence = CONFIDENCE_BASE
        + CONFIDENCE_PER_RULE * fired.min(CONFIDENCE_RULE_CAP) as f64
        + CONFIDENCE_AGREEMENT_WEIGHT * agreement;
    if status == EngineStatus::Gated {
        confidence = confidence.max(f64::from(GATED_MIN_CONFIDENCE));
    }

    EngineScore {
        engine: engine.id,
        score,
        stance,
        status,
        confidence: confidence.round().clamp(0.0, 100.0) as u8,
        reasons,
        drivers,
    }
}
