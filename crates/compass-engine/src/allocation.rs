//! 포트폴리오 델타 계산기.
//!
//! 보유 종목을 엔진/레이어별 비중으로 집계하고 목표 밴드와 비교합니다.
//!
//! - 엔진별 현재 비중은 비중 합계로 정규화한 백분율 (소수 둘째 자리)
//! - 레이어 밴드는 소속 엔진 밴드의 합
//! - 상/하위 이탈 목록은 밴드 밖 거리 기준 최대 3개

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::BTreeMap;

use compass_core::{
    classify_holding, is_valid_total, total_weight, Account, Classification, EngineId, Layer,
    Portfolio, TargetBand, TargetTable,
};

/// 상/하위 이탈 목록 최대 길이.
pub const TOP_DEVIATIONS: usize = 3;

/// 밴드 대비 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BandStatus {
    Under,
    InRange,
    Over,
}

impl BandStatus {
    pub fn classify(current: Decimal, band: &TargetBand) -> Self {
        if current < band.min {
            Self::Under
        } else if current > band.max {
            Self::Over
        } else {
            Self::InRange
        }
    }
}

/// 목표 대비 델타 (엔진 또는 레이어).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationDelta<K> {
    pub key: K,
    pub current_pct: Decimal,
    pub target_pct: Decimal,
    pub min: Decimal,
    pub max: Decimal,
    pub status: BandStatus,
    /// current - target
    pub delta_to_target: Decimal,
}

impl<K> AllocationDelta<K> {
    fn new(key: K, current_pct: Decimal, band: TargetBand) -> Self {
        Self {
            key,
            current_pct,
            target_pct: band.target,
            min: band.min,
            max: band.max,
            status: BandStatus::classify(current_pct, &band),
            delta_to_target: current_pct - band.target,
        }
    }

    /// 밴드 밖으로 벗어난 거리.
    pub fn distance_outside(&self) -> Decimal {
        TargetBand::new(self.min, self.target_pct, self.max).distance_outside(self.current_pct)
    }
}

pub type EngineDelta = AllocationDelta<EngineId>;
pub type LayerDelta = AllocationDelta<Layer>;

impl EngineDelta {
    pub fn layer(&self) -> Layer {
        self.key.layer()
    }
}

/// 보유 종목별 분류 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingClassification {
    pub ticker: String,
    pub account: Account,
    pub weight_pct: Decimal,
    pub classification: Classification,
}

/// 포트폴리오 요약.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_weight: Decimal,
    pub is_valid: bool,
    pub used_demo_holdings: bool,
    pub total_by_engine: BTreeMap<EngineId, Decimal>,
    /// 카탈로그 순서
    pub engine_deltas: Vec<EngineDelta>,
    pub layer_deltas: Vec<LayerDelta>,
    pub top_overweights: Vec<EngineDelta>,
    pub top_underweights: Vec<EngineDelta>,
    pub classifications: Vec<HoldingClassification>,
}

impl PortfolioSummary {
    /// 추정 분류된 보유 종목 수.
    pub fn uncertain_count(&self) -> usize {
        self.classifications
            .iter()
            .filter(|c| !c.classification.is_classified())
            .count()
    }
}

/// 포트폴리오 요약 계산.
pub fn compute_summary(portfolio: &Portfolio, targets: &TargetTable) -> PortfolioSummary {
    let holdings = portfolio.effective_holdings();
    let total = total_weight(&holdings);

    let mut total_by_engine: BTreeMap<EngineId, Decimal> =
        EngineId::ALL.into_iter().map(|id| (id, Decimal::ZERO)).collect();

    let classifications: Vec<HoldingClassification> = holdings
        .iter()
        .map(|h| {
            let classification = classify_holding(h);
            *total_by_engine.entry(classification.engine()).or_default() += h.weight_pct;
            HoldingClassification {
                ticker: h.ticker.clone(),
                account: h.account,
                weight_pct: h.weight_pct,
                classification,
            }
        })
        .collect();

    let engine_deltas: Vec<EngineDelta> = EngineId::ALL
        .into_iter()
        .map(|id| {
            let weight = total_by_engine.get(&id).copied().unwrap_or_default();
            EngineDelta::new(id, normalize(weight, total), targets.band(id))
        })
        .collect();

    let layer_deltas: Vec<LayerDelta> = Layer::ALL
        .into_iter()
        .map(|layer| {
            let current: Decimal = engine_deltas
                .iter()
                .filter(|d| d.layer() == layer)
                .map(|d| d.current_pct)
                .sum();
            LayerDelta::new(layer, current, targets.layer_band(layer))
        })
        .collect();

    PortfolioSummary {
        total_weight: total,
        is_valid: is_valid_total(total),
        used_demo_holdings: portfolio.use_demo_holdings,
        total_by_engine,
        top_overweights: top_by_distance(&engine_deltas, BandStatus::Over),
        top_underweights: top_by_distance(&engine_deltas, BandStatus::Under),
        engine_deltas,
        layer_deltas,
        classifications,
    }
}

/// 비중 합계 대비 백분율. 합계가 0이면 0.
fn normalize(weight: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    (weight / total * dec!(100)).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn top_by_distance(deltas: &[EngineDelta], status: BandStatus) -> Vec<EngineDelta> {
    let mut matching: Vec<EngineDelta> =
        deltas.iter().filter(|d| d.status == status).cloned().collect();
    // 거리 내림차순, 동률은 카탈로그 순서
    matching.sort_by(|a, b| {
        b.distance_outside()
            .cmp(&a.distance_outside())
            .then(a.key.cmp(&b.key))
    });
    matching.truncate(TOP_DEVIATIONS);
    matching
}
