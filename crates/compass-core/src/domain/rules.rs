//! 선언적 스코어링 규칙.
//!
//! 엔진별 규칙은 흩어진 조건문이 아니라 데이터입니다.
//! `Condition`은 매크로 입력에 대한 작은 술어 언어이며,
//! 단일 인터프리터(`compass_engine::scoring`)가 모든 엔진에 대해 균일하게 평가합니다.

use serde::Serialize;

use super::macro_inputs::{BtcTrend, CreditTrend, InflationTrend, MacroInputs};

/// 규칙이 참조할 수 있는 수치 지표.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    NominalRate10Y,
    RealRate10Y,
    Inflation,
    HyOas,
    IgOas,
    GdpGrowth,
    Pmi,
    UnemploymentRate,
    LiquidityScore,
    OilPrice,
    GoldPrice,
    UsdStrength,
    Vix,
    EquityMomentum,
    /// 비트코인 가격의 200DMA 대비 괴리율 (%)
    BtcPremiumTo200Dma,
}

impl Metric {
    /// 입력 레코드에서 지표 값을 읽습니다.
    pub fn value(self, inputs: &MacroInputs) -> f64 {
        match self {
            Self::NominalRate10Y => inputs.nominal_rate_10y,
            Self::RealRate10Y => inputs.real_rate_10y,
            Self::Inflation => inputs.inflation,
            Self::HyOas => inputs.hy_oas,
            Self::IgOas => inputs.ig_oas,
            Self::GdpGrowth => inputs.gdp_growth,
            Self::Pmi => inputs.pmi,
            Self::UnemploymentRate => inputs.unemployment_rate,
            Self::LiquidityScore => inputs.liquidity_score,
            Self::OilPrice => inputs.oil_price,
            Self::GoldPrice => inputs.gold_price,
            Self::UsdStrength => inputs.usd_strength,
            Self::Vix => inputs.vix,
            Self::EquityMomentum => inputs.equity_momentum,
            Self::BtcPremiumTo200Dma => inputs.btc_premium_to_200dma_pct(),
        }
    }
}

/// 매크로 입력에 대한 술어.
///
/// `Above`/`Below`는 엄격한 비교입니다 (경계값은 불성립).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "args")]
pub enum Condition {
    Above(Metric, f64),
    Below(Metric, f64),
    BtcTrendIs(BtcTrend),
    InflationTrendIs(InflationTrend),
    CreditTrendIs(CreditTrend),
    All(&'static [Condition]),
    Any(&'static [Condition]),
}

impl Condition {
    /// 술어 평가.
    pub fn holds(&self, inputs: &MacroInputs) -> bool {
        match *self {
            Self::Above(metric, threshold) => metric.value(inputs) > threshold,
            Self::Below(metric, threshold) => metric.value(inputs) < threshold,
            Self::BtcTrendIs(trend) => inputs.btc_trend == trend,
            Self::InflationTrendIs(trend) => inputs.inflation_trend == trend,
            Self::CreditTrendIs(trend) => inputs.credit_trend == trend,
            Self::All(conditions) => conditions.iter().all(|c| c.holds(inputs)),
            Self::Any(conditions) => conditions.iter().any(|c| c.holds(inputs)),
        }
    }
}

/// 규칙 결과가 기록될 드라이버 버킷.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Helps,
    Hurts,
}

/// 조건 → 점수 변화 규칙.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreRule {
    pub when: Condition,
    pub delta: i32,
    pub reason: &'static str,
}

impl ScoreRule {
    /// 양수 델타는 helps, 음수는 hurts.
    pub fn bucket(&self) -> Bucket {
        if self.delta >= 0 {
            Bucket::Helps
        } else {
            Bucket::Hurts
        }
    }
}

/// 점수와 무관한 하드 비토 규칙.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GateRule {
    pub when: Condition,
    pub reason: &'static str,
}
