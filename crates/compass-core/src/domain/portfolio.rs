//! 보유 종목, 포트폴리오, 목표 밴드.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::engine::{EngineId, Layer};
use crate::error::ValidationError;

/// 합계 100% 판정 허용 오차 (퍼센트 포인트).
pub const WEIGHT_TOLERANCE: Decimal = dec!(0.25);

/// 계좌 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Account {
    #[default]
    #[serde(rename = "TAXABLE")]
    Taxable,
    #[serde(rename = "ROTH")]
    Roth,
    #[serde(rename = "401K")]
    Retirement401k,
    #[serde(rename = "OTHER")]
    Other,
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Taxable => "TAXABLE",
            Self::Roth => "ROTH",
            Self::Retirement401k => "401K",
            Self::Other => "OTHER",
        };
        f.write_str(s)
    }
}

fn deserialize_ticker<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(normalize_ticker(&raw))
}

/// 티커 정규화 (공백 제거 + 대문자).
pub fn normalize_ticker(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// 보유 종목 하나.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    /// 항상 대문자
    #[serde(deserialize_with = "deserialize_ticker")]
    pub ticker: String,
    pub account: Account,
    /// 0~100 (%)
    pub weight_pct: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Holding {
    pub fn new(ticker: impl AsRef<str>, account: Account, weight_pct: Decimal) -> Self {
        Self {
            ticker: normalize_ticker(ticker.as_ref()),
            account,
            weight_pct,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// 티커 비어 있음, 비중 범위 검증.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.ticker.is_empty() {
            return Err(ValidationError::new("ticker", "must not be empty"));
        }
        if self.weight_pct < Decimal::ZERO || self.weight_pct > dec!(100) {
            return Err(ValidationError::new(
                format!("holdings.{}.weightPct", self.ticker),
                format!("must be within 0..=100, got {}", self.weight_pct),
            ));
        }
        Ok(())
    }
}

/// 엔진 목표 밴드 (%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetBand {
    pub min: Decimal,
    pub target: Decimal,
    pub max: Decimal,
}

impl TargetBand {
    pub const fn new(min: Decimal, target: Decimal, max: Decimal) -> Self {
        Self { min, target, max }
    }

    /// `min <= target <= max` 확인.
    pub fn validate(&self, field: &str) -> Result<(), ValidationError> {
        if self.min < Decimal::ZERO || self.max > dec!(100) {
            return Err(ValidationError::new(field, "band must lie within 0..=100"));
        }
        if !(self.min <= self.target && self.target <= self.max) {
            return Err(ValidationError::new(field, "expected min <= target <= max"));
        }
        Ok(())
    }

    /// 밴드 밖으로 벗어난 거리. 밴드 안이면 0.
    pub fn distance_outside(&self, pct: Decimal) -> Decimal {
        if pct < self.min {
            self.min - pct
        } else if pct > self.max {
            pct - self.max
        } else {
            Decimal::ZERO
        }
    }
}

impl std::ops::Add for TargetBand {
    type Output = TargetBand;

    fn add(self, rhs: Self) -> Self::Output {
        TargetBand::new(self.min + rhs.min, self.target + rhs.target, self.max + rhs.max)
    }
}

/// 엔진별 목표 밴드 테이블.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetTable(BTreeMap<EngineId, TargetBand>);

impl Default for TargetTable {
    /// 기본 목표 (합계 100).
    fn default() -> Self {
        let band = |min, target, max| TargetBand::new(min, target, max);
        let table = [
            (EngineId::GrowthEquity, band(dec!(10), dec!(15), dec!(20))),
            (EngineId::ValueCyclicals, band(dec!(4), dec!(8), dec!(12))),
            (EngineId::DividendCashflow, band(dec!(8), dec!(12), dec!(16))),
            (EngineId::CreditCarry, band(dec!(0), dec!(5), dec!(8))),
            (EngineId::RealEstate, band(dec!(2), dec!(5), dec!(8))),
            (EngineId::QualityDefensive, band(dec!(4), dec!(8), dec!(12))),
            (EngineId::LongDuration, band(dec!(0), dec!(5), dec!(10))),
            (EngineId::CashEquivalents, band(dec!(10), dec!(20), dec!(25))),
            (EngineId::InflationLinked, band(dec!(0), dec!(5), dec!(8))),
            (EngineId::EnergyCommodities, band(dec!(2), dec!(5), dec!(8))),
            (EngineId::PreciousMetals, band(dec!(4), dec!(7), dec!(10))),
            (EngineId::BitcoinOptionality, band(dec!(2), dec!(5), dec!(8))),
        ];
        Self(table.into_iter().collect())
    }
}

impl TargetTable {
    /// 기본 테이블에 사용자 오버라이드 적용.
    pub fn with_overrides(overrides: Option<&BTreeMap<EngineId, TargetBand>>) -> Self {
        let mut table = Self::default();
        if let Some(overrides) = overrides {
            for (id, band) in overrides {
                table.0.insert(*id, *band);
            }
        }
        table
    }

    /// 엔진 밴드. 기본 테이블이 모든 엔진을 포함하므로 항상 존재.
    pub fn band(&self, id: EngineId) -> TargetBand {
        self.0
            .get(&id)
            .copied()
            .unwrap_or(TargetBand::new(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO))
    }

    /// 레이어 밴드 = 소속 엔진 밴드의 합.
    pub fn layer_band(&self, layer: Layer) -> TargetBand {
        layer.engines().fold(
            TargetBand::new(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
            |acc, id| acc + self.band(id),
        )
    }

    pub fn total_target(&self) -> Decimal {
        self.0.values().map(|b| b.target).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EngineId, TargetBand)> + '_ {
        self.0.iter().map(|(id, band)| (*id, *band))
    }
}

/// 저장되는 포트폴리오 레코드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    #[serde(default)]
    pub holdings: Vec<Holding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_targets: Option<BTreeMap<EngineId, TargetBand>>,
    #[serde(default)]
    pub use_demo_holdings: bool,
    pub updated_at: DateTime<Utc>,
}

impl Default for Portfolio {
    fn default() -> Self {
        Self {
            holdings: Vec::new(),
            custom_targets: None,
            use_demo_holdings: true,
            updated_at: Utc::now(),
        }
    }
}

impl Portfolio {
    pub fn new(holdings: Vec<Holding>) -> Self {
        Self {
            holdings,
            custom_targets: None,
            use_demo_holdings: false,
            updated_at: Utc::now(),
        }
    }

    /// 분석 대상 보유 종목 (데모 플래그 반영).
    pub fn effective_holdings(&self) -> Vec<Holding> {
        if self.use_demo_holdings {
            demo_holdings()
        } else {
            self.holdings.clone()
        }
    }

    /// 오버라이드가 반영된 목표 테이블.
    pub fn targets(&self) -> TargetTable {
        TargetTable::with_overrides(self.custom_targets.as_ref())
    }

    /// 저장 전 검증.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for holding in &self.holdings {
            holding.validate()?;
        }
        if let Some(custom) = &self.custom_targets {
            for (id, band) in custom {
                band.validate(&format!("customTargets.{}", id))?;
            }
        }
        Ok(())
    }
}

/// 비중 합계.
pub fn total_weight(holdings: &[Holding]) -> Decimal {
    holdings.iter().map(|h| h.weight_pct).sum()
}

/// 합계가 100 ± 0.25 이내이면 유효.
pub fn is_valid_total(total: Decimal) -> bool {
    (total - dec!(100)).abs() <= WEIGHT_TOLERANCE
}

/// 데모 보유 종목 (합계 100).
pub fn demo_holdings() -> Vec<Holding> {
    use Account::*;
    vec![
        Holding::new("QQQ", Roth, dec!(14)),
        Holding::new("NVDA", Taxable, dec!(4)),
        Holding::new("VTV", Retirement401k, dec!(7)),
        Holding::new("SCHD", Taxable, dec!(12)),
        Holding::new("HYG", Retirement401k, dec!(4)),
        Holding::new("VNQ", Roth, dec!(5)),
        Holding::new("XLV", Taxable, dec!(8)),
        Holding::new("TLT", Retirement401k, dec!(6)),
        Holding::new("SGOV", Taxable, dec!(18)),
        Holding::new("TIP", Retirement401k, dec!(4)),
        Holding::new("XLE", Taxable, dec!(5)),
        Holding::new("GLD", Taxable, dec!(7)),
        Holding::new("IBIT", Roth, dec!(6)),
    ]
}
