//! 경제 엔진 및 포트폴리오 레이어 식별자.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::rules::{GateRule, ScoreRule};

/// 12개 고정 경제 엔진 식별자.
///
/// 선언 순서가 카탈로그 순서이며 UI와 테스트에서 안정적인 정렬 기준이 됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineId {
    GrowthEquity,
    ValueCyclicals,
    DividendCashflow,
    CreditCarry,
    RealEstate,
    QualityDefensive,
    LongDuration,
    CashEquivalents,
    InflationLinked,
    EnergyCommodities,
    PreciousMetals,
    BitcoinOptionality,
}

impl EngineId {
    /// 카탈로그 순서의 전체 목록.
    pub const ALL: [EngineId; 12] = [
        Self::GrowthEquity,
        Self::ValueCyclicals,
        Self::DividendCashflow,
        Self::CreditCarry,
        Self::RealEstate,
        Self::QualityDefensive,
        Self::LongDuration,
        Self::CashEquivalents,
        Self::InflationLinked,
        Self::EnergyCommodities,
        Self::PreciousMetals,
        Self::BitcoinOptionality,
    ];

    /// 와이어 식별자.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GrowthEquity => "growth_equity",
            Self::ValueCyclicals => "value_cyclicals",
            Self::DividendCashflow => "dividend_cashflow",
            Self::CreditCarry => "credit_carry",
            Self::RealEstate => "real_estate",
            Self::QualityDefensive => "quality_defensive",
            Self::LongDuration => "long_duration",
            Self::CashEquivalents => "cash_equivalents",
            Self::InflationLinked => "inflation_linked",
            Self::EnergyCommodities => "energy_commodities",
            Self::PreciousMetals => "precious_metals",
            Self::BitcoinOptionality => "bitcoin_optionality",
        }
    }

    /// 문자열 식별자 파싱. 알 수 없는 값은 `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|id| id.as_str() == normalized)
    }

    /// 카탈로그 내 위치.
    pub fn index(self) -> usize {
        self as usize
    }

    /// 이 엔진이 속한 포트폴리오 레이어.
    pub fn layer(self) -> Layer {
        match self {
            Self::GrowthEquity | Self::ValueCyclicals => Layer::Growth,
            Self::DividendCashflow | Self::CreditCarry | Self::RealEstate => Layer::Cashflow,
            Self::QualityDefensive | Self::LongDuration | Self::CashEquivalents => Layer::Stability,
            Self::InflationLinked | Self::EnergyCommodities | Self::PreciousMetals => {
                Layer::HardAsset
            }
            Self::BitcoinOptionality => Layer::Volatility,
        }
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 포트폴리오 레이어.
///
/// 액션 정책은 개별 엔진이 아니라 레이어 단위로 배치/회피를 결정합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    /// 안정성 버퍼 (현금성, 장기채, 방어주)
    Stability,
    /// 현금흐름 (배당, 크레딧, 리츠)
    Cashflow,
    /// 성장 (그로스, 가치/경기민감)
    Growth,
    /// 실물자산 헤지 (물가연동채, 원자재, 귀금속)
    HardAsset,
    /// 변동성/옵셔널리티 (비트코인)
    Volatility,
}

impl Layer {
    pub const ALL: [Layer; 5] = [
        Self::Stability,
        Self::Cashflow,
        Self::Growth,
        Self::HardAsset,
        Self::Volatility,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stability => "stability",
            Self::Cashflow => "cashflow",
            Self::Growth => "growth",
            Self::HardAsset => "hard_asset",
            Self::Volatility => "volatility",
        }
    }

    /// 하이베타 레이어 여부 (경보 RED 시 회피 대상).
    pub fn is_high_beta(self) -> bool {
        matches!(self, Self::Growth | Self::Volatility)
    }

    /// 레이어에 속한 엔진 (카탈로그 순서).
    pub fn engines(self) -> impl Iterator<Item = EngineId> {
        EngineId::ALL.into_iter().filter(move |id| id.layer() == self)
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 정적 카탈로그 항목.
///
/// 프로세스 시작 시 한 번 정의되며 읽기 전용입니다.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Engine {
    pub id: EngineId,
    pub label: &'static str,
    pub description: &'static str,
    pub short_definition: &'static str,
    pub examples: &'static [&'static str],
    pub layer: Layer,
    /// 순서가 있는 스코어링 규칙
    pub rules: &'static [ScoreRule],
    /// 하드 비토 규칙
    pub gates: &'static [GateRule],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_id_round_trip_str() {
        for id in EngineId::ALL {
            assert_eq!(EngineId::parse(id.as_str()), Some(id));
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
    }

    #[test]
    fn test_engine_id_parse_lenient() {
        assert_eq!(EngineId::parse("Bitcoin-Optionality"), Some(EngineId::BitcoinOptionality));
        assert_eq!(EngineId::parse("unknown_engine"), None);
    }

    #[test]
    fn test_index_matches_catalog_order() {
        for (i, id) in EngineId::ALL.into_iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn test_every_layer_has_engines() {
        for layer in Layer::ALL {
            assert!(layer.engines().count() > 0, "{} has no engines", layer);
        }
        assert_eq!(Layer::Volatility.engines().collect::<Vec<_>>(), vec![EngineId::BitcoinOptionality]);
    }

    #[test]
    fn test_high_beta() {
        assert!(Layer::Growth.is_high_beta());
        assert!(Layer::Volatility.is_high_beta());
        assert!(!Layer::Stability.is_high_beta());
    }
}
