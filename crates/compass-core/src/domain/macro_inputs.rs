//! MacroInputs - 정규화된 매크로 관측값 레코드.
//!
//! 모든 엔진 스코어링이 공유하는 어휘입니다. 모든 필드가 필수이며
//! 부분 레코드는 허용되지 않습니다. 대체값 주입은 조회 계층의 책임이며
//! 스코어링 함수는 절대 자체 기본값을 채우지 않습니다.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// 비트코인 추세 (200일 이동평균 대비).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BtcTrend {
    /// 가격이 200DMA 위
    Bullish,
    /// 가격이 200DMA 아래
    Bearish,
}

impl BtcTrend {
    /// 가격과 200일 이동평균으로부터 추세 판단.
    pub fn from_price(price: f64, dma_200: f64) -> Self {
        if price >= dma_200 {
            Self::Bullish
        } else {
            Self::Bearish
        }
    }
}

impl fmt::Display for BtcTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bullish => write!(f, "bullish"),
            Self::Bearish => write!(f, "bearish"),
        }
    }
}

/// 인플레이션 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InflationTrend {
    Rising,
    Falling,
    Stable,
}

/// 크레딧 스프레드 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditTrend {
    Widening,
    Tightening,
    Stable,
}

/// 특정 시점의 매크로 관측값.
///
/// 와이어 형식은 camelCase이며 약어 필드(`btc200DMA`, `hyOAS` 등)는
/// 명시적으로 이름을 지정합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MacroInputs {
    /// 비트코인 가격 (USD)
    pub btc_price: f64,
    /// 비트코인 200일 이동평균 (USD)
    #[serde(rename = "btc200DMA")]
    pub btc_200dma: f64,
    /// 비트코인 추세
    pub btc_trend: BtcTrend,
    /// 명목 10년물 금리 (%)
    #[serde(rename = "nominalRate10Y")]
    pub nominal_rate_10y: f64,
    /// 실질 10년물 금리 (%)
    #[serde(rename = "realRate10Y")]
    pub real_rate_10y: f64,
    /// CPI 전년 대비 (%)
    pub inflation: f64,
    /// 인플레이션 방향
    pub inflation_trend: InflationTrend,
    /// 하이일드 OAS (bps)
    #[serde(rename = "hyOAS")]
    pub hy_oas: f64,
    /// 투자등급 OAS (bps)
    #[serde(rename = "igOAS")]
    pub ig_oas: f64,
    /// 크레딧 방향
    pub credit_trend: CreditTrend,
    /// 실질 GDP 성장률 (%)
    pub gdp_growth: f64,
    /// 제조업 PMI (0~100)
    pub pmi: f64,
    /// 실업률 (%)
    pub unemployment_rate: f64,
    /// 유동성 종합 점수 (0~100)
    pub liquidity_score: f64,
    /// WTI 유가 (USD/배럴)
    pub oil_price: f64,
    /// 금 가격 (USD/온스)
    pub gold_price: f64,
    /// 달러 지수
    pub usd_strength: f64,
    /// VIX
    pub vix: f64,
    /// 주식 6개월 수익률 (%)
    pub equity_momentum: f64,
}

impl MacroInputs {
    /// JSON 값에서 레코드를 파싱하고 검증합니다.
    ///
    /// 누락 필드, 알 수 없는 필드, 범위 위반 모두 `ValidationError`가 됩니다.
    pub fn from_json(value: serde_json::Value) -> Result<Self, ValidationError> {
        let inputs: Self = serde_json::from_value(value)
            .map_err(|e| ValidationError::new("macroInputs", e.to_string()))?;
        inputs.validate()?;
        Ok(inputs)
    }

    /// 결정적인 목 레코드.
    ///
    /// 테스트와 라이브 조회 실패 시 대체용으로 사용됩니다.
    /// 크레딧 스트레스(HY OAS 480), 비트코인 약세, VIX 22 상황을 나타냅니다.
    pub fn mock() -> Self {
        Self {
            btc_price: 62_000.0,
            btc_200dma: 64_500.0,
            btc_trend: BtcTrend::Bearish,
            nominal_rate_10y: 4.3,
            real_rate_10y: 1.9,
            inflation: 3.2,
            inflation_trend: InflationTrend::Stable,
            hy_oas: 480.0,
            ig_oas: 125.0,
            credit_trend: CreditTrend::Widening,
            gdp_growth: 1.8,
            pmi: 48.5,
            unemployment_rate: 4.1,
            liquidity_score: 45.0,
            oil_price: 78.0,
            gold_price: 2350.0,
            usd_strength: 104.0,
            vix: 22.0,
            equity_momentum: 4.5,
        }
    }

    /// 모든 수치 필드를 (와이어 이름, 값) 쌍으로 반환.
    pub fn numeric_fields(&self) -> [(&'static str, f64); 16] {
        [
            ("btcPrice", self.btc_price),
            ("btc200DMA", self.btc_200dma),
            ("nominalRate10Y", self.nominal_rate_10y),
            ("realRate10Y", self.real_rate_10y),
            ("inflation", self.inflation),
            ("hyOAS", self.hy_oas),
            ("igOAS", self.ig_oas),
            ("gdpGrowth", self.gdp_growth),
            ("pmi", self.pmi),
            ("unemploymentRate", self.unemployment_rate),
            ("liquidityScore", self.liquidity_score),
            ("oilPrice", self.oil_price),
            ("goldPrice", self.gold_price),
            ("usdStrength", self.usd_strength),
            ("vix", self.vix),
            ("equityMomentum", self.equity_momentum),
        ]
    }

    /// 레코드 검증.
    ///
    /// - 모든 수치 필드는 유한해야 함
    /// - 가격 필드(`btcPrice`, `btc200DMA`, `oilPrice`, `goldPrice`)는 양수
    /// - `pmi`, `liquidityScore`는 0~100
    /// - `vix`는 음수 불가
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in self.numeric_fields() {
            if !value.is_finite() {
                return Err(ValidationError::new(field, "must be a finite number"));
            }
        }

        for (field, value) in [
            ("btcPrice", self.btc_price),
            ("btc200DMA", self.btc_200dma),
            ("oilPrice", self.oil_price),
            ("goldPrice", self.gold_price),
        ] {
            if value <= 0.0 {
                return Err(ValidationError::new(field, "must be positive"));
            }
        }

        for (field, value) in [("pmi", self.pmi), ("liquidityScore", self.liquidity_score)] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ValidationError::new(field, "must be within 0..=100"));
            }
        }

        if self.vix < 0.0 {
            return Err(ValidationError::new("vix", "must not be negative"));
        }

        Ok(())
    }

    /// 비트코인 가격의 200DMA 대비 괴리율 (%).
    pub fn btc_premium_to_200dma_pct(&self) -> f64 {
        (self.btc_price / self.btc_200dma - 1.0) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_is_valid() {
        let inputs = MacroInputs::mock();
        assert!(inputs.validate().is_ok());
        assert_eq!(inputs.hy_oas, 480.0);
        assert_eq!(inputs.btc_trend, BtcTrend::Bearish);
        assert_eq!(inputs.vix, 22.0);
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(MacroInputs::mock()).unwrap();
        for key in [
            "btcPrice",
            "btc200DMA",
            "btcTrend",
            "nominalRate10Y",
            "realRate10Y",
            "hyOAS",
            "igOAS",
            "creditTrend",
            "equityMomentum",
        ] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(json["btcTrend"], "bearish");
        assert_eq!(json["creditTrend"], "widening");
    }

    #[test]
    fn test_from_json_rejects_missing_field() {
        let mut json = serde_json::to_value(MacroInputs::mock()).unwrap();
        json.as_object_mut().unwrap().remove("vix");

        let err = MacroInputs::from_json(json).unwrap_err();
        assert_eq!(err.field, "macroInputs");
        assert!(err.reason.contains("vix"));
    }

    #[test]
    fn test_validate_rejects_nan() {
        let inputs = MacroInputs {
            hy_oas: f64::NAN,
            ..MacroInputs::mock()
        };
        let err = inputs.validate().unwrap_err();
        assert_eq!(err.field, "hyOAS");
    }

    #[test]
    fn test_validate_rejects_non_positive_price() {
        let inputs = MacroInputs {
            btc_200dma: 0.0,
            ..MacroInputs::mock()
        };
        assert_eq!(inputs.validate().unwrap_err().field, "btc200DMA");
    }

    #[test]
    fn test_validate_pmi_range() {
        let inputs = MacroInputs {
            pmi: 120.0,
            ..MacroInputs::mock()
        };
        assert_eq!(inputs.validate().unwrap_err().field, "pmi");
    }

    #[test]
    fn test_btc_trend_from_price() {
        assert_eq!(BtcTrend::from_price(70_000.0, 60_000.0), BtcTrend::Bullish);
        assert_eq!(BtcTrend::from_price(50_000.0, 60_000.0), BtcTrend::Bearish);
    }

    #[test]
    fn test_btc_premium() {
        let inputs = MacroInputs {
            btc_price: 110.0,
            btc_200dma: 100.0,
            ..MacroInputs::mock()
        };
        assert!((inputs.btc_premium_to_200dma_pct() - 10.0).abs() < 1e-9);
    }
}
