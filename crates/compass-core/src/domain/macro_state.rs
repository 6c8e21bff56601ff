//! 매크로 레짐, 경보 수준, 확인 신호.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::macro_inputs::BtcTrend;

/// 매크로 레짐.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regime {
    #[serde(rename = "Risk-On")]
    RiskOn,
    #[serde(rename = "Risk-Off")]
    RiskOff,
    Inflationary,
    Deflationary,
    Mixed,
}

impl Regime {
    /// 페이지 헤더용 설명.
    pub fn description(self) -> &'static str {
        match self {
            Self::RiskOn => "Growth and liquidity are supportive; credit and volatility are calm.",
            Self::RiskOff => "Stress signals dominate; capital preservation takes priority.",
            Self::Inflationary => "Inflation is re-accelerating; real assets outperform duration.",
            Self::Deflationary => "Growth and inflation are both fading; duration and quality lead.",
            Self::Mixed => "Signals conflict; stay balanced and let confirmations decide.",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::RiskOn => "Risk-On",
            Self::RiskOff => "Risk-Off",
            Self::Inflationary => "Inflationary",
            Self::Deflationary => "Deflationary",
            Self::Mixed => "Mixed",
        };
        f.write_str(s)
    }
}

/// 종합 경보 수준.
///
/// 순서가 의미를 가집니다: `Green < Yellow < Red`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertLevel {
    #[default]
    Green,
    Yellow,
    Red,
}

impl AlertLevel {
    /// 스트레스 포인트로부터 경보 수준 판단.
    ///
    /// RED >= 4, YELLOW >= 2, 그 외 GREEN.
    pub fn from_stress_points(points: u32) -> Self {
        match points {
            0..=1 => Self::Green,
            2..=3 => Self::Yellow,
            _ => Self::Red,
        }
    }

    /// 컬러 코드 (UI용).
    pub fn color_code(self) -> &'static str {
        match self {
            Self::Green => "#10b981",
            Self::Yellow => "#f59e0b",
            Self::Red => "#ef4444",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Green => "GREEN",
            Self::Yellow => "YELLOW",
            Self::Red => "RED",
        };
        f.write_str(s)
    }
}

/// 매크로 입력에서 순수하게 도출된 상태.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroState {
    pub regime: Regime,
    pub alert_level: AlertLevel,
    /// 0~100
    pub inflation_composite: f64,
    /// Risk-Off 조건 성립 여부. 우선순위가 높은 레짐 라벨에 가려지지 않습니다.
    #[serde(default)]
    pub risk_off: bool,
}

/// 시장 폭 확인 신호.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreadthSignal {
    /// 지수와 참여 종목이 같은 방향
    Confirming,
    /// 지수 상승이 소수 종목에 집중
    Diverging,
}

/// 선택적 확인 신호.
///
/// 각 신호가 없으면 해당 정책 규칙만 건너뜁니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmations {
    #[serde(default)]
    pub breadth: Option<BreadthSignal>,
    #[serde(default)]
    pub btc_trend: Option<BtcTrend>,
    #[serde(default)]
    pub credit_microstress: Option<AlertLevel>,
}

impl Confirmations {
    /// 누락된 신호 이름 목록.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.breadth.is_none() {
            missing.push("breadth");
        }
        if self.btc_trend.is_none() {
            missing.push("btcTrend");
        }
        if self.credit_microstress.is_none() {
            missing.push("creditMicrostress");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regime_wire_names() {
        assert_eq!(serde_json::to_string(&Regime::RiskOn).unwrap(), "\"Risk-On\"");
        assert_eq!(serde_json::to_string(&Regime::Mixed).unwrap(), "\"Mixed\"");
        assert_eq!(Regime::RiskOff.to_string(), "Risk-Off");
    }

    #[test]
    fn test_alert_level_order() {
        assert!(AlertLevel::Green < AlertLevel::Yellow);
        assert!(AlertLevel::Yellow < AlertLevel::Red);
    }

    #[test]
    fn test_alert_from_points() {
        assert_eq!(AlertLevel::from_stress_points(0), AlertLevel::Green);
        assert_eq!(AlertLevel::from_stress_points(2), AlertLevel::Yellow);
        assert_eq!(AlertLevel::from_stress_points(3), AlertLevel::Yellow);
        assert_eq!(AlertLevel::from_stress_points(7), AlertLevel::Red);
    }

    #[test]
    fn test_confirmations_missing() {
        let c = Confirmations {
            btc_trend: Some(BtcTrend::Bullish),
            ..Default::default()
        };
        assert_eq!(c.missing(), vec!["breadth", "creditMicrostress"]);
    }
}
