//! 주간 액션 정책 엔진.
//!
//! 매크로 상태, 엔진 점수, 선택적 확인 신호로부터 결정적인 정책을 만듭니다.
//!
//! # 규칙 우선순위
//!
//! 0. GATED 엔진의 레이어는 회피
//! 1. 경보 RED → 하이베타 레이어(growth, volatility) 회피
//! 2. BTC 확인 신호가 bullish가 아니면 volatility 회피
//! 3. 크레딧 마이크로스트레스가 GREEN이 아니면 안정성 편향, 최소 비중 20 / 30
//! 4. 시장 폭 다이버전스 → growth를 배치 대상에서 제외, 최소 비중 15
//! 5. 기본 레짐 정책
//!
//! 배치 = 기본 − 회피 − 제외. 안정성 최소 비중은 적용된 모든 규칙의 최댓값이며
//! 스트레스가 늘어날 때 감소하지 않습니다.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use compass_core::{
    engine, AlertLevel, BreadthSignal, BtcTrend, Confirmations, EngineScore, Layer, MacroState,
    Regime,
};

/// 기본 배치에 실물자산 헤지를 추가하는 인플레이션 합성 지수 임계값.
pub const HARD_ASSET_INFLATION_THRESHOLD: f64 = 60.0;
/// 배치 레이어당 예시 티커 수.
pub const EXAMPLES_PER_LAYER: usize = 2;
/// 예시 티커 전체 상한.
pub const MAX_EXAMPLE_TICKERS: usize = 6;

const RISK_OFF_STABILITY_MIN: u8 = 20;
const MICROSTRESS_YELLOW_STABILITY_MIN: u8 = 20;
const MICROSTRESS_RED_STABILITY_MIN: u8 = 30;
const BREADTH_DIVERGING_STABILITY_MIN: u8 = 15;

/// 레이어별 예시 티커.
static LAYER_EXAMPLES: &[(Layer, &[&str])] = &[
    (Layer::Stability, &["SGOV", "XLP", "TLT"]),
    (Layer::Cashflow, &["SCHD", "VNQ", "HYG"]),
    (Layer::Growth, &["QQQ", "VTV"]),
    (Layer::HardAsset, &["GLD", "TIP", "XLE"]),
    (Layer::Volatility, &["IBIT", "FBTC"]),
];

/// 주간 액션 정책.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPolicy {
    pub this_week_bias: String,
    pub deploy_layers: Vec<Layer>,
    pub avoid_layers: Vec<Layer>,
    /// 안정성 레이어 최소 비중 (%)
    pub stability_minimum: u8,
    pub reasoning_bullets: Vec<String>,
    pub rebalance_triggers: Vec<String>,
    pub example_tickers: BTreeMap<Layer, Vec<String>>,
    /// 확인 신호 누락으로 건너뛴 규칙
    pub skipped_rules: Vec<String>,
}

impl ActionPolicy {
    pub fn avoids(&self, layer: Layer) -> bool {
        self.avoid_layers.contains(&layer)
    }
}

/// 정책 규칙 평가의 중간 결과.
///
/// `build_action_policy`와 `allowed_adds`가 같은 게이팅 로직을 공유합니다.
#[derive(Debug, Clone, Default)]
struct PolicyGates {
    base: BTreeSet<Layer>,
    avoid: BTreeSet<Layer>,
    suppressed: BTreeSet<Layer>,
    stability_minimum: u8,
    microstress_bias: bool,
    bullets: Vec<String>,
    skipped: Vec<String>,
}

impl PolicyGates {
    fn evaluate(
        macro_state: &MacroState,
        engine_scores: &[EngineScore],
        confirmations: &Confirmations,
    ) -> Self {
        let mut gates = Self {
            stability_minimum: base_stability_minimum(macro_state.alert_level),
            ..Default::default()
        };

        // 규칙 0: 게이트 이월
        for score in engine_scores.iter().filter(|s| s.is_gated()) {
            let layer = score.engine.layer();
            gates.avoid.insert(layer);
            let gate_reason = score
                .reasons
                .iter()
                .rev()
                .find(|r| r.starts_with("Gate:"))
                .map(String::as_str)
                .unwrap_or("hard gate active");
            gates.bullets.push(format!(
                "{} is gated ({}); avoid the {} layer",
                engine(score.engine).label,
                gate_reason,
                layer
            ));
        }

        // 규칙 1: RED 경보
        if macro_state.alert_level == AlertLevel::Red {
            for layer in Layer::ALL.into_iter().filter(|l| l.is_high_beta()) {
                gates.avoid.insert(layer);
            }
            gates
                .bullets
                .push("Alert level RED: step away from high-beta growth and volatility".to_string());
        }

        // 규칙 2: BTC 추세 확인
        match confirmations.btc_trend {
            Some(BtcTrend::Bullish) => gates
                .bullets
                .push("Bitcoin trend confirmed above its 200-day average".to_string()),
            Some(trend) => {
                gates.avoid.insert(Layer::Volatility);
                gates.bullets.push(format!(
                    "Bitcoin trend is {}: no new volatility-layer exposure",
                    trend
                ));
            }
            None => gates
                .skipped
                .push("btcTrend confirmation unavailable: crypto trend check skipped".to_string()),
        }

        // 규칙 3: 크레딧 마이크로스트레스
        match confirmations.credit_microstress {
            Some(AlertLevel::Green) => {}
            Some(level) => {
                gates.microstress_bias = true;
                let floor = if level == AlertLevel::Red {
                    MICROSTRESS_RED_STABILITY_MIN
                } else {
                    MICROSTRESS_YELLOW_STABILITY_MIN
                };
                gates.stability_minimum = gates.stability_minimum.max(floor);
                gates.bullets.push(format!(
                    "Credit microstress {}: lean toward stability and cashflow, stability floor {}%",
                    level, floor
                ));
            }
            None => gates.skipped.push(
                "creditMicrostress confirmation unavailable: credit bias check skipped".to_string(),
            ),
        }

        // 규칙 4: 시장 폭
        match confirmations.breadth {
            Some(BreadthSignal::Diverging) => {
                gates.suppressed.insert(Layer::Growth);
                gates.stability_minimum = gates.stability_minimum.max(BREADTH_DIVERGING_STABILITY_MIN);
                gates
                    .bullets
                    .push("Breadth diverging: cap new growth adds until participation broadens".to_string());
            }
            Some(BreadthSignal::Confirming) => {}
            None => gates
                .skipped
                .push("breadth confirmation unavailable: growth cap check skipped".to_string()),
        }

        // 규칙 5: 기본 레짐 정책
        if macro_state.regime == Regime::RiskOn && macro_state.alert_level == AlertLevel::Green {
            gates.base.extend([Layer::Growth, Layer::Cashflow, Layer::Volatility]);
            gates
                .bullets
                .push("Risk-On with a GREEN alert: deploy into growth, cashflow and volatility".to_string());
        } else {
            gates.base.extend([Layer::Cashflow, Layer::Stability]);
            if macro_state.inflation_composite >= HARD_ASSET_INFLATION_THRESHOLD {
                gates.base.insert(Layer::HardAsset);
                gates.bullets.push(format!(
                    "Inflation composite {:.0} adds a hard-asset hedge",
                    macro_state.inflation_composite
                ));
            }
            gates.bullets.push(format!(
                "{} regime with {} alert: favor cashflow and stability",
                macro_state.regime, macro_state.alert_level
            ));
        }

        if macro_state.risk_off {
            gates.stability_minimum = gates.stability_minimum.max(RISK_OFF_STABILITY_MIN);
        }

        gates
    }

    fn deploy(&self) -> BTreeSet<Layer> {
        self.base
            .iter()
            .filter(|l| !self.avoid.contains(l) && !self.suppressed.contains(l))
            .copied()
            .collect()
    }

    fn allowed_adds(&self) -> BTreeSet<Layer> {
        let mut allowed = self.deploy();
        allowed.insert(Layer::Stability);
        allowed
            .into_iter()
            .filter(|l| !self.avoid.contains(l) && !self.suppressed.contains(l))
            .collect()
    }
}

fn base_stability_minimum(alert: AlertLevel) -> u8 {
    match alert {
        AlertLevel::Green => 10,
        AlertLevel::Yellow => 15,
        AlertLevel::Red => 25,
    }
}

/// 새 자금을 추가해도 되는 레이어.
///
/// 배치 레이어와 안정성 레이어에서 회피/제외 레이어를 뺀 집합입니다.
pub fn allowed_adds(
    macro_state: &MacroState,
    engine_scores: &[EngineScore],
    confirmations: &Confirmations,
) -> BTreeSet<Layer> {
    PolicyGates::evaluate(macro_state, engine_scores, confirmations).allowed_adds()
}

/// 액션 정책 생성.
///
/// 누락된 확인 신호는 해당 규칙만 건너뛰며 실패하지 않습니다.
pub fn build_action_policy(
    macro_state: &MacroState,
    engine_scores: &[EngineScore],
    confirmations: &Confirmations,
) -> ActionPolicy {
    let gates = PolicyGates::evaluate(macro_state, engine_scores, confirmations);
    let deploy = gates.deploy();

    debug!(
        regime = %macro_state.regime,
        alert_level = %macro_state.alert_level,
        deploy = deploy.len(),
        avoid = gates.avoid.len(),
        skipped = gates.skipped.len(),
        "액션 정책 생성"
    );

    let mut reasoning_bullets = gates.bullets;
    reasoning_bullets.push(format!("Keep at least {}% in the stability layer", gates.stability_minimum));

    ActionPolicy {
        this_week_bias: this_week_bias(macro_state, &deploy, gates.microstress_bias),
        example_tickers: example_tickers(&deploy),
        deploy_layers: deploy.into_iter().collect(),
        avoid_layers: gates.avoid.iter().copied().collect(),
        stability_minimum: gates.stability_minimum,
        reasoning_bullets,
        rebalance_triggers: rebalance_triggers(macro_state),
        skipped_rules: gates.skipped,
    }
}

fn this_week_bias(macro_state: &MacroState, deploy: &BTreeSet<Layer>, microstress: bool) -> String {
    let mut bias = if deploy.is_empty() {
        "Hold: no layer qualifies for new capital this week".to_string()
    } else {
        let layers: Vec<&str> = deploy.iter().map(|l| l.as_str()).collect();
        let stance = if macro_state.regime == Regime::RiskOn
            && macro_state.alert_level == AlertLevel::Green
        {
            "Lean in"
        } else {
            "Defensive"
        };
        format!("{}: direct new capital to {}", stance, layers.join(", "))
    };
    if microstress {
        bias.push_str("; credit microstress tilts the bias toward stability and cashflow");
    }
    bias
}

fn example_tickers(deploy: &BTreeSet<Layer>) -> BTreeMap<Layer, Vec<String>> {
    let mut remaining = MAX_EXAMPLE_TICKERS;
    let mut examples = BTreeMap::new();
    for (layer, tickers) in LAYER_EXAMPLES.iter().filter(|(l, _)| deploy.contains(l)) {
        if remaining == 0 {
            break;
        }
        let take = EXAMPLES_PER_LAYER.min(remaining);
        let picked: Vec<String> = tickers.iter().take(take).map(|t| t.to_string()).collect();
        remaining -= picked.len();
        examples.insert(*layer, picked);
    }
    examples
}

fn rebalance_triggers(macro_state: &MacroState) -> Vec<String> {
    let mut triggers = vec!["Any layer drifting outside its target band".to_string()];
    match macro_state.alert_level {
        AlertLevel::Green => {
            triggers.push("Alert level moving to YELLOW or RED".to_string());
        }
        AlertLevel::Yellow => {
            triggers.push("Alert level escalating to RED".to_string());
            triggers.push("Alert level easing to GREEN reopens high-beta adds".to_string());
        }
        AlertLevel::Red => {
            triggers.push("Alert level easing to YELLOW".to_string());
        }
    }
    if macro_state.regime != Regime::Mixed {
        triggers.push(format!("Regime change away from {}", macro_state.regime));
    } else {
        triggers.push("Regime resolving out of Mixed".to_string());
    }
    triggers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regime::macro_state;
    use crate::scoring::score_all_engines;
    use compass_core::MacroInputs;

    fn mock_pipeline(confirmations: &Confirmations) -> ActionPolicy {
        let inputs = MacroInputs::mock();
        let scores = score_all_engines(&inputs).unwrap().engine_scores;
        build_action_policy(&macro_state(&inputs), &scores, confirmations)
    }

    fn state(regime: Regime, alert_level: AlertLevel, inflation_composite: f64) -> MacroState {
        MacroState {
            regime,
            alert_level,
            inflation_composite,
            risk_off: regime == Regime::RiskOff,
        }
    }

    #[test]
    fn test_mock_avoids_volatility() {
        let policy = mock_pipeline(&Confirmations::default());
        assert!(policy.avoids(Layer::Volatility));
        assert_eq!(policy.stability_minimum, 15);
        assert_eq!(policy.deploy_layers, vec![Layer::Stability, Layer::Cashflow]);
        assert_eq!(policy.skipped_rules.len(), 3);
    }

    #[test]
    fn test_risk_on_green_deploys_growth() {
        let policy = build_action_policy(
            &state(Regime::RiskOn, AlertLevel::Green, 50.0),
            &[],
            &Confirmations {
                breadth: Some(BreadthSignal::Confirming),
                btc_trend: Some(BtcTrend::Bullish),
                credit_microstress: Some(AlertLevel::Green),
            },
        );
        assert_eq!(
            policy.deploy_layers,
            vec![Layer::Cashflow, Layer::Growth, Layer::Volatility]
        );
        assert!(policy.avoid_layers.is_empty());
        assert_eq!(policy.stability_minimum, 10);
        assert!(policy.skipped_rules.is_empty());
        assert!(policy.this_week_bias.starts_with("Lean in"));
    }

    #[test]
    fn test_red_alert_avoids_high_beta() {
        let policy = build_action_policy(
            &state(Regime::RiskOff, AlertLevel::Red, 40.0),
            &[],
            &Confirmations::default(),
        );
        assert!(policy.avoids(Layer::Growth));
        assert!(policy.avoids(Layer::Volatility));
        assert_eq!(policy.stability_minimum, 25);
    }

    #[test]
    fn test_breadth_diverging_suppresses_growth() {
        let policy = build_action_policy(
            &state(Regime::RiskOn, AlertLevel::Green, 50.0),
            &[],
            &Confirmations {
                breadth: Some(BreadthSignal::Diverging),
                ..Default::default()
            },
        );
        assert!(!policy.deploy_layers.contains(&Layer::Growth));
        assert!(!policy.avoids(Layer::Growth));
        assert_eq!(policy.stability_minimum, 15);
    }

    #[test]
    fn test_microstress_raises_floor() {
        let policy = build_action_policy(
            &state(Regime::Mixed, AlertLevel::Green, 50.0),
            &[],
            &Confirmations {
                credit_microstress: Some(AlertLevel::Red),
                ..Default::default()
            },
        );
        assert_eq!(policy.stability_minimum, 30);
        assert!(policy.this_week_bias.contains("credit microstress"));
    }

    #[test]
    fn test_inflation_adds_hard_asset() {
        let policy = build_action_policy(
            &state(Regime::Inflationary, AlertLevel::Yellow, 75.0),
            &[],
            &Confirmations::default(),
        );
        assert!(policy.deploy_layers.contains(&Layer::HardAsset));
    }

    #[test]
    fn test_example_tickers_capped() {
        let policy = build_action_policy(
            &state(Regime::Inflationary, AlertLevel::Green, 90.0),
            &[],
            &Confirmations::default(),
        );
        let total: usize = policy.example_tickers.values().map(Vec::len).sum();
        assert!(total <= MAX_EXAMPLE_TICKERS);
        for tickers in policy.example_tickers.values() {
            assert!(tickers.len() <= EXAMPLES_PER_LAYER);
        }
        for layer in policy.example_tickers.keys() {
            assert!(policy.deploy_layers.contains(layer));
        }
    }

    #[test]
    fn test_allowed_adds_excludes_avoid() {
        let inputs = MacroInputs::mock();
        let scores = score_all_engines(&inputs).unwrap().engine_scores;
        let allowed = allowed_adds(&macro_state(&inputs), &scores, &Confirmations::default());
        assert!(!allowed.contains(&Layer::Volatility));
        assert!(allowed.contains(&Layer::Stability));
    }
}
