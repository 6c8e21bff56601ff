//! 매크로 레짐 및 경보 수준 판단.
//!
//! # 레짐 결정 테이블 (첫 적중 채택)
//!
//! 1. **Inflationary**: 인플레이션 상승 & (크레딧 확대 또는 인플레이션 >= 4.0)
//! 2. **Deflationary**: 인플레이션 하락 & (GDP < 1.0 또는 PMI < 47)
//! 3. **Risk-Off**: HY OAS > 500 또는 VIX > 28 또는 (크레딧 확대 & 모멘텀 < 0)
//! 4. **Risk-On**: HY OAS < 400 & VIX < 20 & 모멘텀 > 0 & PMI >= 50
//! 5. **Mixed**: 그 외
//!
//! # 스트레스 포인트
//!
//! | 조건 | 점수 |
//! |------|------|
//! | HY OAS > 450 / > 550 | +1 / +1 |
//! | VIX > 25 / > 32 | +1 / +1 |
//! | 크레딧 확대 | +1 |
//! | 모멘텀 < -5 | +1 |
//! | 유동성 < 35 | +1 |

use compass_core::{
    AlertLevel, BtcTrend, CreditTrend, InflationTrend, MacroInputs, MacroState, Regime,
};

/// 레짐 분류.
pub fn classify_regime(inputs: &MacroInputs) -> Regime {
    let widening = inputs.credit_trend == CreditTrend::Widening;

    if inputs.inflation_trend == InflationTrend::Rising && (widening || inputs.inflation >= 4.0) {
        return Regime::Inflationary;
    }
    if inputs.inflation_trend == InflationTrend::Falling
        && (inputs.gdp_growth < 1.0 || inputs.pmi < 47.0)
    {
        return Regime::Deflationary;
    }
    if risk_off_conditions(inputs) {
        return Regime::RiskOff;
    }
    if inputs.hy_oas < 400.0
        && inputs.vix < 20.0
        && inputs.equity_momentum > 0.0
        && inputs.pmi >= 50.0
    {
        return Regime::RiskOn;
    }
    Regime::Mixed
}

/// Risk-Off 조건 (HY OAS > 500, VIX > 28, 크레딧 확대 & 모멘텀 < 0).
///
/// 레짐 라벨과 별개로 평가되며, 스트레스가 늘면 false에서 true로만 바뀝니다.
pub fn risk_off_conditions(inputs: &MacroInputs) -> bool {
    inputs.hy_oas > 500.0
        || inputs.vix > 28.0
        || (inputs.credit_trend == CreditTrend::Widening && inputs.equity_momentum < 0.0)
}

/// 스트레스 포인트 합계.
pub fn stress_points(inputs: &MacroInputs) -> u32 {
    let checks = [
        inputs.hy_oas > 450.0,
        inputs.hy_oas > 550.0,
        inputs.vix > 25.0,
        inputs.vix > 32.0,
        inputs.credit_trend == CreditTrend::Widening,
        inputs.equity_momentum < -5.0,
        inputs.liquidity_score < 35.0,
    ];
    checks.iter().filter(|hit| **hit).count() as u32
}

/// 경보 수준.
pub fn alert_level(inputs: &MacroInputs) -> AlertLevel {
    AlertLevel::from_stress_points(stress_points(inputs))
}

/// 인플레이션 합성 지수 (0~100).
pub fn inflation_composite(inputs: &MacroInputs) -> f64 {
    let mut composite = 50.0 + 10.0 * (inputs.inflation - 2.5);
    composite += match inputs.inflation_trend {
        InflationTrend::Rising => 15.0,
        InflationTrend::Falling => -15.0,
        InflationTrend::Stable => 0.0,
    };
    if inputs.oil_price > 90.0 {
        composite += 10.0;
    }
    if inputs.real_rate_10y < 0.0 {
        composite += 10.0;
    }
    composite.clamp(0.0, 100.0)
}

/// 입력으로부터 매크로 상태 도출.
pub fn macro_state(inputs: &MacroInputs) -> MacroState {
    MacroState {
        regime: classify_regime(inputs),
        alert_level: alert_level(inputs),
        inflation_composite: inflation_composite(inputs),
        risk_off: risk_off_conditions(inputs),
    }
}

/// 현재 레짐을 설명하는 주요 동인.
pub(crate) fn primary_drivers(inputs: &MacroInputs, regime: Regime) -> Vec<String> {
    let mut drivers = Vec::new();

    match regime {
        Regime::Inflationary => drivers.push(format!(
            "Inflation {:.1}% and {}",
            inputs.inflation,
            trend_word(inputs.inflation_trend)
        )),
        Regime::Deflationary => drivers.push(format!(
            "GDP growth {:.1}% with PMI {:.1} as inflation cools",
            inputs.gdp_growth, inputs.pmi
        )),
        _ => {}
    }

    if inputs.hy_oas > 450.0 {
        drivers.push(format!("High-yield spreads elevated at {:.0} bps", inputs.hy_oas));
    } else if inputs.hy_oas < 400.0 {
        drivers.push(format!("High-yield spreads tight at {:.0} bps", inputs.hy_oas));
    }
    if inputs.credit_trend == CreditTrend::Widening {
        drivers.push("Credit spreads widening".to_string());
    }
    if inputs.vix > 20.0 {
        drivers.push(format!("VIX elevated at {:.1}", inputs.vix));
    } else {
        drivers.push(format!("VIX calm at {:.1}", inputs.vix));
    }
    if inputs.real_rate_10y > 2.0 {
        drivers.push(format!("Restrictive real 10Y yield at {:.2}%", inputs.real_rate_10y));
    }
    if inputs.pmi < 50.0 {
        drivers.push(format!("Manufacturing PMI in contraction at {:.1}", inputs.pmi));
    }
    drivers.push(format!(
        "Bitcoin {} its 200-day average ({:+.1}%)",
        match inputs.btc_trend {
            BtcTrend::Bullish => "above",
            BtcTrend::Bearish => "below",
        },
        inputs.btc_premium_to_200dma_pct()
    ));

    drivers.truncate(5);
    drivers
}

/// 레짐 전환을 유발할 수 있는 관찰 포인트.
pub(crate) fn watch_triggers(inputs: &MacroInputs, regime: Regime) -> Vec<String> {
    let mut triggers = Vec::new();

    if regime != Regime::RiskOff {
        if inputs.hy_oas <= 500.0 {
            triggers.push(format!(
                "HY OAS above 500 bps (now {:.0}) would flip to Risk-Off",
                inputs.hy_oas
            ));
        }
        if inputs.vix <= 28.0 {
            triggers.push(format!("VIX above 28 (now {:.1}) would flip to Risk-Off", inputs.vix));
        }
    } else {
        triggers.push("HY OAS back below 400 bps with VIX under 20 would reopen Risk-On".to_string());
    }

    if inputs.hy_oas <= 600.0 {
        triggers.push("HY OAS above 600 bps gates credit carry".to_string());
    }
    if inputs.real_rate_10y <= 2.5 {
        triggers.push(format!(
            "Real 10Y above 2.5% (now {:.2}%) with negative momentum gates growth equity",
            inputs.real_rate_10y
        ));
    }
    match inputs.btc_trend {
        BtcTrend::Bearish => triggers.push(format!(
            "Bitcoin reclaiming its 200-day average (${:.0}) lifts the optionality gate",
            inputs.btc_200dma
        )),
        BtcTrend::Bullish => triggers.push(format!(
            "Bitcoin losing its 200-day average (${:.0}) with VIX above 20 gates optionality",
            inputs.btc_200dma
        )),
    }
    if inputs.inflation_trend != InflationTrend::Rising {
        triggers.push("Re-accelerating inflation with widening credit would flip to Inflationary".to_string());
    }

    triggers
}

fn trend_word(trend: InflationTrend) -> &'static str {
    match trend {
        InflationTrend::Rising => "rising",
        InflationTrend::Falling => "falling",
        InflationTrend::Stable => "stable",
    }
}
