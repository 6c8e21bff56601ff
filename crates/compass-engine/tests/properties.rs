//! 스코어링/정책 파이프라인 속성 테스트

use proptest::prelude::*;

use compass_core::{
    AlertLevel, BreadthSignal, BtcTrend, Confirmations, CreditTrend, EngineId, EngineStatus,
    InflationTrend, Layer, MacroInputs, Stance, TargetTable,
};
use compass_engine::{
    build_action_policy, compute_suggested_moves, compute_summary, macro_state, score_all_engines,
    MoveDirection,
};

fn btc_trend() -> impl Strategy<Value = BtcTrend> {
    prop_oneof![Just(BtcTrend::Bullish), Just(BtcTrend::Bearish)]
}

fn inflation_trend() -> impl Strategy<Value = InflationTrend> {
    prop_oneof![
        Just(InflationTrend::Rising),
        Just(InflationTrend::Falling),
        Just(InflationTrend::Stable)
    ]
}

fn credit_trend() -> impl Strategy<Value = CreditTrend> {
    prop_oneof![
        Just(CreditTrend::Widening),
        Just(CreditTrend::Tightening),
        Just(CreditTrend::Stable)
    ]
}

fn alert() -> impl Strategy<Value = AlertLevel> {
    prop_oneof![
        Just(AlertLevel::Green),
        Just(AlertLevel::Yellow),
        Just(AlertLevel::Red)
    ]
}

fn confirmations() -> impl Strategy<Value = Confirmations> {
    (
        proptest::option::of(prop_oneof![
            Just(BreadthSignal::Confirming),
            Just(BreadthSignal::Diverging)
        ]),
        proptest::option::of(btc_trend()),
        proptest::option::of(alert()),
    )
        .prop_map(|(breadth, btc_trend, credit_microstress)| Confirmations {
            breadth,
            btc_trend,
            credit_microstress,
        })
}

fn macro_inputs() -> impl Strategy<Value = MacroInputs> {
    (
        (
            1_000.0f64..150_000.0,
            1_000.0f64..150_000.0,
            btc_trend(),
            0.0f64..8.0,
            -2.0f64..4.0,
            -1.0f64..10.0,
            inflation_trend(),
        ),
        (
            200.0f64..1_200.0,
            50.0f64..400.0,
            credit_trend(),
            -4.0f64..6.0,
            35.0f64..65.0,
            2.5f64..10.0,
        ),
        (
            0.0f64..100.0,
            30.0f64..150.0,
            1_000.0f64..4_000.0,
            85.0f64..125.0,
            9.0f64..80.0,
            -40.0f64..40.0,
        ),
    )
        .prop_map(
            |(
                (btc_price, btc_200dma, btc_trend, nominal, real, inflation, inflation_trend),
                (hy_oas, ig_oas, credit_trend, gdp_growth, pmi, unemployment_rate),
                (liquidity_score, oil_price, gold_price, usd_strength, vix, equity_momentum),
            )| MacroInputs {
                btc_price,
                btc_200dma,
                btc_trend,
                nominal_rate_10y: nominal,
                real_rate_10y: real,
                inflation,
                inflation_trend,
                hy_oas,
                ig_oas,
                credit_trend,
                gdp_growth,
                pmi,
                unemployment_rate,
                liquidity_score,
                oil_price,
                gold_price,
                usd_strength,
                vix,
                equity_momentum,
            },
        )
}

proptest! {
    #[test]
    fn scores_are_bounded_and_gates_never_overweight(inputs in macro_inputs()) {
        let output = score_all_engines(&inputs).unwrap();
        prop_assert_eq!(output.engine_scores.len(), 12);
        for score in &output.engine_scores {
            prop_assert!(score.score <= 100);
            prop_assert!(score.confidence <= 100);
            if score.status == EngineStatus::Gated {
                prop_assert_ne!(score.stance, Stance::Overweight);
                prop_assert!(score.confidence >= 75);
            }
        }
    }

    #[test]
    fn scoring_is_idempotent(inputs in macro_inputs()) {
        prop_assert_eq!(score_all_engines(&inputs).unwrap(), score_all_engines(&inputs).unwrap());
    }

    #[test]
    fn raising_vix_never_relaxes_policy(
        inputs in macro_inputs(),
        bump in 0.0f64..40.0,
        conf in confirmations(),
    ) {
        let calm_scores = score_all_engines(&inputs).unwrap().engine_scores;
        let calm = build_action_policy(&macro_state(&inputs), &calm_scores, &conf);

        let stressed_inputs = MacroInputs { vix: inputs.vix + bump, ..inputs.clone() };
        let stressed_scores = score_all_engines(&stressed_inputs).unwrap().engine_scores;
        let stressed = build_action_policy(&macro_state(&stressed_inputs), &stressed_scores, &conf);

        for score in calm_scores.iter().filter(|s| s.is_gated()) {
            prop_assert!(stressed.avoids(score.engine.layer()));
        }
        prop_assert!(stressed.stability_minimum >= calm.stability_minimum);
    }

    #[test]
    fn bearish_btc_never_relaxes_policy(inputs in macro_inputs(), conf in confirmations()) {
        let calm_scores = score_all_engines(&inputs).unwrap().engine_scores;
        let calm = build_action_policy(&macro_state(&inputs), &calm_scores, &conf);

        let bearish_inputs = MacroInputs { btc_trend: BtcTrend::Bearish, ..inputs.clone() };
        let bearish_conf = Confirmations { btc_trend: Some(BtcTrend::Bearish), ..conf };
        let bearish_scores = score_all_engines(&bearish_inputs).unwrap().engine_scores;
        let bearish = build_action_policy(&macro_state(&bearish_inputs), &bearish_scores, &bearish_conf);

        for layer in &calm.avoid_layers {
            prop_assert!(bearish.avoids(*layer));
        }
        prop_assert!(bearish.avoids(Layer::Volatility));
        prop_assert!(bearish.stability_minimum >= calm.stability_minimum);
    }

    #[test]
    fn escalating_alert_never_relaxes_policy(inputs in macro_inputs(), conf in confirmations()) {
        let scores = score_all_engines(&inputs).unwrap().engine_scores;
        let base = macro_state(&inputs);
        let mut previous = build_action_policy(
            &compass_core::MacroState { alert_level: AlertLevel::Green, ..base },
            &scores,
            &conf,
        );
        for level in [AlertLevel::Yellow, AlertLevel::Red] {
            let next = build_action_policy(
                &compass_core::MacroState { alert_level: level, ..base },
                &scores,
                &conf,
            );
            for layer in &previous.avoid_layers {
                prop_assert!(next.avoids(*layer));
            }
            prop_assert!(next.stability_minimum >= previous.stability_minimum);
            previous = next;
        }
    }

    #[test]
    fn suggested_moves_never_increase_avoided_layers(
        inputs in macro_inputs(),
        conf in confirmations(),
        weights in proptest::collection::vec(0u32..40, 12),
    ) {
        let scores = score_all_engines(&inputs).unwrap().engine_scores;
        let state = macro_state(&inputs);
        let policy = build_action_policy(&state, &scores, &conf);

        let examples = ["QQQ", "VTV", "SCHD", "HYG", "VNQ", "XLP", "TLT", "SGOV", "TIP", "XLE", "GLD", "IBIT"];
        let holdings = examples
            .iter()
            .zip(&weights)
            .map(|(t, w)| compass_core::Holding::new(*t, compass_core::Account::Taxable, (*w).into()))
            .collect();
        let summary = compute_summary(&compass_core::Portfolio::new(holdings), &TargetTable::default());
        let moves = compute_suggested_moves(&summary.engine_deltas, &state, &scores, &conf);

        for m in &moves.moves {
            if m.direction == MoveDirection::Increase {
                prop_assert!(!policy.avoids(m.layer), "{} increased while {} avoided", m.engine, m.layer);
            }
            prop_assert!(m.magnitude_pct <= compass_engine::moves::MAX_MOVE_PCT);
        }
    }

    #[test]
    fn widening_credit_never_relaxes_policy(inputs in macro_inputs(), conf in confirmations()) {
        let calm_scores = score_all_engines(&inputs).unwrap().engine_scores;
        let calm = build_action_policy(&macro_state(&inputs), &calm_scores, &conf);

        let widening_inputs = MacroInputs { credit_trend: CreditTrend::Widening, ..inputs.clone() };
        let widening_scores = score_all_engines(&widening_inputs).unwrap().engine_scores;
        let widening = build_action_policy(&macro_state(&widening_inputs), &widening_scores, &conf);

        for layer in &calm.avoid_layers {
            prop_assert!(widening.avoids(*layer), "{} dropped from avoid", layer);
        }
        prop_assert!(widening.stability_minimum >= calm.stability_minimum);
    }

    #[test]
    fn raising_hy_oas_never_relaxes_policy(
        inputs in macro_inputs(),
        bump in 0.0f64..600.0,
        conf in confirmations(),
    ) {
        let calm_scores = score_all_engines(&inputs).unwrap().engine_scores;
        let calm = build_action_policy(&macro_state(&inputs), &calm_scores, &conf);

        let stressed_inputs = MacroInputs { hy_oas: inputs.hy_oas + bump, ..inputs.clone() };
        let stressed_scores = score_all_engines(&stressed_inputs).unwrap().engine_scores;
        let stressed = build_action_policy(&macro_state(&stressed_inputs), &stressed_scores, &conf);

        for layer in &calm.avoid_layers {
            prop_assert!(stressed.avoids(*layer), "{} dropped from avoid", layer);
        }
        prop_assert!(stressed.stability_minimum >= calm.stability_minimum);
        prop_assert!(!macro_state(&inputs).risk_off || macro_state(&stressed_inputs).risk_off);
    }
}

#[test]
fn mock_scenario_gates_bitcoin_and_avoids_volatility() {
    let inputs = MacroInputs::mock();
    assert_eq!(inputs.hy_oas, 480.0);
    assert_eq!(inputs.btc_trend, BtcTrend::Bearish);
    assert_eq!(inputs.vix, 22.0);

    let output = score_all_engines(&inputs).unwrap();
    let btc = &output.engine_scores[EngineId::BitcoinOptionality.index()];
    assert!(btc.status == EngineStatus::Gated || btc.stance == Stance::Underweight);

    let policy = build_action_policy(&macro_state(&inputs), &output.engine_scores, &Confirmations::default());
    assert!(policy.avoids(Layer::Volatility));
}

#[test]
fn risk_off_floor_survives_inflationary_label() {
    // HY OAS 510이면 Risk-Off 조건이 성립하지만, 크레딧이 확대되면
    // 상승 인플레이션이 먼저 매칭되어 라벨은 Inflationary가 됩니다.
    let calm_inputs = MacroInputs {
        inflation_trend: InflationTrend::Rising,
        inflation: 3.0,
        credit_trend: CreditTrend::Stable,
        hy_oas: 510.0,
        vix: 15.0,
        equity_momentum: 1.0,
        liquidity_score: 60.0,
        ..MacroInputs::mock()
    };
    let widening_inputs = MacroInputs {
        credit_trend: CreditTrend::Widening,
        ..calm_inputs.clone()
    };

    let policy_for = |inputs: &MacroInputs| {
        let scores = score_all_engines(inputs).unwrap().engine_scores;
        build_action_policy(&macro_state(inputs), &scores, &Confirmations::default())
    };
    let calm = policy_for(&calm_inputs);
    let widening = policy_for(&widening_inputs);

    assert!(macro_state(&calm_inputs).risk_off);
    assert!(macro_state(&widening_inputs).risk_off);
    assert!(calm.stability_minimum >= 20);
    assert!(widening.stability_minimum >= calm.stability_minimum);
    for layer in &calm.avoid_layers {
        assert!(widening.avoids(*layer));
    }
}
