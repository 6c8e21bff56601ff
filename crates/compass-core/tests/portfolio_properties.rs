//! 포트폴리오 유효성 및 통계 유틸리티 속성 테스트

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use compass_core::statistics::correlation;
use compass_core::{
    classify_ticker, is_valid_total, total_weight, Account, EngineId, Holding, Portfolio,
};

fn holdings_from_cents(cents: &[u32]) -> Vec<Holding> {
    cents
        .iter()
        .enumerate()
        .map(|(i, c)| Holding::new(format!("T{}", i), Account::Taxable, Decimal::new(*c as i64, 2)))
        .collect()
}

proptest! {
    #[test]
    fn validity_matches_tolerance(cents in proptest::collection::vec(0u32..6000, 1..8)) {
        let holdings = holdings_from_cents(&cents);
        let total = total_weight(&holdings);
        let expected = (total - dec!(100)).abs() <= dec!(0.25);
        prop_assert_eq!(is_valid_total(total), expected);
    }

    #[test]
    fn correlation_with_self_is_one(xs in proptest::collection::vec(-1000.0f64..1000.0, 3..40)) {
        if let Some(c) = correlation(&xs, &xs) {
            prop_assert!((c - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn correlation_is_bounded(
        pairs in proptest::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 2..40)
    ) {
        let (x, y): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        if let Some(c) = correlation(&x, &y) {
            prop_assert!((-1.0..=1.0).contains(&c));
        }
    }

    #[test]
    fn classification_never_panics(ticker in "[A-Za-z0-9.\\- ]{0,12}") {
        let result = classify_ticker(&ticker);
        prop_assert!(result.confidence() <= 100);
    }
}

#[test]
fn aapl_sgov_portfolio_is_valid() {
    let portfolio = Portfolio::new(vec![
        Holding::new("AAPL", Account::Taxable, dec!(60)),
        Holding::new("SGOV", Account::Taxable, dec!(40)),
    ]);
    let total = total_weight(&portfolio.effective_holdings());
    assert_eq!(total, dec!(100));
    assert!(is_valid_total(total));
    assert_eq!(classify_ticker("AAPL").engine(), EngineId::GrowthEquity);
    assert_eq!(classify_ticker("SGOV").engine(), EngineId::CashEquivalents);
}

#[test]
fn portfolio_json_round_trip() {
    let mut portfolio = Portfolio::new(vec![
        Holding::new("qqq", Account::Roth, dec!(55.5)).with_notes("core growth"),
        Holding::new("TLT", Account::Retirement401k, dec!(44.5)),
    ]);
    portfolio.use_demo_holdings = false;

    let json = serde_json::to_string(&portfolio).unwrap();
    let restored: Portfolio = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, portfolio);
    assert_eq!(restored.holdings[0].ticker, "QQQ");
}
