//! 엔진 카탈로그 - 12개 경제 엔진의 정적 레지스트리.
//!
//! 각 엔진은 메타데이터와 함께 순서가 있는 스코어링 규칙 테이블,
//! 그리고 점수와 무관한 게이트(비토) 규칙을 가집니다.
//!
//! | 엔진 | 레이어 | 게이트 |
//! |------|--------|--------|
//! | growth_equity | growth | 실질금리 > 2.5 & 모멘텀 < 0 |
//! | value_cyclicals | growth | - |
//! | dividend_cashflow | cashflow | - |
//! | credit_carry | cashflow | HY OAS > 600 |
//! | real_estate | cashflow | - |
//! | quality_defensive | stability | - |
//! | long_duration | stability | - |
//! | cash_equivalents | stability | - |
//! | inflation_linked | hard_asset | - |
//! | energy_commodities | hard_asset | - |
//! | precious_metals | hard_asset | - |
//! | bitcoin_optionality | volatility | BTC 약세 & VIX > 20 |

use super::engine::{Engine, EngineId, Layer};
use super::macro_inputs::{BtcTrend, CreditTrend, InflationTrend};
use super::rules::{Condition, GateRule, Metric, ScoreRule};

use super::rules::Condition::{Above, Below, BtcTrendIs, CreditTrendIs, InflationTrendIs};

const fn rule(when: Condition, delta: i32, reason: &'static str) -> ScoreRule {
    ScoreRule {
        when,
        delta,
        reason,
    }
}

// ==================== Growth ====================

const GROWTH_EQUITY_RULES: &[ScoreRule] = &[
    rule(Above(Metric::RealRate10Y, 2.0), -15, "Real 10Y yield above 2% compresses long-duration multiples"),
    rule(Below(Metric::RealRate10Y, 1.0), 10, "Low real yields support growth valuations"),
    rule(Above(Metric::EquityMomentum, 5.0), 15, "Positive 6-month equity momentum"),
    rule(Below(Metric::EquityMomentum, 0.0), -15, "Negative 6-month equity momentum"),
    rule(Above(Metric::LiquidityScore, 60.0), 10, "Ample liquidity"),
    rule(Below(Metric::LiquidityScore, 40.0), -10, "Tight liquidity"),
    rule(Above(Metric::Vix, 25.0), -10, "Elevated equity volatility"),
    rule(Above(Metric::HyOas, 450.0), -10, "Credit stress weighs on risk appetite"),
];

const GROWTH_EQUITY_GATES: &[GateRule] = &[GateRule {
    when: Condition::All(&[
        Above(Metric::RealRate10Y, 2.5),
        Below(Metric::EquityMomentum, 0.0),
    ]),
    reason: "Gate: real yields above 2.5% with negative equity momentum",
}];

const VALUE_CYCLICALS_RULES: &[ScoreRule] = &[
    rule(Above(Metric::Pmi, 52.0), 15, "Manufacturing expansion"),
    rule(Below(Metric::Pmi, 48.0), -10, "Manufacturing contraction"),
    rule(Above(Metric::GdpGrowth, 2.5), 10, "Above-trend real growth"),
    rule(Below(Metric::GdpGrowth, 1.0), -15, "Growth stalling"),
    rule(CreditTrendIs(CreditTrend::Tightening), 10, "Credit spreads tightening"),
    rule(CreditTrendIs(CreditTrend::Widening), -10, "Credit spreads widening"),
    rule(Above(Metric::OilPrice, 95.0), -5, "Oil shock squeezes margins"),
];

// ==================== Cashflow ====================

const DIVIDEND_CASHFLOW_RULES: &[ScoreRule] = &[
    rule(Below(Metric::Vix, 20.0), 5, "Calm markets favor carry"),
    rule(Above(Metric::NominalRate10Y, 5.0), -10, "High risk-free yields compete with dividends"),
    rule(Below(Metric::NominalRate10Y, 3.5), 10, "Lower yields raise the appeal of dividend income"),
    rule(Above(Metric::HyOas, 450.0), 5, "Stress rotates toward established cashflow"),
    rule(Below(Metric::GdpGrowth, 0.0), -10, "Recession risk to payouts"),
    rule(InflationTrendIs(InflationTrend::Rising), -5, "Rising inflation erodes fixed payouts"),
];

const CREDIT_CARRY_RULES: &[ScoreRule] = &[
    rule(Above(Metric::HyOas, 450.0), -20, "HY spreads above 450 bps signal credit stress"),
    rule(Below(Metric::HyOas, 350.0), 10, "Benign credit conditions"),
    rule(CreditTrendIs(CreditTrend::Widening), -10, "Spreads widening"),
    rule(CreditTrendIs(CreditTrend::Tightening), 10, "Spreads tightening"),
    rule(Above(Metric::UnemploymentRate, 5.0), -10, "Labor weakness raises default risk"),
    rule(Above(Metric::LiquidityScore, 60.0), 5, "Supportive liquidity"),
];

const CREDIT_CARRY_GATES: &[GateRule] = &[GateRule {
    when: Above(Metric::HyOas, 600.0),
    reason: "Gate: HY spreads above 600 bps",
}];

const REAL_ESTATE_RULES: &[ScoreRule] = &[
    rule(Above(Metric::NominalRate10Y, 4.5), -15, "High long rates pressure cap rates"),
    rule(Below(Metric::NominalRate10Y, 3.5), 15, "Lower rates support property valuations"),
    rule(InflationTrendIs(InflationTrend::Rising), 5, "Rents reprice with inflation"),
    rule(CreditTrendIs(CreditTrend::Widening), -10, "Tighter financing conditions"),
    rule(Above(Metric::GdpGrowth, 2.0), 5, "Healthy occupancy demand"),
];

// ==================== Stability ====================

const QUALITY_DEFENSIVE_RULES: &[ScoreRule] = &[
    rule(Above(Metric::Vix, 20.0), 10, "Volatility favors quality balance sheets"),
    rule(Below(Metric::Pmi, 50.0), 10, "Slowing cycle favors defensives"),
    rule(Above(Metric::EquityMomentum, 10.0), -10, "Strong risk-on tape leaves defensives behind"),
    rule(Above(Metric::HyOas, 450.0), 5, "Credit stress rotates into quality"),
    rule(Below(Metric::Vix, 15.0), -5, "Complacent markets"),
];

const LONG_DURATION_RULES: &[ScoreRule] = &[
    rule(InflationTrendIs(InflationTrend::Falling), 15, "Disinflation supports duration"),
    rule(InflationTrendIs(InflationTrend::Rising), -15, "Rising inflation hurts duration"),
    rule(Below(Metric::GdpGrowth, 1.0), 10, "Growth scare bids Treasuries"),
    rule(Above(Metric::Inflation, 4.0), -10, "Inflation well above target"),
    rule(Above(Metric::NominalRate10Y, 4.5), 5, "High starting yield cushions duration"),
    rule(Above(Metric::Vix, 28.0), 10, "Flight to quality"),
];

const CASH_EQUIVALENTS_RULES: &[ScoreRule] = &[
    rule(Above(Metric::NominalRate10Y, 4.0), 10, "Attractive yields on cash"),
    rule(Above(Metric::Vix, 25.0), 10, "Dry powder has option value"),
    rule(Above(Metric::HyOas, 450.0), 10, "Credit stress raises the value of liquidity"),
    rule(Below(Metric::Vix, 15.0), -10, "Cash drag in calm markets"),
    rule(Above(Metric::EquityMomentum, 10.0), -10, "Opportunity cost in a strong risk-on tape"),
    rule(Below(Metric::NominalRate10Y, 2.0), -10, "Low yields on cash"),
];

// ==================== Hard assets ====================

const INFLATION_LINKED_RULES: &[ScoreRule] = &[
    rule(InflationTrendIs(InflationTrend::Rising), 15, "Rising inflation lifts breakevens"),
    rule(Above(Metric::Inflation, 3.0), 5, "Inflation above target"),
    rule(InflationTrendIs(InflationTrend::Falling), -10, "Disinflation compresses breakevens"),
    rule(Above(Metric::RealRate10Y, 2.0), 5, "Positive real yield at purchase"),
    rule(Below(Metric::RealRate10Y, 0.0), -5, "Negative real yield"),
];

const ENERGY_COMMODITIES_RULES: &[ScoreRule] = &[
    rule(Above(Metric::OilPrice, 85.0), 10, "Firm oil prices"),
    rule(Below(Metric::OilPrice, 65.0), -15, "Weak oil prices"),
    rule(InflationTrendIs(InflationTrend::Rising), 10, "Commodities lead rising inflation"),
    rule(Above(Metric::Pmi, 52.0), 10, "Industrial demand expanding"),
    rule(Below(Metric::Pmi, 47.0), -10, "Industrial demand contracting"),
    rule(Above(Metric::UsdStrength, 105.0), -5, "Strong dollar weighs on commodities"),
];

const PRECIOUS_METALS_RULES: &[ScoreRule] = &[
    rule(Below(Metric::RealRate10Y, 1.0), 15, "Low real yields cut gold's carry cost"),
    rule(Above(Metric::RealRate10Y, 2.5), -10, "High real yields compete with gold"),
    rule(Above(Metric::Vix, 25.0), 10, "Safe-haven demand"),
    rule(Below(Metric::UsdStrength, 100.0), 10, "Weak dollar supports gold"),
    rule(Above(Metric::UsdStrength, 108.0), -10, "Strong dollar headwind"),
    rule(InflationTrendIs(InflationTrend::Rising), 5, "Inflation hedge demand"),
    rule(Above(Metric::HyOas, 450.0), 5, "Hedge against credit stress"),
];

// ==================== Volatility ====================

const BITCOIN_OPTIONALITY_RULES: &[ScoreRule] = &[
    rule(BtcTrendIs(BtcTrend::Bullish), 20, "Bitcoin above its 200-day average"),
    rule(BtcTrendIs(BtcTrend::Bearish), -20, "Bitcoin below its 200-day average"),
    rule(Above(Metric::LiquidityScore, 60.0), 15, "Expanding liquidity fuels speculative assets"),
    rule(Below(Metric::LiquidityScore, 40.0), -10, "Contracting liquidity"),
    rule(Above(Metric::Vix, 25.0), -10, "Risk-off volatility"),
    rule(Above(Metric::BtcPremiumTo200Dma, 40.0), -10, "Extended far above trend"),
    rule(Below(Metric::RealRate10Y, 1.0), 10, "Low real yields"),
];

const BITCOIN_OPTIONALITY_GATES: &[GateRule] = &[GateRule {
    when: Condition::All(&[BtcTrendIs(BtcTrend::Bearish), Above(Metric::Vix, 20.0)]),
    reason: "Gate: bearish Bitcoin trend with VIX above 20",
}];

/// 카탈로그 (EngineId::ALL과 같은 순서).
static ENGINES: [Engine; 12] = [
    Engine {
        id: EngineId::GrowthEquity,
        label: "Growth & Innovation",
        description: "Long-duration equities whose value sits in distant cashflows: software, semis, platform businesses.",
        short_definition: "Earnings growth priced off real yields",
        examples: &["QQQ", "VUG", "SCHG", "NVDA"],
        layer: Layer::Growth,
        rules: GROWTH_EQUITY_RULES,
        gates: GROWTH_EQUITY_GATES,
    },
    Engine {
        id: EngineId::ValueCyclicals,
        label: "Value & Cyclicals",
        description: "Industrials, financials and materials that track the business cycle.",
        short_definition: "Operating leverage to the cycle",
        examples: &["VTV", "XLI", "XLF", "XLB"],
        layer: Layer::Growth,
        rules: VALUE_CYCLICALS_RULES,
        gates: &[],
    },
    Engine {
        id: EngineId::DividendCashflow,
        label: "Dividend Cashflow",
        description: "Mature companies returning cash through durable dividends and buybacks.",
        short_definition: "Equity income from established payers",
        examples: &["SCHD", "VYM", "DGRO", "JEPI"],
        layer: Layer::Cashflow,
        rules: DIVIDEND_CASHFLOW_RULES,
        gates: &[],
    },
    Engine {
        id: EngineId::CreditCarry,
        label: "Credit Carry",
        description: "High-yield and loan exposure earning spread over Treasuries.",
        short_definition: "Spread income in exchange for default risk",
        examples: &["HYG", "JNK", "BKLN", "SRLN"],
        layer: Layer::Cashflow,
        rules: CREDIT_CARRY_RULES,
        gates: CREDIT_CARRY_GATES,
    },
    Engine {
        id: EngineId::RealEstate,
        label: "Real Estate Income",
        description: "Listed property owners whose rents and cap rates respond to rates and growth.",
        short_definition: "Rental income priced off long rates",
        examples: &["VNQ", "O", "SCHH", "PLD"],
        layer: Layer::Cashflow,
        rules: REAL_ESTATE_RULES,
        gates: &[],
    },
    Engine {
        id: EngineId::QualityDefensive,
        label: "Quality Defensives",
        description: "Staples, healthcare and low-volatility equities with resilient earnings.",
        short_definition: "Earnings that hold up in slowdowns",
        examples: &["XLP", "XLV", "USMV", "QUAL"],
        layer: Layer::Stability,
        rules: QUALITY_DEFENSIVE_RULES,
        gates: &[],
    },
    Engine {
        id: EngineId::LongDuration,
        label: "Long-Duration Treasuries",
        description: "Long-dated government bonds that rally in growth scares and disinflation.",
        short_definition: "Duration hedge against deflationary shocks",
        examples: &["TLT", "EDV", "VGLT", "ZROZ"],
        layer: Layer::Stability,
        rules: LONG_DURATION_RULES,
        gates: &[],
    },
    Engine {
        id: EngineId::CashEquivalents,
        label: "Cash & T-Bills",
        description: "Treasury bills and money-market funds held as a stability buffer.",
        short_definition: "Liquidity and dry powder",
        examples: &["SGOV", "BIL", "SHV", "USFR"],
        layer: Layer::Stability,
        rules: CASH_EQUIVALENTS_RULES,
        gates: &[],
    },
    Engine {
        id: EngineId::InflationLinked,
        label: "Inflation-Linked Bonds",
        description: "TIPS whose principal adjusts with CPI.",
        short_definition: "Explicit CPI protection",
        examples: &["TIP", "SCHP", "VTIP", "STIP"],
        layer: Layer::HardAsset,
        rules: INFLATION_LINKED_RULES,
        gates: &[],
    },
    Engine {
        id: EngineId::EnergyCommodities,
        label: "Energy & Commodities",
        description: "Energy producers and broad commodity baskets tied to physical demand.",
        short_definition: "Real-economy inflation beta",
        examples: &["XLE", "DBC", "PDBC", "XOM"],
        layer: Layer::HardAsset,
        rules: ENERGY_COMMODITIES_RULES,
        gates: &[],
    },
    Engine {
        id: EngineId::PreciousMetals,
        label: "Precious Metals",
        description: "Gold and silver held as monetary hedges.",
        short_definition: "Monetary debasement and crisis hedge",
        examples: &["GLD", "IAU", "GLDM", "SLV"],
        layer: Layer::HardAsset,
        rules: PRECIOUS_METALS_RULES,
        gates: &[],
    },
    Engine {
        id: EngineId::BitcoinOptionality,
        label: "Bitcoin & Optionality",
        description: "Bitcoin and high-convexity positions that thrive on liquidity expansions.",
        short_definition: "Asymmetric upside from liquidity",
        examples: &["IBIT", "FBTC", "MSTR", "BITO"],
        layer: Layer::Volatility,
        rules: BITCOIN_OPTIONALITY_RULES,
        gates: BITCOIN_OPTIONALITY_GATES,
    },
];

/// 카탈로그 순서의 전체 엔진 목록.
pub fn list_engines() -> &'static [Engine] {
    &ENGINES
}

/// 타입이 있는 식별자로 엔진 조회.
pub fn engine(id: EngineId) -> &'static Engine {
    &ENGINES[id.index()]
}

/// 문자열 식별자로 엔진 조회. 알 수 없는 식별자는 `None`.
pub fn get_engine(id: &str) -> Option<&'static Engine> {
    EngineId::parse(id).map(engine)
}
