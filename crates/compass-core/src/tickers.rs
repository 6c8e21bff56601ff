//! 티커 → 엔진 분류.
//!
//! 정적 테이블에 있는 티커는 확정 분류(`Classified`)되고,
//! 없는 티커는 티커/메모 키워드 휴리스틱으로 추정 분류(`Uncertain`)됩니다.
//! 호출자는 두 경우를 구분해서 UI에 "추정" 배지를 표시할 수 있습니다.

use serde::{Deserialize, Serialize};

use crate::domain::{EngineId, Holding};

/// 정적 테이블 적중 시 신뢰도.
pub const TABLE_CONFIDENCE: u8 = 90;
/// 키워드 휴리스틱 적중 시 신뢰도.
pub const KEYWORD_CONFIDENCE: u8 = 45;
/// 아무 단서도 없을 때의 신뢰도.
pub const DEFAULT_CONFIDENCE: u8 = 25;

/// 단서가 없을 때의 추정 엔진.
const DEFAULT_ENGINE: EngineId = EngineId::GrowthEquity;

/// 분류 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Classification {
    /// 정적 테이블에 있는 티커
    Classified { engine: EngineId, confidence: u8 },
    /// 휴리스틱 추정
    #[serde(rename_all = "camelCase")]
    Uncertain {
        suggested_engine: EngineId,
        confidence: u8,
    },
}

impl Classification {
    /// 확정/추정 여부와 무관하게 배정된 엔진.
    pub fn engine(&self) -> EngineId {
        match *self {
            Self::Classified { engine, .. } => engine,
            Self::Uncertain {
                suggested_engine, ..
            } => suggested_engine,
        }
    }

    pub fn confidence(&self) -> u8 {
        match *self {
            Self::Classified { confidence, .. } | Self::Uncertain { confidence, .. } => confidence,
        }
    }

    pub fn is_classified(&self) -> bool {
        matches!(self, Self::Classified { .. })
    }
}

/// 정적 티커 테이블.
static TICKER_TABLE: &[(&str, EngineId)] = &[
    // 성장/혁신
    ("QQQ", EngineId::GrowthEquity),
    ("QQQM", EngineId::GrowthEquity),
    ("VUG", EngineId::GrowthEquity),
    ("SCHG", EngineId::GrowthEquity),
    ("VOO", EngineId::GrowthEquity),
    ("SPY", EngineId::GrowthEquity),
    ("VTI", EngineId::GrowthEquity),
    ("AAPL", EngineId::GrowthEquity),
    ("MSFT", EngineId::GrowthEquity),
    ("NVDA", EngineId::GrowthEquity),
    ("GOOGL", EngineId::GrowthEquity),
    ("AMZN", EngineId::GrowthEquity),
    ("META", EngineId::GrowthEquity),
    ("TSLA", EngineId::GrowthEquity),
    // 가치/경기민감
    ("VTV", EngineId::ValueCyclicals),
    ("IWD", EngineId::ValueCyclicals),
    ("XLI", EngineId::ValueCyclicals),
    ("XLF", EngineId::ValueCyclicals),
    ("XLB", EngineId::ValueCyclicals),
    ("JPM", EngineId::ValueCyclicals),
    ("CAT", EngineId::ValueCyclicals),
    // 배당
    ("SCHD", EngineId::DividendCashflow),
    ("VYM", EngineId::DividendCashflow),
    ("DGRO", EngineId::DividendCashflow),
    ("JEPI", EngineId::DividendCashflow),
    ("NOBL", EngineId::DividendCashflow),
    // 크레딧
    ("HYG", EngineId::CreditCarry),
    ("JNK", EngineId::CreditCarry),
    ("BKLN", EngineId::CreditCarry),
    ("SRLN", EngineId::CreditCarry),
    ("LQD", EngineId::CreditCarry),
    // 부동산
    ("VNQ", EngineId::RealEstate),
    ("O", EngineId::RealEstate),
    ("SCHH", EngineId::RealEstate),
    ("PLD", EngineId::RealEstate),
    // 방어
    ("XLP", EngineId::QualityDefensive),
    ("XLV", EngineId::QualityDefensive),
    ("XLU", EngineId::QualityDefensive),
    ("USMV", EngineId::QualityDefensive),
    ("QUAL", EngineId::QualityDefensive),
    ("JNJ", EngineId::QualityDefensive),
    ("PG", EngineId::QualityDefensive),
    // 장기채
    ("TLT", EngineId::LongDuration),
    ("EDV", EngineId::LongDuration),
    ("VGLT", EngineId::LongDuration),
    ("ZROZ", EngineId::LongDuration),
    ("BND", EngineId::LongDuration),
    ("AGG", EngineId::LongDuration),
    // 현금성
    ("SGOV", EngineId::CashEquivalents),
    ("BIL", EngineId::CashEquivalents),
    ("SHV", EngineId::CashEquivalents),
    ("USFR", EngineId::CashEquivalents),
    ("VMFXX", EngineId::CashEquivalents),
    ("SPAXX", EngineId::CashEquivalents),
    // 물가연동
    ("TIP", EngineId::InflationLinked),
    ("SCHP", EngineId::InflationLinked),
    ("VTIP", EngineId::InflationLinked),
    ("STIP", EngineId::InflationLinked),
    // 에너지/원자재
    ("XLE", EngineId::EnergyCommodities),
    ("DBC", EngineId::EnergyCommodities),
    ("PDBC", EngineId::EnergyCommodities),
    ("XOM", EngineId::EnergyCommodities),
    ("CVX", EngineId::EnergyCommodities),
    // 귀금속
    ("GLD", EngineId::PreciousMetals),
    ("IAU", EngineId::PreciousMetals),
    ("GLDM", EngineId::PreciousMetals),
    ("SLV", EngineId::PreciousMetals),
    // 비트코인
    ("IBIT", EngineId::BitcoinOptionality),
    ("FBTC", EngineId::BitcoinOptionality),
    ("MSTR", EngineId::BitcoinOptionality),
    ("BITO", EngineId::BitcoinOptionality),
    ("GBTC", EngineId::BitcoinOptionality),
    ("BTC", EngineId::BitcoinOptionality),
];

/// 키워드 휴리스틱. 위에서부터 첫 적중이 채택됩니다.
static KEYWORD_RULES: &[(&[&str], EngineId)] = &[
    (&["BITCOIN", "BTC", "CRYPTO"], EngineId::BitcoinOptionality),
    (&["GOLD", "SILVER", "PRECIOUS", "METAL"], EngineId::PreciousMetals),
    (&["TIPS", "INFLATION"], EngineId::InflationLinked),
    (&["OIL", "ENERGY", "COMMODIT"], EngineId::EnergyCommodities),
    (
        &["T-BILL", "TBILL", "MONEY MARKET", "CASH", "SHORT TREASURY"],
        EngineId::CashEquivalents,
    ),
    (&["HIGH YIELD", "CREDIT", "LOAN", "CORPORATE"], EngineId::CreditCarry),
    (&["TREASURY", "BOND", "DURATION"], EngineId::LongDuration),
    (&["REIT", "REAL ESTATE", "PROPERTY"], EngineId::RealEstate),
    (&["DIVIDEND", "INCOME", "YIELD"], EngineId::DividendCashflow),
    (&["VALUE", "CYCLICAL", "INDUSTRIAL", "BANK"], EngineId::ValueCyclicals),
    (
        &["DEFENSIVE", "STAPLES", "HEALTH", "UTILIT", "LOW VOL"],
        EngineId::QualityDefensive,
    ),
    (&["GROWTH", "TECH", "INNOVATION", "NASDAQ"], EngineId::GrowthEquity),
];

/// 정적 테이블 조회.
pub fn lookup_ticker(ticker: &str) -> Option<EngineId> {
    let ticker = ticker.trim().to_uppercase();
    TICKER_TABLE
        .iter()
        .find(|(t, _)| *t == ticker)
        .map(|(_, engine)| *engine)
}

fn keyword_match(text: &str) -> Option<EngineId> {
    let haystack = text.to_uppercase();
    KEYWORD_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| haystack.contains(k)))
        .map(|(_, engine)| *engine)
}

/// 티커 단독 분류.
pub fn classify_ticker(ticker: &str) -> Classification {
    classify(ticker, None)
}

/// 보유 종목 분류 (메모를 휴리스틱 단서로 사용).
pub fn classify_holding(holding: &Holding) -> Classification {
    classify(&holding.ticker, holding.notes.as_deref())
}

fn classify(ticker: &str, notes: Option<&str>) -> Classification {
    if let Some(engine) = lookup_ticker(ticker) {
        return Classification::Classified {
            engine,
            confidence: TABLE_CONFIDENCE,
        };
    }

    let hint = match notes {
        Some(notes) => keyword_match(notes).or_else(|| keyword_match(ticker)),
        None => keyword_match(ticker),
    };

    match hint {
        Some(engine) => Classification::Uncertain {
            suggested_engine: engine,
            confidence: KEYWORD_CONFIDENCE,
        },
        None => Classification::Uncertain {
            suggested_engine: DEFAULT_ENGINE,
            confidence: DEFAULT_CONFIDENCE,
        },
    }
}
