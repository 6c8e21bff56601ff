//! 라이브 매크로 소스 (FRED + CoinGecko).
//!
//! # 시계열
//!
//! | FRED ID | 필드 | 변환 |
//! |---------|------|------|
//! | DGS10 | nominalRate10Y | 최신값 |
//! | DFII10 | realRate10Y | 최신값 |
//! | CPIAUCSL | inflation, inflationTrend | 전년비, 3개월 전 대비 ±0.2 |
//! | BAMLH0A0HYM2 | hyOAS, creditTrend | % → bps, 20 관측 전 대비 ±25 bps |
//! | BAMLC0A0CM | igOAS | % → bps |
//! | A191RL1Q225SBEA | gdpGrowth | 최신값 |
//! | UNRATE | unemploymentRate | 최신값 |
//! | DCOILWTICO | oilPrice | 최신값 |
//! | DTWEXBGS | usdStrength | 최신값 |
//! | VIXCLS | vix | 최신값 |
//! | SP500 | equityMomentum | 약 6개월(126 관측) 수익률 |
//!
//! `pmi`, `goldPrice`, `liquidityScore`는 무료 공개 소스가 없어 항상 대체 상수를 사용합니다.
//!
//! API 키가 없거나 비트코인 조회가 실패하면 전체 조회가 실패합니다.
//! 개별 FRED 시계열 실패는 대체 상수로 채우고 `fallbackFields`에 기록합니다.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{info, warn};

use compass_core::statistics::pct_change;
use compass_core::{CreditTrend, DataSourceConfig, FallbackConstants, InflationTrend, MacroInputs};

use super::coingecko::CoinGeckoClient;
use super::fred::{FredClient, Observation};
use super::{MacroFetch, MacroInputSource};
use crate::error::UpstreamFetchError;

/// 조회할 FRED 시계열과 필요한 관측 수.
const SERIES: &[(&str, usize)] = &[
    ("DGS10", 5),
    ("DFII10", 5),
    ("CPIAUCSL", 24),
    ("BAMLH0A0HYM2", 30),
    ("BAMLC0A0CM", 5),
    ("A191RL1Q225SBEA", 2),
    ("UNRATE", 2),
    ("DCOILWTICO", 5),
    ("DTWEXBGS", 5),
    ("VIXCLS", 5),
    ("SP500", 140),
];

const INFLATION_TREND_BAND: f64 = 0.2;
const CREDIT_TREND_BAND_BPS: f64 = 25.0;
const CREDIT_TREND_LOOKBACK: usize = 20;
const MOMENTUM_LOOKBACK: usize = 126;

/// 항상 대체 상수를 쓰는 필드.
const ALWAYS_FALLBACK: &[&str] = &["pmi", "goldPrice", "liquidityScore"];

/// FRED + CoinGecko 라이브 소스.
pub struct LiveMacroSource {
    fred: Option<FredClient>,
    coingecko: CoinGeckoClient,
    fallback: FallbackConstants,
}

impl LiveMacroSource {
    /// 설정으로부터 생성.
    ///
    /// API 키가 없어도 생성은 성공하며, 조회 시 `MissingApiKey`로 실패합니다.
    pub fn new(
        config: &DataSourceConfig,
        fallback: FallbackConstants,
    ) -> Result<Self, UpstreamFetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("engine-compass/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpstreamFetchError::http("client", e))?;

        let fred = config
            .fred_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .map(|key| FredClient::new(http.clone(), config.fred_base_url.as_str(), key));

        Ok(Self {
            fred,
            coingecko: CoinGeckoClient::new(http, config.coingecko_base_url.as_str()),
            fallback,
        })
    }

    async fn fetch_all_series(&self, fred: &FredClient) -> HashMap<&'static str, Vec<f64>> {
        let requests = SERIES.iter().map(|(id, limit)| async move {
            (*id, fred.fetch_series(id, *limit).await)
        });

        let mut series = HashMap::new();
        for (id, result) in join_all(requests).await {
            match result {
                Ok(observations) => {
                    series.insert(id, values(&observations));
                }
                Err(e) => warn!(series = id, error = %e, "FRED 시계열 조회 실패, 대체 상수 사용"),
            }
        }
        series
    }
}

fn values(observations: &[Observation]) -> Vec<f64> {
    observations.iter().map(|o| o.value).collect()
}

/// 필드 조립기. 대체값을 쓴 필드를 기록합니다.
struct Assembler<'a> {
    series: &'a HashMap<&'static str, Vec<f64>>,
    fallback_fields: Vec<String>,
}

impl<'a> Assembler<'a> {
    fn latest(&mut self, series_id: &str, field: &str, scale: f64, fallback: f64) -> f64 {
        match self.series.get(series_id).and_then(|v| v.last()) {
            Some(value) => value * scale,
            None => self.fall_back(field, fallback),
        }
    }

    fn derived<T>(&mut self, field: &str, value: Option<T>, fallback: T) -> T {
        match value {
            Some(v) => v,
            None => self.fall_back(field, fallback),
        }
    }

    fn fall_back<T>(&mut self, field: &str, fallback: T) -> T {
        self.fallback_fields.push(field.to_string());
        fallback
    }
}

/// CPI 전년비 (%) = 최신 / 12개월 전 - 1, `offset`개월 전 시점 기준.
fn cpi_yoy(cpi: &[f64], offset: usize) -> Option<f64> {
    let end = cpi.len().checked_sub(1 + offset)?;
    let start = end.checked_sub(12)?;
    pct_change(cpi[start], cpi[end])
}

/// 인플레이션 전년비와 추세 (3개월 전 전년비 대비).
fn inflation_from_cpi(cpi: &[f64]) -> Option<(f64, InflationTrend)> {
    let now = cpi_yoy(cpi, 0)?;
    let three_months_ago = cpi_yoy(cpi, 3)?;
    let change = now - three_months_ago;
    let trend = if change > INFLATION_TREND_BAND {
        InflationTrend::Rising
    } else if change < -INFLATION_TREND_BAND {
        InflationTrend::Falling
    } else {
        InflationTrend::Stable
    };
    Some((now, trend))
}

/// HY OAS(%) 시계열 → 크레딧 추세.
fn credit_trend_from_hy(hy_pct: &[f64]) -> Option<CreditTrend> {
    let latest = hy_pct.last()?;
    let idx = hy_pct.len().checked_sub(1 + CREDIT_TREND_LOOKBACK)?;
    let change_bps = (latest - hy_pct[idx]) * 100.0;
    Some(if change_bps > CREDIT_TREND_BAND_BPS {
        CreditTrend::Widening
    } else if change_bps < -CREDIT_TREND_BAND_BPS {
        CreditTrend::Tightening
    } else {
        CreditTrend::Stable
    })
}

/// S&P 500 약 6개월 수익률 (%).
fn equity_momentum(sp500: &[f64]) -> Option<f64> {
    let latest = *sp500.last()?;
    let idx = sp500.len().checked_sub(1 + MOMENTUM_LOOKBACK)?;
    pct_change(sp500[idx], latest)
}

/// 시계열과 비트코인 스냅샷으로 레코드 조립.
fn assemble(
    series: &HashMap<&'static str, Vec<f64>>,
    btc_price: f64,
    btc_200dma: f64,
    fallback: &FallbackConstants,
) -> MacroFetch {
    let mut a = Assembler {
        series,
        fallback_fields: Vec::new(),
    };
    let empty = Vec::new();
    let get = |id: &str| series.get(id).unwrap_or(&empty);

    let nominal_rate_10y = a.latest("DGS10", "nominalRate10Y", 1.0, fallback.nominal_rate_10y);
    let real_rate_10y = a.latest("DFII10", "realRate10Y", 1.0, fallback.real_rate_10y);
    let (inflation, inflation_trend) = a.derived(
        "inflation",
        inflation_from_cpi(get("CPIAUCSL")),
        (fallback.inflation, InflationTrend::Stable),
    );
    let hy_oas = a.latest("BAMLH0A0HYM2", "hyOAS", 100.0, fallback.hy_oas);
    let credit_trend = a.derived(
        "creditTrend",
        credit_trend_from_hy(get("BAMLH0A0HYM2")),
        CreditTrend::Stable,
    );
    let ig_oas = a.latest("BAMLC0A0CM", "igOAS", 100.0, fallback.ig_oas);
    let gdp_growth = a.latest("A191RL1Q225SBEA", "gdpGrowth", 1.0, fallback.gdp_growth);
    let unemployment_rate = a.latest("UNRATE", "unemploymentRate", 1.0, fallback.unemployment_rate);
    let oil_price = a.latest("DCOILWTICO", "oilPrice", 1.0, fallback.oil_price);
    let usd_strength = a.latest("DTWEXBGS", "usdStrength", 1.0, fallback.usd_strength);
    let vix = a.latest("VIXCLS", "vix", 1.0, fallback.vix);
    let equity_momentum = a.derived(
        "equityMomentum",
        equity_momentum(get("SP500")),
        fallback.equity_momentum,
    );

    let mut fallback_fields = a.fallback_fields;
    fallback_fields.extend(ALWAYS_FALLBACK.iter().map(|f| f.to_string()));

    MacroFetch {
        inputs: MacroInputs {
            btc_price,
            btc_200dma,
            btc_trend: compass_core::BtcTrend::from_price(btc_price, btc_200dma),
            nominal_rate_10y,
            real_rate_10y,
            inflation,
            inflation_trend,
            hy_oas,
            ig_oas,
            credit_trend,
            gdp_growth,
            pmi: fallback.pmi,
            unemployment_rate,
            liquidity_score: fallback.liquidity_score,
            oil_price,
            gold_price: fallback.gold_price,
            usd_strength,
            vix,
            equity_momentum,
        },
        fallback_fields,
    }
}

#[async_trait]
impl MacroInputSource for LiveMacroSource {
    fn name(&self) -> &'static str {
        "fred+coingecko"
    }

    async fn fetch_macro_inputs(&self) -> Result<MacroFetch, UpstreamFetchError> {
        let fred = self.fred.as_ref().ok_or(UpstreamFetchError::MissingApiKey)?;

        let (series, btc) = futures::join!(
            self.fetch_all_series(fred),
            self.coingecko.fetch_btc_snapshot()
        );
        let btc = btc?;

        let fetch = assemble(&series, btc.price, btc.dma_200, &self.fallback);
        fetch.inputs.validate()?;

        info!(
            fallback_fields = fetch.fallback_fields.len(),
            btc_trend = %fetch.inputs.btc_trend,
            "라이브 매크로 입력 조회 완료"
        );
        Ok(fetch)
    }
}
