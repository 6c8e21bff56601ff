//! CoinGecko 비트코인 시세 클라이언트.
//!
//! `market_chart` 200일 일봉으로 현재가와 200일 이동평균을 계산합니다.

use compass_core::statistics::mean;
use compass_core::BtcTrend;
use serde::Deserialize;
use tracing::debug;

use crate::error::UpstreamFetchError;

const SOURCE: &str = "coingecko";
const DMA_DAYS: &str = "200";

/// 비트코인 스냅샷.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BtcSnapshot {
    pub price: f64,
    pub dma_200: f64,
}

impl BtcSnapshot {
    pub fn trend(&self) -> BtcTrend {
        BtcTrend::from_price(self.price, self.dma_200)
    }
}

#[derive(Debug, Deserialize)]
struct MarketChart {
    /// `[timestamp_ms, price]`
    prices: Vec<(f64, f64)>,
}

/// CoinGecko REST 클라이언트.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: reqwest::Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// 현재가와 200일 평균 조회.
    pub async fn fetch_btc_snapshot(&self) -> Result<BtcSnapshot, UpstreamFetchError> {
        let url = format!("{}/api/v3/coins/bitcoin/market_chart", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("vs_currency", "usd"), ("days", DMA_DAYS), ("interval", "daily")])
            .send()
            .await
            .map_err(|e| UpstreamFetchError::http(SOURCE, e))?;

        if !response.status().is_success() {
            return Err(UpstreamFetchError::Status {
                source_name: SOURCE.to_string(),
                status: response.status().as_u16(),
            });
        }

        let chart: MarketChart = response
            .json()
            .await
            .map_err(|e| UpstreamFetchError::parse(SOURCE, e.to_string()))?;

        let prices: Vec<f64> = chart
            .prices
            .into_iter()
            .map(|(_, price)| price)
            .filter(|p| p.is_finite() && *p > 0.0)
            .collect();

        let price = *prices
            .last()
            .ok_or_else(|| UpstreamFetchError::NoData("bitcoin market_chart".to_string()))?;
        let dma_200 = mean(&prices)
            .ok_or_else(|| UpstreamFetchError::NoData("bitcoin market_chart".to_string()))?;

        debug!(price, dma_200, samples = prices.len(), "비트코인 시세 수신");
        Ok(BtcSnapshot { price, dma_200 })
    }
}
