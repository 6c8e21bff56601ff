//! FRED (Federal Reserve Economic Data) 클라이언트.
//!
//! `GET /fred/series/observations`로 시계열 관측값을 조회합니다.
//! 값이 `"."`인 관측값은 결측이며 건너뜁니다.

use serde::Deserialize;
use tracing::debug;

use crate::error::UpstreamFetchError;

const SOURCE: &str = "fred";

/// 단일 관측값.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<RawObservation>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    date: String,
    value: String,
}

/// FRED REST 클라이언트.
#[derive(Debug, Clone)]
pub struct FredClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FredClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// 최근 `limit`개 관측값을 오래된 순서로 조회.
    pub async fn fetch_series(
        &self,
        series_id: &str,
        limit: usize,
    ) -> Result<Vec<Observation>, UpstreamFetchError> {
        let url = format!("{}/fred/series/observations", self.base_url);
        let limit = limit.to_string();

        let response = self
            .http
            .get(&url)
            .query(&[
                ("series_id", series_id),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
                ("sort_order", "desc"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| UpstreamFetchError::http(SOURCE, e))?;

        if !response.status().is_success() {
            return Err(UpstreamFetchError::Status {
                source_name: format!("{}:{}", SOURCE, series_id),
                status: response.status().as_u16(),
            });
        }

        let body: ObservationsResponse = response
            .json()
            .await
            .map_err(|e| UpstreamFetchError::parse(SOURCE, format!("{}: {}", series_id, e)))?;

        let mut observations: Vec<Observation> = body
            .observations
            .into_iter()
            .filter_map(|raw| {
                raw.value.trim().parse::<f64>().ok().filter(|v| v.is_finite()).map(|value| {
                    Observation {
                        date: raw.date,
                        value,
                    }
                })
            })
            .collect();

        if observations.is_empty() {
            return Err(UpstreamFetchError::NoData(series_id.to_string()));
        }

        // desc로 받았으므로 오래된 순서로 뒤집음
        observations.reverse();
        debug!(series = series_id, count = observations.len(), "FRED 시계열 수신");
        Ok(observations)
    }
}
