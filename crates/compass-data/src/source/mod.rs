//! 매크로 입력 소스.

mod coingecko;
mod fred;
mod live;
mod mock;

pub use coingecko::{BtcSnapshot, CoinGeckoClient};
pub use fred::{FredClient, Observation};
pub use live::LiveMacroSource;
pub use mock::{mock_macro_inputs, MockMacroSource};

use async_trait::async_trait;
use compass_core::MacroInputs;
use serde::Serialize;

use crate::error::UpstreamFetchError;

/// 조회 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroFetch {
    pub inputs: MacroInputs,
    /// 대체 상수로 채워진 필드 (와이어 이름)
    pub fallback_fields: Vec<String>,
}

impl MacroFetch {
    pub fn complete(inputs: MacroInputs) -> Self {
        Self {
            inputs,
            fallback_fields: Vec::new(),
        }
    }
}

/// 매크로 입력 소스 트레잇.
///
/// 성공하면 항상 모든 필드가 채워진 레코드를 돌려줍니다.
#[async_trait]
pub trait MacroInputSource: Send + Sync {
    /// 소스 이름 (로그/헬스체크용).
    fn name(&self) -> &'static str;

    /// 목 데이터 소스 여부.
    fn is_mock(&self) -> bool {
        false
    }

    /// 매크로 입력 조회.
    async fn fetch_macro_inputs(&self) -> Result<MacroFetch, UpstreamFetchError>;
}
