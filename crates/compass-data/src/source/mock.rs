//! 결정적 목 데이터 소스.

use async_trait::async_trait;
use compass_core::MacroInputs;

use super::{MacroFetch, MacroInputSource};
use crate::error::UpstreamFetchError;

/// 목 매크로 입력 (HY 480 bps, BTC 약세, VIX 22).
pub fn mock_macro_inputs() -> MacroInputs {
    MacroInputs::mock()
}

/// 항상 같은 목 입력을 돌려주는 소스.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockMacroSource;

#[async_trait]
impl MacroInputSource for MockMacroSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_mock(&self) -> bool {
        true
    }

    async fn fetch_macro_inputs(&self) -> Result<MacroFetch, UpstreamFetchError> {
        Ok(MacroFetch::complete(mock_macro_inputs()))
    }
}
