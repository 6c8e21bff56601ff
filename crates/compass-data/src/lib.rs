//! # Compass Data
//!
//! 스코어링 코어의 외부 협력자:
//!
//! - **source**: 매크로 입력 조회 (FRED + CoinGecko 라이브, 결정적 목 데이터)
//! - **store**: 포트폴리오 저장소 (인메모리, Redis)
//!
//! 두 계층 모두 트레잇으로 노출되며 애플리케이션 경계에서 한 번 구성되어 주입됩니다.

pub mod error;
pub mod source;
pub mod store;

pub use error::{StoreError, UpstreamFetchError};
pub use source::{
    mock_macro_inputs, LiveMacroSource, MacroFetch, MacroInputSource, MockMacroSource,
};
pub use store::{portfolio_key, InMemoryPortfolioStore, PortfolioStore, RedisPortfolioStore};
