//! Engine Compass API 서버 라이브러리.
//!
//! 바이너리(`main.rs`)와 통합 테스트가 같은 라우터와 상태를 사용합니다.

pub mod error;
pub mod routes;
pub mod services;
pub mod state;

pub use error::{ApiErrorResponse, ApiResult};
pub use routes::create_router;
pub use state::{create_test_state, AppState};
