//! 매크로 대시보드 도메인 모델.

mod catalog;
mod engine;
mod macro_inputs;
mod macro_state;
mod portfolio;
mod rules;
mod score;

pub use catalog::*;
pub use engine::*;
pub use macro_inputs::*;
pub use macro_state::*;
pub use portfolio::*;
pub use rules::*;
pub use score::*;
