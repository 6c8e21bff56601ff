//! # Compass Engine
//!
//! 매크로 입력을 엔진 점수, 매크로 상태, 액션 정책으로 변환하는 순수 계산 계층.
//!
//! 모든 함수는 I/O가 없고 같은 입력에 대해 같은 출력을 돌려줍니다.
//!
//! ```text
//! MacroInputs ─▶ score_all_engines ─┬─▶ build_action_policy ─┐
//!                                   │                        ├─▶ compute_suggested_moves
//! Portfolio ───▶ compute_summary ───┴────────────────────────┘
//! ```

pub mod allocation;
pub mod error;
pub mod moves;
pub mod policy;
pub mod regime;
pub mod scoring;

pub use allocation::{
    compute_summary, AllocationDelta, BandStatus, EngineDelta, HoldingClassification, LayerDelta,
    PortfolioSummary,
};
pub use error::ScoringError;
pub use moves::{compute_suggested_moves, MoveDirection, SuggestedMove, SuggestedMoves};
pub use policy::{allowed_adds, build_action_policy, ActionPolicy};
pub use regime::{
    alert_level, classify_regime, inflation_composite, macro_state, risk_off_conditions,
    stress_points,
};
pub use scoring::{score_all_engines, score_engine, MacroCase, ScoringOutput};
