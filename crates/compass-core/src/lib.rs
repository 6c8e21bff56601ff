//! # Compass Core
//!
//! 매크로 대시보드의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 매크로 입력 레코드 (`MacroInputs`)
//! - 12개 경제 엔진 카탈로그 및 선언적 스코어링 규칙
//! - 보유 종목, 포트폴리오, 목표 밴드
//! - 티커 → 엔진 분류 테이블
//! - 기술 통계 유틸리티
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod statistics;
pub mod tickers;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use tickers::{classify_holding, classify_ticker, Classification};
