//! 백그라운드 서비스.

pub mod refresh;
