//! 제안 이동 계산기.
//!
//! 엔진 델타에서 희소한 INCREASE / DECREASE / MAINTAIN 편향을 만듭니다.
//! 증액은 정책의 `allowed_adds`에 속한 레이어에만 허용되므로
//! 회피 레이어와 모순되는 제안은 나오지 않습니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use compass_core::{engine, Confirmations, EngineId, EngineScore, Layer, MacroState};

use crate::allocation::{BandStatus, EngineDelta};
use crate::policy::allowed_adds;

/// 1회 이동 상한 (퍼센트 포인트).
pub const MAX_MOVE_PCT: Decimal = dec!(5);

/// 이동 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoveDirection {
    Increase,
    Decrease,
    Maintain,
}

/// 엔진 하나에 대한 제안.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedMove {
    pub engine: EngineId,
    pub layer: Layer,
    pub direction: MoveDirection,
    /// 퍼센트 포인트 (MAINTAIN이면 0)
    pub magnitude_pct: Decimal,
    pub rationale: String,
}

/// 제안 이동 묶음.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedMoves {
    pub moves: Vec<SuggestedMove>,
    pub allowed_adds: Vec<Layer>,
    pub blocked_adds: Vec<Layer>,
}

impl SuggestedMoves {
    pub fn for_engine(&self, id: EngineId) -> Option<&SuggestedMove> {
        self.moves.iter().find(|m| m.engine == id)
    }
}

/// 제안 이동 계산.
///
/// OVER → DECREASE, UNDER → 허용 레이어면 INCREASE 아니면 MAINTAIN, IN_RANGE → 항목 없음.
pub fn compute_suggested_moves(
    deltas: &[EngineDelta],
    macro_state: &MacroState,
    engine_scores: &[EngineScore],
    confirmations: &Confirmations,
) -> SuggestedMoves {
    let allowed = allowed_adds(macro_state, engine_scores, confirmations);

    let moves = deltas
        .iter()
        .filter_map(|delta| {
            let layer = delta.layer();
            let label = engine(delta.key).label;
            let gap = delta.delta_to_target.abs();
            let magnitude = gap.min(MAX_MOVE_PCT);

            match delta.status {
                BandStatus::InRange => None,
                BandStatus::Over => Some(SuggestedMove {
                    engine: delta.key,
                    layer,
                    direction: MoveDirection::Decrease,
                    magnitude_pct: magnitude,
                    rationale: format!(
                        "{} is {}% vs a {}% target ({} pts over); trim {} pts",
                        label,
                        delta.current_pct.normalize(),
                        delta.target_pct.normalize(),
                        gap.normalize(),
                        magnitude.normalize()
                    ),
                }),
                BandStatus::Under if allowed.contains(&layer) => Some(SuggestedMove {
                    engine: delta.key,
                    layer,
                    direction: MoveDirection::Increase,
                    magnitude_pct: magnitude,
                    rationale: format!(
                        "{} is {}% vs a {}% target ({} pts under); add {} pts",
                        label,
                        delta.current_pct.normalize(),
                        delta.target_pct.normalize(),
                        gap.normalize(),
                        magnitude.normalize()
                    ),
                }),
                BandStatus::Under => Some(SuggestedMove {
                    engine: delta.key,
                    layer,
                    direction: MoveDirection::Maintain,
                    magnitude_pct: Decimal::ZERO,
                    rationale: format!(
                        "{} is {} pts under target but the {} layer is held by policy",
                        label,
                        gap.normalize(),
                        layer
                    ),
                }),
            }
        })
        .collect();

    SuggestedMoves {
        moves,
        allowed_adds: allowed.iter().copied().collect(),
        blocked_adds: Layer::ALL
            .into_iter()
            .filter(|l| !allowed.contains(l))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::compute_summary;
    use crate::policy::build_action_policy;
    use crate::regime::macro_state;
    use crate::scoring::score_all_engines;
    use compass_core::{Account, Holding, MacroInputs, Portfolio, TargetTable};

    fn pipeline(portfolio: &Portfolio) -> (SuggestedMoves, Vec<Layer>) {
        let inputs = MacroInputs::mock();
        let scores = score_all_engines(&inputs).unwrap().engine_scores;
        let state = macro_state(&inputs);
        let confirmations = Confirmations::default();
        let summary = compute_summary(portfolio, &TargetTable::default());
        let policy = build_action_policy(&state, &scores, &confirmations);
        let moves = compute_suggested_moves(&summary.engine_deltas, &state, &scores, &confirmations);
        (moves, policy.avoid_layers)
    }

    #[test]
    fn test_over_is_capped_decrease() {
        let portfolio = Portfolio::new(vec![
            Holding::new("AAPL", Account::Taxable, dec!(60)),
            Holding::new("SGOV", Account::Taxable, dec!(40)),
        ]);
        let (moves, _) = pipeline(&portfolio);
        let growth = moves.for_engine(EngineId::GrowthEquity).unwrap();
        assert_eq!(growth.direction, MoveDirection::Decrease);
        assert_eq!(growth.magnitude_pct, dec!(5));
        assert!(growth.rationale.contains("45 pts over"));
    }

    #[test]
    fn test_avoided_layer_is_held() {
        // 비트코인 0% (밴드 2~8) → UNDER, volatility는 회피 레이어
        let portfolio = Portfolio::new(vec![Holding::new("SGOV", Account::Taxable, dec!(100))]);
        let (moves, avoid) = pipeline(&portfolio);
        assert!(avoid.contains(&Layer::Volatility));
        let btc = moves.for_engine(EngineId::BitcoinOptionality).unwrap();
        assert_eq!(btc.direction, MoveDirection::Maintain);
        assert!(btc.rationale.contains("held by policy"));
        assert!(moves.blocked_adds.contains(&Layer::Volatility));
    }

    #[test]
    fn test_allowed_under_increases() {
        let portfolio = Portfolio::new(vec![Holding::new("SGOV", Account::Taxable, dec!(100))]);
        let (moves, _) = pipeline(&portfolio);
        let dividend = moves.for_engine(EngineId::DividendCashflow).unwrap();
        assert_eq!(dividend.direction, MoveDirection::Increase);
        assert_eq!(dividend.magnitude_pct, dec!(5));
    }

    #[test]
    fn test_in_range_has_no_entry() {
        let (moves, _) = pipeline(&Portfolio::default());
        for m in &moves.moves {
            assert!(m.magnitude_pct <= MAX_MOVE_PCT);
        }
        // 데모 포트폴리오의 현금성 18%는 밴드(10~25) 안
        assert!(moves.for_engine(EngineId::CashEquivalents).is_none());
    }
}
