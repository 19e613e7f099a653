//! Match outcome from validated sets.

use crate::logic::score::SetResult;
use crate::models::Side;
use serde::{Deserialize, Serialize};

/// Who won a match, if anyone.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    PlayerAWins,
    PlayerBWins,
    /// Both sides won the same number of sets (including no sets at all).
    Undetermined,
}

impl MatchOutcome {
    /// Winning side, `None` when undetermined.
    pub fn winner(self) -> Option<Side> {
        match self {
            MatchOutcome::PlayerAWins => Some(Side::A),
            MatchOutcome::PlayerBWins => Some(Side::B),
            MatchOutcome::Undetermined => None,
        }
    }
}

/// Resolve the outcome by counting sets won per side. Does not re-validate the sets.
pub fn resolve_outcome(sets: &[SetResult]) -> MatchOutcome {
    let sets_a = sets.iter().filter(|s| s.winner == Side::A).count();
    let sets_b = sets.len() - sets_a;
    match sets_a.cmp(&sets_b) {
        std::cmp::Ordering::Greater => MatchOutcome::PlayerAWins,
        std::cmp::Ordering::Less => MatchOutcome::PlayerBWins,
        std::cmp::Ordering::Equal => MatchOutcome::Undetermined,
    }
}
