//! Tennis business logic: score rules, outcomes, statistics, leaderboard, record keeping.

mod leaderboard;
mod outcome;
pub mod records;
mod score;
mod stats;

pub use leaderboard::{Leaderboard, LeaderboardRow, EXPORT_HEADER, MAX_TOP};
pub use outcome::{resolve_outcome, MatchOutcome};
pub use score::{validate_score, validate_score_with, ScoreError, ScoreGrammar, SetResult};
pub use stats::{
    compute_player_stats, decided_winner, round1, select_matches, win_rate_percent, DateRange,
    PlayerStats, StatsError,
};
