//! Tennis players, match results and win-rate statistics: library with models,
//! scoring/statistics logic and the storage backends.

pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use config::{AppConfig, StorageProfile};
pub use logic::records::RecordError;
pub use logic::{
    compute_player_stats, resolve_outcome, validate_score, DateRange, Leaderboard, LeaderboardRow,
    MatchOutcome, PlayerStats, ScoreError, SetResult, StatsError,
};
pub use models::{MatchId, Player, PlayerType, Side, TennisMatch, ValidationError};
pub use store::{CsvStore, SqliteStore, Store, StoreError};
