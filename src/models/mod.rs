//! Data structures for the tennis app: players and matches.

mod player;
mod tennis_match;
mod validation;

pub use player::{Player, PlayerType, MAX_NAME_LEN};
pub use tennis_match::{MatchId, Side, TennisMatch};
pub use validation::{normalize_name, parse_date, ValidationError};
