//! Score validation: raw score text into per-set results.
//!
//! A score is one or more comma-separated sets, each `games:games` with player A's
//! games first. A set is valid when it could have finished under normal set rules:
//! 6 games with a lead of two (6:0 ... 6:4), or 7:5 / 7:6.

use crate::models::Side;

/// How many digits a game count may have in a set token.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ScoreGrammar {
    /// Exactly one digit per side (`6:4`). Used for stored records.
    #[default]
    Strict,
    /// One or two digits per side (`06:4`). Values are still range-checked.
    /// Nothing in this crate stores or aggregates with it; only callers that opt in
    /// through [`validate_score_with`] get it.
    Lenient,
}

impl ScoreGrammar {
    fn max_digits(self) -> usize {
        match self {
            ScoreGrammar::Strict => 1,
            ScoreGrammar::Lenient => 2,
        }
    }
}

/// Why a score (or one of its sets) was rejected.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScoreError {
    /// Token is not `digits:digits`.
    MalformedSet(String),
    /// Both sides won the same number of games.
    Tie { games: u32 },
    /// Game counts are not a finished set (6:5, 8:6, 4:2, ...).
    InvalidSet { games_a: u32, games_b: u32 },
}

impl std::fmt::Display for ScoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreError::MalformedSet(token) => write!(
                f,
                "Invalid set '{}': use the form \"6:4\" or \"6:4, 7:6\"",
                token
            ),
            ScoreError::Tie { games } => {
                write!(f, "A set cannot end level ({}:{})", games, games)
            }
            ScoreError::InvalidSet { games_a, games_b } => write!(
                f,
                "Set {}:{} is not a finished set (6 games with a two-game lead, or 7:5 / 7:6)",
                games_a, games_b
            ),
        }
    }
}

impl std::error::Error for ScoreError {}

/// One validated set.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SetResult {
    pub games_a: u32,
    pub games_b: u32,
    pub winner: Side,
}

/// Validate `raw` with the strict single-digit grammar.
pub fn validate_score(raw: &str) -> Result<Vec<SetResult>, ScoreError> {
    validate_score_with(raw, ScoreGrammar::Strict)
}

/// Validate `raw` with the given grammar. Sets are returned in the order played.
pub fn validate_score_with(raw: &str, grammar: ScoreGrammar) -> Result<Vec<SetResult>, ScoreError> {
    raw.split(',')
        .map(|token| validate_set(token.trim(), grammar))
        .collect()
}

fn validate_set(token: &str, grammar: ScoreGrammar) -> Result<SetResult, ScoreError> {
    let malformed = || ScoreError::MalformedSet(token.to_string());
    let (left, right) = token.split_once(':').ok_or_else(malformed)?;
    let games_a = parse_games(left, grammar).ok_or_else(malformed)?;
    let games_b = parse_games(right, grammar).ok_or_else(malformed)?;

    if games_a == games_b {
        return Err(ScoreError::Tie { games: games_a });
    }

    let max = games_a.max(games_b);
    let min = games_a.min(games_b);
    let finished = match max {
        6 => max - min >= 2,
        7 => min == 5 || min == 6,
        _ => false,
    };
    if !finished {
        return Err(ScoreError::InvalidSet { games_a, games_b });
    }

    let winner = if games_a > games_b { Side::A } else { Side::B };
    Ok(SetResult {
        games_a,
        games_b,
        winner,
    })
}

fn parse_games(digits: &str, grammar: ScoreGrammar) -> Option<u32> {
    let valid = !digits.is_empty()
        && digits.len() <= grammar.max_digits()
        && digits.bytes().all(|b| b.is_ascii_digit());
    if valid {
        digits.parse().ok()
    } else {
        None
    }
}
