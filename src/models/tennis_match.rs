//! Match record and Side.

use crate::models::validation::{normalize_name, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// One of the two sides of a match, in record order.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// A played match between two distinct players.
///
/// `score` is kept as entered, e.g. `"6:4, 3:6, 7:5"`; games are listed player A first.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TennisMatch {
    pub id: MatchId,
    pub player_a: String,
    pub player_b: String,
    pub score: String,
    pub date: NaiveDate,
}

impl TennisMatch {
    /// New match with a fresh id.
    pub fn new(
        player_a: impl Into<String>,
        player_b: impl Into<String>,
        score: impl Into<String>,
        date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        Self::with_id(Uuid::new_v4(), player_a, player_b, score, date)
    }

    /// Match with a known id (e.g. loaded from storage). Names are trimmed and must differ.
    pub fn with_id(
        id: MatchId,
        player_a: impl Into<String>,
        player_b: impl Into<String>,
        score: impl Into<String>,
        date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let player_a = player_a.into().trim().to_string();
        let player_b = player_b.into().trim().to_string();
        if player_a.is_empty() || player_b.is_empty() {
            return Err(ValidationError::BlankName);
        }
        if normalize_name(&player_a) == normalize_name(&player_b) {
            return Err(ValidationError::SamePlayer);
        }
        Ok(Self {
            id,
            player_a,
            player_b,
            score: score.into().trim().to_string(),
            date,
        })
    }

    /// Name on the given side.
    pub fn player(&self, side: Side) -> &str {
        match side {
            Side::A => &self.player_a,
            Side::B => &self.player_b,
        }
    }

    /// Which side the player with normalized key `key` is on, if any.
    pub fn side_of(&self, key: &str) -> Option<Side> {
        if normalize_name(&self.player_a) == key {
            Some(Side::A)
        } else if normalize_name(&self.player_b) == key {
            Some(Side::B)
        } else {
            None
        }
    }

    /// True if the named player took part in this match (case-insensitive).
    pub fn involves(&self, name: &str) -> bool {
        self.side_of(&normalize_name(name)).is_some()
    }

    /// Replacement record: same id and player pair, new score and date.
    pub fn replaced(&self, score: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            score: score.into().trim().to_string(),
            date,
            ..self.clone()
        }
    }

    /// Same pair (in either order), same score text (ignoring case and spacing) and same date.
    pub fn is_duplicate_of(&self, other: &TennisMatch) -> bool {
        let (a, b) = (normalize_name(&self.player_a), normalize_name(&self.player_b));
        let (oa, ob) = (normalize_name(&other.player_a), normalize_name(&other.player_b));
        let same_pair = (a == oa && b == ob) || (a == ob && b == oa);
        same_pair && compact_score(&self.score) == compact_score(&other.score) && self.date == other.date
    }
}

fn compact_score(score: &str) -> String {
    score
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}
