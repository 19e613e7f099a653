//! Per-player statistics over a snapshot of matches.
//!
//! Only matches with a determinable winner count. A match whose score fails
//! validation, or whose sets are split evenly, is skipped rather than reported.

use crate::logic::outcome::resolve_outcome;
use crate::logic::score::validate_score;
use crate::models::{normalize_name, Side, TennisMatch};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Errors from a statistics request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StatsError {
    /// A required argument (e.g. the player name) was blank.
    InvalidArgument(String),
}

impl std::fmt::Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for StatsError {}

/// Inclusive date window; an absent bound is open.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// No bounds.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

/// Aggregated results for one player. Also the shape of a leaderboard row.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub name: String,
    /// Matches with a determinable winner (`wins + losses`).
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    /// `wins * 100 / matches` rounded to one decimal; 0.0 with no matches.
    pub win_rate_percent: f64,
}

/// Running win/loss count for one player.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Tally {
    pub wins: u32,
    pub losses: u32,
}

impl Tally {
    pub fn record(&mut self, won: bool) {
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }

    pub fn into_stats(self, name: impl Into<String>) -> PlayerStats {
        PlayerStats {
            name: name.into(),
            matches: self.wins + self.losses,
            wins: self.wins,
            losses: self.losses,
            win_rate_percent: win_rate_percent(self.wins, self.losses),
        }
    }
}

/// Win rate in percent rounded to one decimal place; 0.0 when nothing was decided.
pub fn win_rate_percent(wins: u32, losses: u32) -> f64 {
    let decided = wins + losses;
    if decided == 0 {
        return 0.0;
    }
    round1(f64::from(wins) * 100.0 / f64::from(decided))
}

/// Round half away from zero to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Winning side of a match, or `None` if its score is invalid, the sets are split,
/// or both sides name the same player.
pub fn decided_winner(m: &TennisMatch) -> Option<Side> {
    if normalize_name(&m.player_a) == normalize_name(&m.player_b) {
        log::debug!("Skipping match {}: same player on both sides", m.id);
        return None;
    }
    match validate_score(&m.score) {
        Ok(sets) => {
            let winner = resolve_outcome(&sets).winner();
            if winner.is_none() {
                log::debug!("Skipping undetermined match {} ({})", m.id, m.score);
            }
            winner
        }
        Err(e) => {
            log::debug!("Skipping match {} with invalid score: {}", m.id, e);
            None
        }
    }
}

/// Matches within `range`, restricted to those involving `player` when given.
pub fn select_matches<'a>(
    matches: &'a [TennisMatch],
    player: Option<&str>,
    range: DateRange,
) -> impl Iterator<Item = &'a TennisMatch> + 'a {
    let key = player.map(normalize_name);
    matches.iter().filter(move |m| {
        range.contains(m.date) && key.as_deref().map_or(true, |k| m.side_of(k).is_some())
    })
}

/// Stats for `player_name` over `matches` within `range`.
///
/// The name is matched case-insensitively against either side. Fails only when the
/// name is blank.
pub fn compute_player_stats(
    player_name: &str,
    matches: &[TennisMatch],
    range: DateRange,
) -> Result<PlayerStats, StatsError> {
    let name = player_name.trim();
    if name.is_empty() {
        return Err(StatsError::InvalidArgument(
            "player name must not be blank".to_string(),
        ));
    }
    let key = normalize_name(name);

    let mut tally = Tally::default();
    for m in select_matches(matches, Some(name), range) {
        let Some(side) = m.side_of(&key) else {
            continue;
        };
        if let Some(winner) = decided_winner(m) {
            tally.record(winner == side);
        }
    }
    Ok(tally.into_stats(name))
}
