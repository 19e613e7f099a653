//! Leaderboard: stats for every known player, ranked by win rate.

use crate::logic::stats::{decided_winner, PlayerStats, Tally};
use crate::models::{normalize_name, Player, Side, TennisMatch};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// One ranked row; same shape as [`PlayerStats`].
pub type LeaderboardRow = PlayerStats;

/// Largest `n` accepted by [`Leaderboard::top`].
pub const MAX_TOP: usize = 100;

/// Header line of the delimited export.
pub const EXPORT_HEADER: &str = "Name;Matches;Wins;Losses;WinRate(%)";

/// Ranked rows, best first.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Leaderboard {
    rows: Vec<LeaderboardRow>,
}

impl Leaderboard {
    /// Rank every player (deduplicated by case-insensitive name) over all matches.
    ///
    /// Players without a determinable match are left out. Order: win rate descending,
    /// then matches descending, then name ascending (case-insensitive).
    pub fn build(players: &[Player], matches: &[TennisMatch]) -> Self {
        let mut tallies: HashMap<String, (String, Tally)> = HashMap::new();
        for p in players {
            tallies
                .entry(p.key())
                .or_insert_with(|| (p.name.clone(), Tally::default()));
        }

        for m in matches {
            let Some(winner) = decided_winner(m) else {
                continue;
            };
            for side in [Side::A, Side::B] {
                if let Some((_, tally)) = tallies.get_mut(&normalize_name(m.player(side))) {
                    tally.record(winner == side);
                }
            }
        }

        let mut rows: Vec<LeaderboardRow> = tallies
            .into_values()
            .map(|(name, tally)| tally.into_stats(name))
            .filter(|row| row.matches > 0)
            .collect();
        rows.sort_by(compare_rows);
        log::debug!("Leaderboard built: {} ranked of {} players", rows.len(), players.len());
        Self { rows }
    }

    pub fn rows(&self) -> &[LeaderboardRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `n` rows, with `n` clamped to `1..=MAX_TOP` (and to the board length).
    pub fn top(&self, n: usize) -> &[LeaderboardRow] {
        let n = n.clamp(1, MAX_TOP).min(self.rows.len());
        &self.rows[..n]
    }

    /// Copy without players whose win rate is 0.0 (display filter for "winners only" views).
    pub fn without_winless(&self) -> Leaderboard {
        Self {
            rows: self
                .rows
                .iter()
                .filter(|row| row.win_rate_percent > 0.0)
                .cloned()
                .collect(),
        }
    }

    /// `;`-separated export: header, then one line per row. Win rate always has one
    /// fractional digit with `.` as separator.
    pub fn to_delimited_text(&self) -> String {
        let mut out = String::with_capacity(EXPORT_HEADER.len() + 1 + self.rows.len() * 32);
        out.push_str(EXPORT_HEADER);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&format!(
                "{};{};{};{};{:.1}\n",
                quote_field(&row.name),
                row.matches,
                row.wins,
                row.losses,
                row.win_rate_percent
            ));
        }
        out
    }
}

fn compare_rows(a: &LeaderboardRow, b: &LeaderboardRow) -> Ordering {
    b.win_rate_percent
        .total_cmp(&a.win_rate_percent)
        .then_with(|| b.matches.cmp(&a.matches))
        .then_with(|| normalize_name(&a.name).cmp(&normalize_name(&b.name)))
        .then_with(|| a.name.cmp(&b.name))
}

/// Quote a field only if it would break the line format.
fn quote_field(field: &str) -> String {
    if field.contains(|c: char| matches!(c, ';' | '"' | '\n' | '\r')) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
