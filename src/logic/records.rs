//! Record keeping shared by every storage backend: player and match CRUD with
//! business validation, plus the statistics entry points over a store snapshot.

use crate::logic::leaderboard::Leaderboard;
use crate::logic::score::{validate_score, ScoreError};
use crate::logic::stats::{compute_player_stats, select_matches, DateRange, PlayerStats, StatsError};
use crate::models::{
    normalize_name, parse_date, MatchId, Player, PlayerType, TennisMatch, ValidationError,
};
use crate::store::{Store, StoreError};
use serde::Deserialize;

/// Youngest age accepted when registering or updating a player.
pub const MIN_AGE: u32 = 5;
/// Oldest age accepted when registering or updating a player.
pub const MAX_AGE: u32 = 120;

/// Errors from record operations.
#[derive(Debug)]
pub enum RecordError {
    Validation(ValidationError),
    Score(ScoreError),
    Stats(StatsError),
    /// A player with this name (case-insensitive) already exists.
    DuplicatePlayer(String),
    /// Same pair, score and date is already recorded.
    DuplicateMatch,
    PlayerNotFound(String),
    MatchNotFound(MatchId),
    /// Player still appears in recorded matches and cannot be removed.
    PlayerHasMatches { name: String, matches: usize },
    Store(StoreError),
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordError::Validation(e) => write!(f, "{}", e),
            RecordError::Score(e) => write!(f, "{}", e),
            RecordError::Stats(e) => write!(f, "{}", e),
            RecordError::DuplicatePlayer(name) => write!(
                f,
                "A player named '{}' already exists; use the full name to tell players apart",
                name
            ),
            RecordError::DuplicateMatch => write!(f, "This match is already recorded"),
            RecordError::PlayerNotFound(name) => write!(f, "Player not found: {}", name),
            RecordError::MatchNotFound(id) => write!(f, "Match not found: {}", id),
            RecordError::PlayerHasMatches { name, matches } => write!(
                f,
                "Player '{}' appears in {} recorded match(es); delete those first",
                name, matches
            ),
            RecordError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RecordError {}

impl From<ValidationError> for RecordError {
    fn from(e: ValidationError) -> Self {
        RecordError::Validation(e)
    }
}

impl From<ScoreError> for RecordError {
    fn from(e: ScoreError) -> Self {
        RecordError::Score(e)
    }
}

impl From<StatsError> for RecordError {
    fn from(e: StatsError) -> Self {
        RecordError::Stats(e)
    }
}

impl From<StoreError> for RecordError {
    fn from(e: StoreError) -> Self {
        RecordError::Store(e)
    }
}

/// New player as submitted by a client; `type` is free text (see [`PlayerType::from_input`]).
#[derive(Clone, Debug, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    pub age: u32,
    #[serde(rename = "type")]
    pub player_type: String,
}

/// New age and type for an existing player. The name is the identity and does not change.
#[derive(Clone, Debug, Deserialize)]
pub struct PlayerUpdate {
    pub age: u32,
    #[serde(rename = "type")]
    pub player_type: String,
}

/// New match as submitted by a client; `date` is `YYYY-MM-DD`.
#[derive(Clone, Debug, Deserialize)]
pub struct NewMatch {
    pub player_a: String,
    pub player_b: String,
    pub score: String,
    pub date: String,
}

/// Replacement values for a match; absent or blank fields keep the current value.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MatchUpdate {
    #[serde(default)]
    pub new_score: Option<String>,
    #[serde(default)]
    pub new_date: Option<String>,
}

fn check_age(age: u32) -> Result<u32, ValidationError> {
    if (MIN_AGE..=MAX_AGE).contains(&age) {
        Ok(age)
    } else {
        Err(ValidationError::AgeOutOfRange {
            min: MIN_AGE,
            max: MAX_AGE,
            found: age,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn list_players(store: &dyn Store) -> Result<Vec<Player>, RecordError> {
    Ok(store.list_players()?)
}

pub fn get_player(store: &dyn Store, name: &str) -> Result<Player, RecordError> {
    store
        .find_player(name)?
        .ok_or_else(|| RecordError::PlayerNotFound(name.trim().to_string()))
}

/// Register a player. Names are unique case-insensitively.
pub fn create_player(store: &mut dyn Store, input: NewPlayer) -> Result<Player, RecordError> {
    let player_type: PlayerType = input.player_type.parse()?;
    let player = Player::new(input.name, check_age(input.age)?, player_type)?;
    if store.find_player(&player.name)?.is_some() {
        return Err(RecordError::DuplicatePlayer(player.name));
    }
    store.save_player(player.clone())?;
    log::info!("Added player {} ({})", player.name, player.player_type);
    Ok(player)
}

/// Change age and type of the player named `name`.
pub fn update_player(
    store: &mut dyn Store,
    name: &str,
    input: PlayerUpdate,
) -> Result<Player, RecordError> {
    let existing = get_player(store, name)?;
    let player_type: PlayerType = input.player_type.parse()?;
    let updated = Player::new(existing.name, check_age(input.age)?, player_type)?;
    store.save_player(updated.clone())?;
    log::info!("Updated player {}", updated.name);
    Ok(updated)
}

/// Remove a player who has no recorded matches.
pub fn delete_player(store: &mut dyn Store, name: &str) -> Result<(), RecordError> {
    let player = get_player(store, name)?;
    let played = store
        .list_matches()?
        .iter()
        .filter(|m| m.involves(&player.name))
        .count();
    if played > 0 {
        return Err(RecordError::PlayerHasMatches {
            name: player.name,
            matches: played,
        });
    }
    if !store.delete_player(&player.name)? {
        return Err(RecordError::PlayerNotFound(player.name));
    }
    log::info!("Deleted player {}", player.name);
    Ok(())
}

/// Matches, optionally only those of `player` and within `range`, oldest first.
pub fn list_matches(
    store: &dyn Store,
    player: Option<&str>,
    range: DateRange,
) -> Result<Vec<TennisMatch>, RecordError> {
    let all = store.list_matches()?;
    let player = non_blank(player);
    let mut selected: Vec<TennisMatch> = select_matches(&all, player, range).cloned().collect();
    selected.sort_by_key(|m| m.date);
    Ok(selected)
}

pub fn get_match(store: &dyn Store, id: MatchId) -> Result<TennisMatch, RecordError> {
    store.find_match(id)?.ok_or(RecordError::MatchNotFound(id))
}

/// Record a match between two registered players.
///
/// The score must pass the strict set rules; stored names use the registered spelling.
pub fn create_match(store: &mut dyn Store, input: NewMatch) -> Result<TennisMatch, RecordError> {
    let name_a = non_blank(Some(input.player_a.as_str())).ok_or(ValidationError::BlankName)?;
    let name_b = non_blank(Some(input.player_b.as_str())).ok_or(ValidationError::BlankName)?;
    if normalize_name(name_a) == normalize_name(name_b) {
        return Err(ValidationError::SamePlayer.into());
    }
    validate_score(&input.score)?;
    let date = parse_date(&input.date)?;

    let player_a = get_player(store, name_a)?;
    let player_b = get_player(store, name_b)?;
    let m = TennisMatch::new(player_a.name, player_b.name, input.score, date)?;
    if store.exists_duplicate(&m)? {
        return Err(RecordError::DuplicateMatch);
    }
    store.save_match(m.clone())?;
    log::info!("Added match {} vs {} ({}) on {}", m.player_a, m.player_b, m.score, m.date);
    Ok(m)
}

/// Replace the score and/or date of a match, keeping its id and players.
pub fn update_match(
    store: &mut dyn Store,
    id: MatchId,
    input: MatchUpdate,
) -> Result<TennisMatch, RecordError> {
    let existing = get_match(store, id)?;
    let score = match non_blank(input.new_score.as_deref()) {
        Some(score) => {
            validate_score(score)?;
            score.to_string()
        }
        None => existing.score.clone(),
    };
    let date = match non_blank(input.new_date.as_deref()) {
        Some(date) => parse_date(date)?,
        None => existing.date,
    };
    let updated = existing.replaced(score, date);
    if store.exists_duplicate(&updated)? {
        return Err(RecordError::DuplicateMatch);
    }
    store.save_match(updated.clone())?;
    log::info!("Updated match {}: {} on {}", updated.id, updated.score, updated.date);
    Ok(updated)
}

pub fn delete_match(store: &mut dyn Store, id: MatchId) -> Result<(), RecordError> {
    if !store.delete_match(id)? {
        return Err(RecordError::MatchNotFound(id));
    }
    log::info!("Deleted match {}", id);
    Ok(())
}

/// Stats for one player over the current store contents.
pub fn player_stats(
    store: &dyn Store,
    name: &str,
    range: DateRange,
) -> Result<PlayerStats, RecordError> {
    let matches = store.list_matches()?;
    Ok(compute_player_stats(name, &matches, range)?)
}

/// Leaderboard over the current store contents.
pub fn leaderboard(store: &dyn Store) -> Result<Leaderboard, RecordError> {
    let players = store.list_players()?;
    let matches = store.list_matches()?;
    Ok(Leaderboard::build(&players, &matches))
}
