//! Persistence for players and matches.
//!
//! One [`Store`] trait with two backends, picked once at startup:
//! - [`CsvStore`]: `;`-delimited flat files in a data directory.
//! - [`SqliteStore`]: a relational database file (or in-memory for tests).
//!
//! Business rules live in [`crate::logic`]; stores only load and save records.

mod csv_store;
mod sqlite_store;

pub use csv_store::CsvStore;
pub use sqlite_store::SqliteStore;

use crate::models::{normalize_name, MatchId, Player, TennisMatch};

/// Errors from a storage backend.
#[derive(Debug)]
pub enum StoreError {
    /// File system error (creating the data directory, reading or writing files).
    Io(std::io::Error),
    /// CSV reader/writer error other than plain I/O.
    Csv(csv::Error),
    /// Error from SQLite.
    Database(rusqlite::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "storage I/O error: {}", e),
            StoreError::Csv(e) => write!(f, "CSV error: {}", e),
            StoreError::Database(e) => write!(f, "database error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Csv(e) => Some(e),
            StoreError::Database(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<csv::Error> for StoreError {
    fn from(e: csv::Error) -> Self {
        StoreError::Csv(e)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e)
    }
}

/// Player and match persistence. Players are keyed by normalized name, matches by id.
pub trait Store: Send {
    /// Short backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;

    fn list_players(&self) -> Result<Vec<Player>, StoreError>;

    /// Player whose name matches `name` case-insensitively.
    fn find_player(&self, name: &str) -> Result<Option<Player>, StoreError> {
        let key = normalize_name(name);
        Ok(self.list_players()?.into_iter().find(|p| p.key() == key))
    }

    /// Insert, or replace the player with the same normalized name.
    fn save_player(&mut self, player: Player) -> Result<(), StoreError>;

    /// Remove by name; `false` if no such player.
    fn delete_player(&mut self, name: &str) -> Result<bool, StoreError>;

    fn list_matches(&self) -> Result<Vec<TennisMatch>, StoreError>;

    fn find_match(&self, id: MatchId) -> Result<Option<TennisMatch>, StoreError> {
        Ok(self.list_matches()?.into_iter().find(|m| m.id == id))
    }

    /// Insert, or replace the match with the same id.
    fn save_match(&mut self, m: TennisMatch) -> Result<(), StoreError>;

    /// Remove by id; `false` if no such match.
    fn delete_match(&mut self, id: MatchId) -> Result<bool, StoreError>;

    /// True if another stored match has the same pair, score and date as `candidate`.
    fn exists_duplicate(&self, candidate: &TennisMatch) -> Result<bool, StoreError> {
        Ok(self
            .list_matches()?
            .iter()
            .any(|m| m.id != candidate.id && m.is_duplicate_of(candidate)))
    }
}
