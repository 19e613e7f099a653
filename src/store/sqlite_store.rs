//! Relational backend on SQLite (rusqlite).

use crate::models::{normalize_name, MatchId, Player, PlayerType, TennisMatch};
use crate::store::{Store, StoreError};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use uuid::Uuid;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS players (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        name_key TEXT NOT NULL UNIQUE,
        age INTEGER NOT NULL,
        player_type TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS matches (
        id TEXT PRIMARY KEY,
        player_a_key TEXT NOT NULL REFERENCES players (name_key),
        player_b_key TEXT NOT NULL REFERENCES players (name_key),
        score TEXT NOT NULL,
        played_on TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_matches_played_on ON matches (played_on);
";

const SELECT_PLAYERS: &str = "SELECT name, age, player_type FROM players";

const SELECT_MATCHES: &str = "
    SELECT m.id, pa.name, pb.name, m.score, m.played_on
    FROM matches m
    JOIN players pa ON pa.name_key = m.player_a_key
    JOIN players pb ON pb.name_key = m.player_b_key";

/// Store backed by a single SQLite connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database file at `path` and ensure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let store = Self {
            conn: Connection::open(path)?,
        };
        store.initialize_schema()?;
        log::info!("Opened database {}", path.display());
        Ok(store)
    }

    /// Private in-memory database (tests, throwaway runs).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    pub fn player_count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM players", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Copy all players and matches from `source` if this database has no players yet.
    /// Returns the number of (players, matches) copied.
    pub fn seed_from(&mut self, source: &dyn Store) -> Result<(usize, usize), StoreError> {
        if self.player_count()? > 0 {
            log::info!("Database already has players; skipping seed from {}", source.backend());
            return Ok((0, 0));
        }
        let players = source.list_players()?;
        let matches = source.list_matches()?;
        let tx = self.conn.transaction()?;
        for p in &players {
            insert_or_update_player(&tx, p)?;
        }
        for m in &matches {
            insert_or_update_match(&tx, m)?;
        }
        tx.commit()?;
        log::info!(
            "Seeded database from {}: {} players, {} matches",
            source.backend(),
            players.len(),
            matches.len()
        );
        Ok((players.len(), matches.len()))
    }
}

fn insert_or_update_player(conn: &Connection, p: &Player) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO players (name, name_key, age, player_type) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (name_key) DO UPDATE SET
            name = excluded.name, age = excluded.age, player_type = excluded.player_type",
        params![p.name, p.key(), p.age, p.player_type.display_name()],
    )
}

fn insert_or_update_match(conn: &Connection, m: &TennisMatch) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO matches (id, player_a_key, player_b_key, score, played_on)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (id) DO UPDATE SET
            player_a_key = excluded.player_a_key, player_b_key = excluded.player_b_key,
            score = excluded.score, played_on = excluded.played_on",
        params![
            m.id.to_string(),
            normalize_name(&m.player_a),
            normalize_name(&m.player_b),
            m.score,
            m.date
        ],
    )
}

fn conversion_error(
    column: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e))
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    let type_text: String = row.get(2)?;
    let player_type = type_text
        .parse::<PlayerType>()
        .map_err(|e| conversion_error(2, e))?;
    Ok(Player {
        name: row.get(0)?,
        age: row.get(1)?,
        player_type,
    })
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<TennisMatch> {
    let id_text: String = row.get(0)?;
    let id = Uuid::parse_str(&id_text).map_err(|e| conversion_error(0, e))?;
    Ok(TennisMatch {
        id,
        player_a: row.get(1)?,
        player_b: row.get(2)?,
        score: row.get(3)?,
        date: row.get(4)?,
    })
}

impl Store for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        let mut stmt = self.conn.prepare(&format!("{} ORDER BY id", SELECT_PLAYERS))?;
        let rows = stmt
            .query_map([], parse_player_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn find_player(&self, name: &str) -> Result<Option<Player>, StoreError> {
        let sql = format!("{} WHERE name_key = ?1", SELECT_PLAYERS);
        let player = self
            .conn
            .query_row(&sql, params![normalize_name(name)], parse_player_row)
            .optional()?;
        Ok(player)
    }

    fn save_player(&mut self, player: Player) -> Result<(), StoreError> {
        insert_or_update_player(&self.conn, &player)?;
        Ok(())
    }

    fn delete_player(&mut self, name: &str) -> Result<bool, StoreError> {
        let removed = self.conn.execute(
            "DELETE FROM players WHERE name_key = ?1",
            params![normalize_name(name)],
        )?;
        Ok(removed > 0)
    }

    fn list_matches(&self) -> Result<Vec<TennisMatch>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY m.played_on, m.rowid", SELECT_MATCHES))?;
        let rows = stmt
            .query_map([], parse_match_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn find_match(&self, id: MatchId) -> Result<Option<TennisMatch>, StoreError> {
        let sql = format!("{} WHERE m.id = ?1", SELECT_MATCHES);
        let found = self
            .conn
            .query_row(&sql, params![id.to_string()], parse_match_row)
            .optional()?;
        Ok(found)
    }

    fn save_match(&mut self, m: TennisMatch) -> Result<(), StoreError> {
        insert_or_update_match(&self.conn, &m)?;
        Ok(())
    }

    fn delete_match(&mut self, id: MatchId) -> Result<bool, StoreError> {
        let removed = self
            .conn
            .execute("DELETE FROM matches WHERE id = ?1", params![id.to_string()])?;
        Ok(removed > 0)
    }
}
