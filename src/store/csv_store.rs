//! Flat-file backend: `players.csv` and `matches.csv`, `;`-delimited with a header row.
//!
//! Files are re-read on every call and rewritten on every change. Rows that cannot be
//! turned into valid records are skipped with a warning, so one bad line never hides
//! the rest of the file.

use crate::logic::validate_score;
use crate::models::{normalize_name, parse_date, MatchId, Player, PlayerType, TennisMatch};
use crate::store::{Store, StoreError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const PLAYERS_FILE: &str = "players.csv";
const MATCHES_FILE: &str = "matches.csv";
const PLAYERS_HEADER: [&str; 3] = ["Name", "Age", "Type"];
const MATCHES_HEADER: [&str; 5] = ["Id", "PlayerA", "PlayerB", "Score", "Date"];

#[derive(Debug, Serialize, Deserialize)]
struct PlayerRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Age")]
    age: u32,
    #[serde(rename = "Type")]
    player_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct MatchRow {
    #[serde(rename = "Id", default)]
    id: String,
    #[serde(rename = "PlayerA")]
    player_a: String,
    #[serde(rename = "PlayerB")]
    player_b: String,
    #[serde(rename = "Score")]
    score: String,
    #[serde(rename = "Date")]
    date: String,
}

/// Store backed by two CSV files in one directory.
#[derive(Clone, Debug)]
pub struct CsvStore {
    players_path: PathBuf,
    matches_path: PathBuf,
}

impl CsvStore {
    /// Use `dir` as the data directory, creating it and empty (header-only) files as needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let store = Self {
            players_path: dir.join(PLAYERS_FILE),
            matches_path: dir.join(MATCHES_FILE),
        };
        if !store.players_path.exists() {
            write_rows::<PlayerRow>(&store.players_path, &PLAYERS_HEADER, &[])?;
            log::info!("Created {}", store.players_path.display());
        }
        if !store.matches_path.exists() {
            write_rows::<MatchRow>(&store.matches_path, &MATCHES_HEADER, &[])?;
            log::info!("Created {}", store.matches_path.display());
        }
        Ok(store)
    }

    fn read_players(&self) -> Result<Vec<Player>, StoreError> {
        let mut players: Vec<Player> = Vec::new();
        for (line, row) in read_rows::<PlayerRow>(&self.players_path)? {
            let player_type = PlayerType::from_input(&row.player_type).unwrap_or_else(|| {
                log::warn!(
                    "{}:{}: unknown type '{}', using {}",
                    PLAYERS_FILE,
                    line,
                    row.player_type,
                    PlayerType::Amateur
                );
                PlayerType::Amateur
            });
            let player = match Player::new(row.name, row.age, player_type) {
                Ok(p) => p,
                Err(e) => {
                    log::warn!("{}:{}: skipping player: {}", PLAYERS_FILE, line, e);
                    continue;
                }
            };
            if players.iter().any(|p| p.key() == player.key()) {
                log::warn!("{}:{}: skipping duplicate player '{}'", PLAYERS_FILE, line, player.name);
                continue;
            }
            players.push(player);
        }
        Ok(players)
    }

    fn write_players(&self, players: &[Player]) -> Result<(), StoreError> {
        let rows: Vec<PlayerRow> = players
            .iter()
            .map(|p| PlayerRow {
                name: p.name.clone(),
                age: p.age,
                player_type: p.player_type.display_name().to_string(),
            })
            .collect();
        write_rows(&self.players_path, &PLAYERS_HEADER, &rows)
    }

    /// Matches whose players exist in `players`; names take the players' spelling.
    fn read_matches(&self, players: &[Player]) -> Result<Vec<TennisMatch>, StoreError> {
        let names: HashMap<String, &str> = players.iter().map(|p| (p.key(), p.name.as_str())).collect();
        let mut matches: Vec<TennisMatch> = Vec::new();
        for (line, row) in read_rows::<MatchRow>(&self.matches_path)? {
            match match_from_row(row, &names) {
                Ok(m) => {
                    if matches.iter().any(|x| x.id == m.id || x.is_duplicate_of(&m)) {
                        log::warn!("{}:{}: skipping duplicate match", MATCHES_FILE, line);
                        continue;
                    }
                    matches.push(m);
                }
                Err(reason) => log::warn!("{}:{}: skipping match: {}", MATCHES_FILE, line, reason),
            }
        }
        Ok(matches)
    }

    fn write_matches(&self, matches: &[TennisMatch]) -> Result<(), StoreError> {
        let rows: Vec<MatchRow> = matches
            .iter()
            .map(|m| MatchRow {
                id: m.id.to_string(),
                player_a: m.player_a.clone(),
                player_b: m.player_b.clone(),
                score: m.score.clone(),
                date: m.date.format("%Y-%m-%d").to_string(),
            })
            .collect();
        write_rows(&self.matches_path, &MATCHES_HEADER, &rows)
    }
}

fn match_from_row(row: MatchRow, names: &HashMap<String, &str>) -> Result<TennisMatch, String> {
    let player_a = names
        .get(&normalize_name(&row.player_a))
        .ok_or_else(|| format!("unknown player '{}'", row.player_a))?;
    let player_b = names
        .get(&normalize_name(&row.player_b))
        .ok_or_else(|| format!("unknown player '{}'", row.player_b))?;
    validate_score(&row.score).map_err(|e| e.to_string())?;
    let date = parse_date(&row.date).map_err(|e| e.to_string())?;
    let id = if row.id.is_empty() {
        derived_match_id(player_a, player_b, &row.score, date)
    } else {
        Uuid::parse_str(&row.id).map_err(|e| format!("bad id '{}': {}", row.id, e))?
    };
    TennisMatch::with_id(id, *player_a, *player_b, row.score, date).map_err(|e| e.to_string())
}

/// Id for a row written without one. Same row contents always give the same id, so the
/// match stays addressable between reads until the file is rewritten with explicit ids.
fn derived_match_id(player_a: &str, player_b: &str, score: &str, date: NaiveDate) -> MatchId {
    let compact_score: String = score.chars().filter(|c| !c.is_whitespace()).collect();
    let name = format!(
        "{};{};{};{}",
        normalize_name(player_a),
        normalize_name(player_b),
        compact_score,
        date.format("%Y-%m-%d")
    );
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
}

/// Deserialize every row of `path`, paired with its 1-based line number.
/// Unparseable rows are logged and dropped; I/O failures are returned.
fn read_rows<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<(u64, T)>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                log::warn!("{}: skipping unreadable row: {}", path.display(), e);
                continue;
            }
        };
        let line = record.position().map_or(0, |p| p.line());
        match record.deserialize::<T>(Some(&headers)) {
            Ok(row) => rows.push((line, row)),
            Err(e) => log::warn!("{}:{}: skipping unreadable row: {}", path.display(), line, e),
        }
    }
    Ok(rows)
}

fn write_rows<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<(), StoreError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

impl Store for CsvStore {
    fn backend(&self) -> &'static str {
        "csv"
    }

    fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        self.read_players()
    }

    fn save_player(&mut self, player: Player) -> Result<(), StoreError> {
        let mut players = self.read_players()?;
        match players.iter_mut().find(|p| p.key() == player.key()) {
            Some(existing) => *existing = player,
            None => players.push(player),
        }
        self.write_players(&players)
    }

    fn delete_player(&mut self, name: &str) -> Result<bool, StoreError> {
        let key = normalize_name(name);
        let mut players = self.read_players()?;
        let before = players.len();
        players.retain(|p| p.key() != key);
        if players.len() == before {
            return Ok(false);
        }
        self.write_players(&players)?;
        Ok(true)
    }

    fn list_matches(&self) -> Result<Vec<TennisMatch>, StoreError> {
        let players = self.read_players()?;
        self.read_matches(&players)
    }

    fn save_match(&mut self, m: TennisMatch) -> Result<(), StoreError> {
        let mut matches = self.list_matches()?;
        match matches.iter_mut().find(|x| x.id == m.id) {
            Some(existing) => *existing = m,
            None => matches.push(m),
        }
        self.write_matches(&matches)
    }

    fn delete_match(&mut self, id: MatchId) -> Result<bool, StoreError> {
        let mut matches = self.list_matches()?;
        let before = matches.len();
        matches.retain(|m| m.id != id);
        if matches.len() == before {
            return Ok(false);
        }
        self.write_matches(&matches)?;
        Ok(true)
    }
}
