//! Runtime configuration read from environment variables.
//!
//! | Variable          | Default              |
//! |-------------------|----------------------|
//! | `HOST`            | `0.0.0.0`            |
//! | `PORT`            | `8080`               |
//! | `TENNIS_PROFILE`  | `csv` (or `sqlite`)  |
//! | `TENNIS_DATA_DIR` | `data`               |
//! | `TENNIS_DB_PATH`  | `<data dir>/tennis.db` |
//! | `TENNIS_SEED`     | `true`               |

use crate::store::{CsvStore, SqliteStore, Store, StoreError};
use std::path::PathBuf;

/// Which storage backend serves requests.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum StorageProfile {
    /// Flat `;`-delimited files in the data directory.
    #[default]
    Csv,
    /// SQLite database file.
    Sqlite,
}

impl StorageProfile {
    /// Parse a profile name. `db`, `h2`, `mysql` and `jpa` are accepted as relational aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "csv" | "file" | "files" => Some(StorageProfile::Csv),
            "sqlite" | "db" | "h2" | "mysql" | "jpa" => Some(StorageProfile::Sqlite),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub profile: StorageProfile,
    pub data_dir: PathBuf,
    pub database_path: PathBuf,
    /// Fill an empty database from the CSV files in `data_dir` at startup.
    pub seed_database: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = PathBuf::from("data");
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            profile: StorageProfile::Csv,
            database_path: data_dir.join("tennis.db"),
            data_dir,
            seed_database: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable values are logged and replaced by defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or(defaults.host);
        let port = match lookup("PORT") {
            Some(p) => p.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid PORT '{}', using {}", p, defaults.port);
                defaults.port
            }),
            None => defaults.port,
        };
        let profile = match lookup("TENNIS_PROFILE") {
            Some(name) => StorageProfile::from_name(&name).unwrap_or_else(|| {
                log::warn!("Unknown TENNIS_PROFILE '{}', using csv", name);
                StorageProfile::Csv
            }),
            None => defaults.profile,
        };
        let data_dir = lookup("TENNIS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let database_path = lookup("TENNIS_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("tennis.db"));
        let seed_database = match lookup("TENNIS_SEED") {
            Some(v) => !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off"),
            None => defaults.seed_database,
        };

        Self {
            host,
            port,
            profile,
            data_dir,
            database_path,
            seed_database,
        }
    }

    /// Open the backend selected by `profile`.
    pub fn open_store(&self) -> Result<Box<dyn Store>, StoreError> {
        match self.profile {
            StorageProfile::Csv => {
                log::info!("Using CSV storage in {}", self.data_dir.display());
                Ok(Box::new(CsvStore::open(&self.data_dir)?))
            }
            StorageProfile::Sqlite => {
                let mut db = SqliteStore::open(&self.database_path)?;
                if self.seed_database && self.data_dir.join("players.csv").exists() {
                    let source = CsvStore::open(&self.data_dir)?;
                    db.seed_from(&source)?;
                }
                Ok(Box::new(db))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config_from(&[]), AppConfig::default());
    }

    #[test]
    fn profile_aliases_select_sqlite() {
        let cfg = config_from(&[("TENNIS_PROFILE", "MySQL"), ("TENNIS_DATA_DIR", "/srv/tennis")]);
        assert_eq!(cfg.profile, StorageProfile::Sqlite);
        assert_eq!(cfg.database_path, PathBuf::from("/srv/tennis/tennis.db"));
    }

    #[test]
    fn invalid_values_fall_back() {
        let cfg = config_from(&[("PORT", "eighty"), ("TENNIS_PROFILE", "oracle"), ("TENNIS_SEED", "off")]);
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.profile, StorageProfile::Csv);
        assert!(!cfg.seed_database);
    }
}
