//! Player and PlayerType data structures.

use crate::models::validation::{normalize_name, ValidationError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Longest accepted player name.
pub const MAX_NAME_LEN: usize = 50;

/// Competitive level of a player.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerType {
    #[default]
    Amateur,
    Professional,
}

impl PlayerType {
    /// Map free-form user input (any case, with or without diacritics) to a type.
    pub fn from_input(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "amateur" | "amater" | "amatér" => Some(PlayerType::Amateur),
            "professional" | "profesional" | "profesionál" => Some(PlayerType::Professional),
            _ => None,
        }
    }

    /// Human-readable label, also used as the stored form.
    pub fn display_name(self) -> &'static str {
        match self {
            PlayerType::Amateur => "Amateur",
            PlayerType::Professional => "Professional",
        }
    }
}

impl FromStr for PlayerType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlayerType::from_input(s).ok_or_else(|| ValidationError::UnknownPlayerType(s.trim().to_string()))
    }
}

impl std::fmt::Display for PlayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A registered player. Identity is the name, compared case-insensitively.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub age: u32,
    #[serde(rename = "type")]
    pub player_type: PlayerType,
}

impl Player {
    /// Create a player; the name is trimmed. Name must be non-blank and at most
    /// [`MAX_NAME_LEN`] characters, age must be positive.
    pub fn new(
        name: impl Into<String>,
        age: u32,
        player_type: PlayerType,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::BlankName);
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::NameTooLong { max: MAX_NAME_LEN });
        }
        if age == 0 {
            return Err(ValidationError::AgeOutOfRange {
                min: 1,
                max: u32::MAX,
                found: age,
            });
        }
        Ok(Self {
            name: name.to_string(),
            age,
            player_type,
        })
    }

    /// Normalized identity key (see [`normalize_name`]).
    pub fn key(&self) -> String {
        normalize_name(&self.name)
    }

    /// True if `name` refers to this player (case-insensitive, ignoring surrounding whitespace).
    pub fn is_named(&self, name: &str) -> bool {
        self.key() == normalize_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_name_and_rejects_blank() {
        let p = Player::new("  Roger  ", 40, PlayerType::Professional).unwrap();
        assert_eq!(p.name, "Roger");
        assert_eq!(
            Player::new("   ", 20, PlayerType::Amateur),
            Err(ValidationError::BlankName)
        );
    }

    #[test]
    fn new_rejects_zero_age() {
        assert!(matches!(
            Player::new("Peter", 0, PlayerType::Amateur),
            Err(ValidationError::AgeOutOfRange { found: 0, .. })
        ));
    }

    #[test]
    fn type_from_input_accepts_local_spellings() {
        assert_eq!(PlayerType::from_input("AMATÉR"), Some(PlayerType::Amateur));
        assert_eq!(PlayerType::from_input(" profesional "), Some(PlayerType::Professional));
        assert_eq!(PlayerType::from_input("Professional"), Some(PlayerType::Professional));
        assert_eq!(PlayerType::from_input("coach"), None);
    }

    #[test]
    fn is_named_ignores_case() {
        let p = Player::new("Novak", 37, PlayerType::Professional).unwrap();
        assert!(p.is_named("NOVAK "));
        assert!(!p.is_named("Nova"));
    }
}
