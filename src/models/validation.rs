//! Record validation errors and the case-insensitive name key.

/// Errors raised when a player or match record is malformed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValidationError {
    /// A required name was empty or whitespace only.
    BlankName,
    /// Name longer than the allowed maximum.
    NameTooLong { max: usize },
    /// Age outside the accepted range.
    AgeOutOfRange { min: u32, max: u32, found: u32 },
    /// Player type text did not match any known type.
    UnknownPlayerType(String),
    /// Both sides of a match name the same player.
    SamePlayer,
    /// Date was not in `YYYY-MM-DD` form.
    InvalidDate(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::BlankName => write!(f, "Player name must not be blank"),
            ValidationError::NameTooLong { max } => {
                write!(f, "Player name may have at most {} characters", max)
            }
            ValidationError::AgeOutOfRange { min, max, found } => {
                write!(f, "Age must be between {} and {} (got {})", min, max, found)
            }
            ValidationError::UnknownPlayerType(t) => {
                write!(f, "Unknown player type '{}' (expected AMATEUR or PROFESSIONAL)", t)
            }
            ValidationError::SamePlayer => write!(f, "Player A and player B must be different"),
            ValidationError::InvalidDate(d) => {
                write!(f, "Invalid date '{}' (expected YYYY-MM-DD)", d)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Identity key for a player name: trimmed and lower-cased.
///
/// Two names denote the same player iff their keys are equal.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(input: &str) -> Result<chrono::NaiveDate, ValidationError> {
    let trimmed = input.trim();
    chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(trimmed.to_string()))
}
