use serde::{Deserialize, Serialize};

pub const TEAM_CODE_MAX_LEN: usize = 32;

/// Body for `POST /teams`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinTeam {
    pub code: String,
    pub task_order: u32,
}

/// Validation result for team invitation codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamCodeValidation {
    Valid,
    Empty,
    TooLong,
    InvalidCharacters,
}

impl TeamCodeValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            Self::Valid => None,
            Self::Empty => Some("Team code is required"),
            Self::TooLong => Some("Team code must be at most 32 characters"),
            Self::InvalidCharacters => {
                Some("Team code can only contain letters and numbers")
            }
        }
    }
}

/// Validate a team code.
///
/// Rules:
/// - 1-32 characters
/// - ASCII letters and numbers only
pub fn validate_team_code(code: &str) -> TeamCodeValidation {
    if code.is_empty() {
        return TeamCodeValidation::Empty;
    }
    if code.len() > TEAM_CODE_MAX_LEN {
        return TeamCodeValidation::TooLong;
    }
    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return TeamCodeValidation::InvalidCharacters;
    }
    TeamCodeValidation::Valid
}
