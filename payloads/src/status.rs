//! Translation of API status codes into messages shown to students.

/// Human readable message for a status code returned by the teams API.
///
/// Total over every `u16`: anything without a dedicated message falls back
/// to a generic one. Failures with no response at all never reach this
/// table; see [`crate::ClientError`].
pub fn status_message(code: u16) -> &'static str {
    match code {
        400 => "Invalid body",
        401 => "Missing authentication",
        403 => "Unauthorized to access this resource or team is full",
        404 => "Team not found",
        409 => "Student already has a team",
        410 => "Team is not active",
        498 => "Token expired or invalid",
        500 => "Server error",
        _ => "Unexpected status code",
    }
}

/// Coarse classification of a failed team request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The request body was rejected (400, 409). Fix the input and retry.
    Validation,
    /// Credential missing or expired (401, 498). Log in again.
    Authentication,
    /// Access denied or team full (403).
    Authorization,
    /// Team absent or inactive (404, 410).
    NotFound,
    /// Transient server failure (500).
    Server,
    /// A status without a dedicated message.
    Unmapped,
    /// No response was received.
    Network,
    /// A successful response whose body could not be read.
    InvalidPayload,
    /// The request never left the client, e.g. a malformed address.
    InvalidRequest,
}

impl ErrorCategory {
    pub fn from_status(code: u16) -> Self {
        match code {
            400 | 409 => Self::Validation,
            401 | 498 => Self::Authentication,
            403 => Self::Authorization,
            404 | 410 => Self::NotFound,
            500 => Self::Server,
            _ => Self::Unmapped,
        }
    }

    /// Whether repeating the same request unchanged may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Server | Self::Network)
    }
}
