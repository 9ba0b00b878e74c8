pub mod api_client;
pub mod requests;
pub mod responses;
pub mod status;

pub use api_client::{APIClient, ClientError, ErrorKind, REQUEST_TIMEOUT};
pub use status::{ErrorCategory, status_message};

use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
pub struct TeamId(pub Uuid);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
pub struct StudentId(pub Uuid);

/// Ability assigned to a member when they join a team.
///
/// Each power is held by at most one member of a team, so a team is full
/// once every power has been handed out.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Power {
    #[display("memoryPro")]
    MemoryPro,
    #[display("superRadar")]
    SuperRadar,
    #[display("superHearing")]
    SuperHearing,
}

impl Power {
    pub const ALL: [Power; 3] =
        [Power::MemoryPro, Power::SuperRadar, Power::SuperHearing];

    /// Maximum number of members a team can hold.
    pub const fn team_capacity() -> usize {
        Self::ALL.len()
    }
}
