use crate::{Power, StudentId, TeamId};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A member of a team, as listed in the team roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub student_id: StudentId,
    pub username: String,
    pub power: Power,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    /// Invitation code students enter to join.
    pub code: String,
    pub name: String,
    /// Task the team is currently working through.
    pub task_order: u32,
    /// Inactive teams can't be joined.
    pub active: bool,
    pub members: Vec<TeamMember>,
    pub created_at: Timestamp,
}

/// Team information with the power held by the requesting student.
///
/// This is the payload returned by every `/teams` endpoint, so the frontend
/// can show the student's own role without scanning the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamWithPower {
    #[serde(flatten)]
    pub team: Team,
    pub my_power: Power,
}

impl std::ops::Deref for TeamWithPower {
    type Target = Team;

    fn deref(&self) -> &Self::Target {
        &self.team
    }
}
