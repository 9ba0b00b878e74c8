//! In-memory store for teams, students and their access tokens.
//!
//! Every operation takes the lock once, so each request observes and
//! mutates a consistent snapshot. A student belongs to at most one team,
//! and each member of a team holds a distinct [`Power`].

use jiff::Timestamp;
use payloads::{
    Power, StudentId, TeamId, requests,
    responses::{Team, TeamMember, TeamWithPower},
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct TeamStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    teams: HashMap<TeamId, Team>,
    students: HashMap<StudentId, String>,
    sessions: HashMap<String, Session>,
}

struct Session {
    student_id: StudentId,
    expired: bool,
}

/// Details for creating a team. Teams are provisioned by staff, not through
/// the student-facing API.
#[derive(Debug, Clone)]
pub struct NewTeam {
    pub name: String,
    pub code: String,
    pub task_order: u32,
    pub active: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Unknown access token")]
    InvalidToken,
    #[error("Access token expired")]
    TokenExpired,
    #[error("Invalid team code: {0}")]
    InvalidCode(&'static str),
    #[error("Team code already in use")]
    DuplicateCode,
    #[error("Team is working on task {team}, not task {requested}")]
    TaskOrderMismatch { team: u32, requested: u32 },
    #[error("Student not found")]
    StudentNotFound,
    #[error("Team not found")]
    TeamNotFound,
    #[error("Team is not active")]
    TeamInactive,
    #[error("Team is full")]
    TeamFull,
    #[error("Student already has a team")]
    AlreadyInTeam,
    #[error("Student is not in a team")]
    NotInTeam,
}

impl TeamStore {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        // nothing panics while holding the lock, but don't wedge the server
        // if that ever changes
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create_team(&self, details: NewTeam) -> Result<Team, StoreError> {
        let validation = requests::validate_team_code(&details.code);
        if let Some(message) = validation.error_message() {
            return Err(StoreError::InvalidCode(message));
        }

        let mut inner = self.lock();
        if inner.team_by_code(&details.code).is_some() {
            return Err(StoreError::DuplicateCode);
        }
        let team = Team {
            id: TeamId(Uuid::new_v4()),
            code: details.code,
            name: details.name,
            task_order: details.task_order,
            active: details.active,
            members: Vec::new(),
            created_at: Timestamp::now(),
        };
        inner.teams.insert(team.id, team.clone());
        tracing::debug!(team_id = %team.id, code = %team.code, "created team");
        Ok(team)
    }

    pub fn set_team_active(
        &self,
        team_id: &TeamId,
        active: bool,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let team = inner
            .teams
            .get_mut(team_id)
            .ok_or(StoreError::TeamNotFound)?;
        team.active = active;
        Ok(())
    }

    pub fn get_team(&self, team_id: &TeamId) -> Result<Team, StoreError> {
        self.lock()
            .teams
            .get(team_id)
            .cloned()
            .ok_or(StoreError::TeamNotFound)
    }

    pub fn create_student(&self, username: &str) -> StudentId {
        let student_id = StudentId(Uuid::new_v4());
        self.lock()
            .students
            .insert(student_id, username.to_string());
        student_id
    }

    /// Issue a fresh access token for a student.
    pub fn issue_token(
        &self,
        student_id: &StudentId,
    ) -> Result<String, StoreError> {
        let mut inner = self.lock();
        if !inner.students.contains_key(student_id) {
            return Err(StoreError::StudentNotFound);
        }
        let token = Uuid::new_v4().simple().to_string();
        inner.sessions.insert(
            token.clone(),
            Session {
                student_id: *student_id,
                expired: false,
            },
        );
        Ok(token)
    }

    pub fn expire_token(&self, token: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let session = inner
            .sessions
            .get_mut(token)
            .ok_or(StoreError::InvalidToken)?;
        session.expired = true;
        Ok(())
    }

    /// Resolve a bearer token to the student it was issued for.
    pub fn authenticate(&self, token: &str) -> Result<StudentId, StoreError> {
        let inner = self.lock();
        match inner.sessions.get(token) {
            None => Err(StoreError::InvalidToken),
            Some(session) if session.expired => Err(StoreError::TokenExpired),
            Some(session) => Ok(session.student_id),
        }
    }

    pub fn join_team(
        &self,
        student_id: &StudentId,
        details: &requests::JoinTeam,
    ) -> Result<TeamWithPower, StoreError> {
        let validation = requests::validate_team_code(&details.code);
        if let Some(message) = validation.error_message() {
            return Err(StoreError::InvalidCode(message));
        }

        let mut inner = self.lock();
        let username = inner
            .students
            .get(student_id)
            .cloned()
            .ok_or(StoreError::StudentNotFound)?;
        if inner.team_of(student_id).is_some() {
            return Err(StoreError::AlreadyInTeam);
        }
        let team_id = inner
            .team_by_code(&details.code)
            .ok_or(StoreError::TeamNotFound)?;
        let team = inner
            .teams
            .get_mut(&team_id)
            .ok_or(StoreError::TeamNotFound)?;

        if !team.active {
            return Err(StoreError::TeamInactive);
        }
        if team.task_order != details.task_order {
            return Err(StoreError::TaskOrderMismatch {
                team: team.task_order,
                requested: details.task_order,
            });
        }
        let power = Power::ALL
            .into_iter()
            .find(|power| team.members.iter().all(|m| m.power != *power))
            .ok_or(StoreError::TeamFull)?;

        team.members.push(TeamMember {
            student_id: *student_id,
            username,
            power,
        });
        Ok(TeamWithPower {
            team: team.clone(),
            my_power: power,
        })
    }

    /// Remove the student from their team. Returns the team as it is after
    /// they left, along with the power they held.
    pub fn leave_team(
        &self,
        student_id: &StudentId,
    ) -> Result<TeamWithPower, StoreError> {
        let mut inner = self.lock();
        let team_id = inner.team_of(student_id).ok_or(StoreError::NotInTeam)?;
        let team = inner
            .teams
            .get_mut(&team_id)
            .ok_or(StoreError::TeamNotFound)?;
        let position = team
            .members
            .iter()
            .position(|m| m.student_id == *student_id)
            .ok_or(StoreError::NotInTeam)?;
        let member = team.members.remove(position);
        Ok(TeamWithPower {
            team: team.clone(),
            my_power: member.power,
        })
    }

    pub fn current_team(
        &self,
        student_id: &StudentId,
    ) -> Result<TeamWithPower, StoreError> {
        let inner = self.lock();
        let team_id = inner.team_of(student_id).ok_or(StoreError::NotInTeam)?;
        let team = inner.teams.get(&team_id).ok_or(StoreError::TeamNotFound)?;
        let my_power = team
            .members
            .iter()
            .find(|m| m.student_id == *student_id)
            .map(|m| m.power)
            .ok_or(StoreError::NotInTeam)?;
        Ok(TeamWithPower {
            team: team.clone(),
            my_power,
        })
    }
}

impl Inner {
    fn team_by_code(&self, code: &str) -> Option<TeamId> {
        self.teams
            .values()
            .find(|team| team.code == code)
            .map(|team| team.id)
    }

    fn team_of(&self, student_id: &StudentId) -> Option<TeamId> {
        self.teams
            .values()
            .find(|team| team.members.iter().any(|m| m.student_id == *student_id))
            .map(|team| team.id)
    }
}
