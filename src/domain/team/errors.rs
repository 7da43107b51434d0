use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::repositories::StoreError;

/// Errors raised by the team lifecycle
///
/// Every variant except `ConflictRetry` and `Store` is a precondition failure
/// detected before anything is written.
#[derive(Debug, Error)]
pub enum TeamError {
    #[error("Member not found: {0}")]
    MemberNotFound(Uuid),

    #[error("Team not found: {0}")]
    TeamNotFound(Uuid),

    #[error("Project start date {start} must be before end date {end}")]
    InvalidDuration { start: NaiveDate, end: NaiveDate },

    #[error("Team name cannot be empty")]
    InvalidTeamName,

    #[error("Member {member_id} is not the leader of team {team_id}")]
    NotTeamLeader { member_id: Uuid, team_id: Uuid },

    #[error("New leader {member_id} is not a member of team {team_id}")]
    NotTeamMember { member_id: Uuid, team_id: Uuid },

    #[error("The leader of team {team_id} cannot be removed")]
    CannotRemoveLeader { team_id: Uuid },

    #[error("Member {member_id} has no membership in team {team_id}")]
    MembershipNotFound { member_id: Uuid, team_id: Uuid },

    #[error("The leader must delegate leadership of team {team_id} before leaving")]
    LeaderMustDelegateFirst { team_id: Uuid },

    #[error("Member {member_id} already belongs to team {team_id}")]
    AlreadyTeamMember { member_id: Uuid, team_id: Uuid },

    #[error("Team was modified concurrently, retry the operation")]
    ConflictRetry,

    #[error("Storage error: {0}")]
    Store(String),
}

impl TeamError {
    /// True for the only kind a caller may retry automatically
    pub fn is_retryable(&self) -> bool {
        matches!(self, TeamError::ConflictRetry)
    }
}

impl From<StoreError> for TeamError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => TeamError::ConflictRetry,
            other => TeamError::Store(other.to_string()),
        }
    }
}

pub type TeamResult<T> = Result<T, TeamError>;
