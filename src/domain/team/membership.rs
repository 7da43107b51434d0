use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Active link between a team and one of its members
///
/// Identified by the (team_id, member_id) pair; there is never more than one
/// membership for the same pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    team_id: Uuid,
    member_id: Uuid,
    joined_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(team_id: Uuid, member_id: Uuid) -> Self {
        Self {
            team_id,
            member_id,
            joined_at: Utc::now(),
        }
    }

    pub fn team_id(&self) -> Uuid {
        self.team_id
    }

    pub fn member_id(&self) -> Uuid {
        self.member_id
    }

    pub fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }

    /// Reconstructs a Membership from stored data
    pub fn from_persistence(team_id: Uuid, member_id: Uuid, joined_at: DateTime<Utc>) -> Self {
        Self {
            team_id,
            member_id,
            joined_at,
        }
    }
}
