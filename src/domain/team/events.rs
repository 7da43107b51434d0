use async_trait::async_trait;
use uuid::Uuid;

/// Domain events that occur within the Team aggregate
///
/// Events are published only after the unit of work that produced them has
/// committed. Collaborators that own data keyed by membership (schedules,
/// pending feedback requests) hook into `MemberRemoved`, `MemberLeft` and
/// `Dissolved` to clean up after a member or a whole team disappears.
///
/// # Example
/// ```
/// use teamspace_api::domain::team::events::TeamEvent;
/// use uuid::Uuid;
///
/// let team_id = Uuid::new_v4();
/// let event = TeamEvent::Dissolved { team_id };
///
/// assert_eq!(event.team_id(), team_id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamEvent {
    /// Fired when a team is created
    Created {
        team_id: Uuid,
        name: String,
        leader_id: Uuid,
    },
    /// Fired when name, duration or feedback type change
    InfoUpdated { team_id: Uuid },
    /// Fired when leadership moves to another member
    LeaderDelegated {
        team_id: Uuid,
        previous_leader_id: Uuid,
        new_leader_id: Uuid,
    },
    /// Fired when a member is enrolled, including the founding leader
    MemberJoined { team_id: Uuid, member_id: Uuid },
    /// Fired when the leader removes a member
    MemberRemoved {
        team_id: Uuid,
        member_id: Uuid,
        removed_by: Uuid,
    },
    /// Fired when a member leaves on their own
    MemberLeft { team_id: Uuid, member_id: Uuid },
    /// Fired when the last member left and the team no longer exists
    Dissolved { team_id: Uuid },
}

impl TeamEvent {
    /// Returns the team_id for this event
    pub fn team_id(&self) -> Uuid {
        match self {
            TeamEvent::Created { team_id, .. } => *team_id,
            TeamEvent::InfoUpdated { team_id } => *team_id,
            TeamEvent::LeaderDelegated { team_id, .. } => *team_id,
            TeamEvent::MemberJoined { team_id, .. } => *team_id,
            TeamEvent::MemberRemoved { team_id, .. } => *team_id,
            TeamEvent::MemberLeft { team_id, .. } => *team_id,
            TeamEvent::Dissolved { team_id } => *team_id,
        }
    }

    /// Short machine-readable name, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            TeamEvent::Created { .. } => "team_created",
            TeamEvent::InfoUpdated { .. } => "team_info_updated",
            TeamEvent::LeaderDelegated { .. } => "leader_delegated",
            TeamEvent::MemberJoined { .. } => "member_joined",
            TeamEvent::MemberRemoved { .. } => "member_removed",
            TeamEvent::MemberLeft { .. } => "member_left",
            TeamEvent::Dissolved { .. } => "team_dissolved",
        }
    }
}

/// Hook for collaborators reacting to committed team changes
#[async_trait]
pub trait TeamEventListener: Send + Sync {
    async fn on_event(&self, event: &TeamEvent);
}
