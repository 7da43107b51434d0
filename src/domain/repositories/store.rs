use async_trait::async_trait;
use uuid::Uuid;

use super::{MemberDirectory, MembershipRepository, StoreError, TeamRepository};
use crate::domain::member::Member;
use crate::domain::team::Team;

/// One all-or-nothing transaction over teams, memberships and members
///
/// Dropping a unit of work without calling `commit` discards every write it
/// made.
#[async_trait]
pub trait UnitOfWork: MemberDirectory + TeamRepository + MembershipRepository + Sized {
    async fn commit(self) -> Result<(), StoreError>;
}

/// Entry point to a team store
///
/// Mutations go through `begin`; the remaining methods are the lock-free read
/// path.
#[async_trait]
pub trait TeamStore: Send + Sync + 'static {
    type Tx: UnitOfWork;

    /// Start a unit of work
    async fn begin(&self) -> Result<Self::Tx, StoreError>;

    /// Find a team by ID outside of any unit of work
    async fn find_team(&self, id: Uuid) -> Result<Option<Team>, StoreError>;

    /// Find every team a member belongs to, newest first
    async fn list_teams_for_member(&self, member_id: Uuid) -> Result<Vec<Team>, StoreError>;

    /// Find every member of a team, ordered by join time
    async fn list_members_of_team(&self, team_id: Uuid) -> Result<Vec<Member>, StoreError>;
}
