use async_trait::async_trait;
use uuid::Uuid;

use super::StoreError;
use crate::domain::team::Membership;

/// Repository trait for team memberships
#[async_trait]
pub trait MembershipRepository: Send {
    /// Find the membership linking a member to a team
    async fn find_membership(
        &mut self,
        member_id: Uuid,
        team_id: Uuid,
    ) -> Result<Option<Membership>, StoreError>;

    /// Insert a membership; a duplicate (team, member) pair is a conflict
    async fn save_membership(&mut self, membership: &Membership) -> Result<(), StoreError>;

    /// Delete a membership; deleting one that is already gone is a conflict
    async fn delete_membership(&mut self, membership: &Membership) -> Result<(), StoreError>;

    /// Count the memberships of a team
    async fn count_active_members(&mut self, team_id: Uuid) -> Result<u64, StoreError>;
}
