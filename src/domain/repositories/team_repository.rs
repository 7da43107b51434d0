use async_trait::async_trait;
use uuid::Uuid;

use super::StoreError;
use crate::domain::team::Team;

/// Repository trait for the Team aggregate
///
/// Methods run inside the unit of work that implements them, so every read
/// sees the unit's own earlier writes.
#[async_trait]
pub trait TeamRepository: Send {
    /// Find a team by its ID without taking part in version serialization
    async fn find_team(&mut self, id: Uuid) -> Result<Option<Team>, StoreError>;

    /// Find a team and force a version bump on it
    ///
    /// The bump happens whether or not the caller writes the team afterwards.
    /// Two units of work that both read the same team this way cannot both
    /// commit; the second one fails with `StoreError::Conflict`.
    async fn find_team_for_structural_update(
        &mut self,
        id: Uuid,
    ) -> Result<Option<Team>, StoreError>;

    /// Save a team (insert or versioned update)
    ///
    /// Updates only succeed against the version the team was loaded with; the
    /// new version is written back into `team`.
    async fn save_team(&mut self, team: &mut Team) -> Result<(), StoreError>;

    /// Delete a team and every membership still attached to it
    async fn delete_team(&mut self, id: Uuid) -> Result<(), StoreError>;
}
