use async_trait::async_trait;
use uuid::Uuid;

use super::StoreError;
use crate::domain::member::Member;

/// Read-only view of the member directory
#[async_trait]
pub trait MemberDirectory: Send {
    /// Find a member by ID
    async fn find_member(&mut self, id: Uuid) -> Result<Option<Member>, StoreError>;
}
