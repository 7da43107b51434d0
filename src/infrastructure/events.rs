use async_trait::async_trait;

use crate::domain::team::{TeamEvent, TeamEventListener};

/// Writes every committed team event to the tracing subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventListener;

#[async_trait]
impl TeamEventListener for TracingEventListener {
    async fn on_event(&self, event: &TeamEvent) {
        match event {
            TeamEvent::MemberRemoved {
                member_id,
                removed_by,
                ..
            } => tracing::info!(
                event = event.kind(),
                team_id = %event.team_id(),
                member_id = %member_id,
                removed_by = %removed_by,
                "team event"
            ),
            TeamEvent::MemberLeft { member_id, .. } | TeamEvent::MemberJoined { member_id, .. } => {
                tracing::info!(
                    event = event.kind(),
                    team_id = %event.team_id(),
                    member_id = %member_id,
                    "team event"
                )
            }
            TeamEvent::LeaderDelegated {
                previous_leader_id,
                new_leader_id,
                ..
            } => tracing::info!(
                event = event.kind(),
                team_id = %event.team_id(),
                previous_leader_id = %previous_leader_id,
                new_leader_id = %new_leader_id,
                "team event"
            ),
            _ => tracing::info!(event = event.kind(), team_id = %event.team_id(), "team event"),
        }
    }
}
