use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::member::Member;
use crate::domain::repositories::{
    MemberDirectory, MembershipRepository, TeamRepository, TeamStore, UnitOfWork,
};
use crate::domain::team::{
    FeedbackType, Membership, ProjectDuration, Team, TeamError, TeamEvent, TeamEventListener,
    TeamResult,
};
use crate::domain::team::team::validate_name;

/// Mutable team information supplied on creation and on update
#[derive(Debug, Clone)]
pub struct TeamDetails {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub feedback_type: FeedbackType,
}

/// Team lifecycle engine
///
/// Owns the invariants over a team and its membership set:
/// - every team has exactly one leader, and the leader holds a membership
/// - leadership only moves to an existing member
/// - the leader cannot be removed, and cannot leave while others remain
/// - a team is dissolved exactly when its last member leaves
///
/// Every mutation runs in a single unit of work. Operations that check the
/// leader, a membership or the member count and then write load the team
/// through the structural read, so two of them racing on the same team
/// cannot both commit; the loser gets `TeamError::ConflictRetry`.
///
/// Nothing is cached between calls; each operation reloads fresh state.
pub struct TeamService<S: TeamStore> {
    store: S,
    listeners: Vec<Arc<dyn TeamEventListener>>,
}

impl<S: TeamStore> TeamService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            listeners: Vec::new(),
        }
    }

    /// Registers a hook called with the events of every committed operation
    pub fn with_listener(mut self, listener: Arc<dyn TeamEventListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a team led by `leader_id` and enrolls the leader
    ///
    /// # Errors
    /// * `InvalidDuration` - start date is not before the end date
    /// * `InvalidTeamName` - blank name, checked before the member lookup
    /// * `MemberNotFound` - the requesting member does not exist
    pub async fn create_team(&self, leader_id: Uuid, details: TeamDetails) -> TeamResult<Team> {
        let duration = ProjectDuration::new(details.start_date, details.end_date)?;
        let name = validate_name(details.name)?;

        let mut tx = self.store.begin().await?;
        tx.find_member(leader_id)
            .await?
            .ok_or(TeamError::MemberNotFound(leader_id))?;

        let (mut team, events) = Team::new(name, leader_id, duration, details.feedback_type)?;
        tx.save_team(&mut team).await?;
        tx.save_membership(&Membership::new(team.id(), leader_id)).await?;
        tx.commit().await?;

        tracing::info!(team_id = %team.id(), leader_id = %leader_id, "team created");
        self.publish(&events).await;
        Ok(team)
    }

    /// Looks a team up by ID
    pub async fn get_team(&self, team_id: Uuid) -> TeamResult<Team> {
        self.store
            .find_team(team_id)
            .await?
            .ok_or(TeamError::TeamNotFound(team_id))
    }

    /// Lists the teams a member belongs to, newest first
    pub async fn get_my_teams(&self, member_id: Uuid) -> TeamResult<Vec<Team>> {
        Ok(self.store.list_teams_for_member(member_id).await?)
    }

    /// Lists the members of an existing team
    pub async fn get_team_members(&self, team_id: Uuid) -> TeamResult<Vec<Member>> {
        self.get_team(team_id).await?;
        Ok(self.store.list_members_of_team(team_id).await?)
    }

    /// Overwrites name, duration and feedback type of a team
    ///
    /// Not a structural mutation: the team is read normally and the versioned
    /// save rejects a write racing with another change to the same team.
    ///
    /// # Errors
    /// * `InvalidDuration` - checked before the team is loaded
    /// * `InvalidTeamName` - also checked before the team is loaded
    /// * `TeamNotFound`
    /// * `NotTeamLeader` - `member_id` does not lead the team
    pub async fn update_team_info(
        &self,
        member_id: Uuid,
        team_id: Uuid,
        details: TeamDetails,
    ) -> TeamResult<Team> {
        let duration = ProjectDuration::new(details.start_date, details.end_date)?;
        let name = validate_name(details.name)?;

        let mut tx = self.store.begin().await?;
        let mut team = tx
            .find_team(team_id)
            .await?
            .ok_or(TeamError::TeamNotFound(team_id))?;
        team.ensure_leader(member_id)?;

        let event = team.update_info(name, duration, details.feedback_type)?;
        tx.save_team(&mut team).await?;
        tx.commit().await?;

        tracing::info!(team_id = %team_id, version = team.version(), "team info updated");
        self.publish(&[event]).await;
        Ok(team)
    }

    /// Hands leadership to another member of the team
    ///
    /// The former leader stays on as an ordinary member. Delegating to the
    /// current leader succeeds without changing anything.
    ///
    /// # Errors
    /// * `TeamNotFound`
    /// * `NotTeamLeader` - `current_leader_id` does not lead the team
    /// * `NotTeamMember` - the new leader holds no membership
    pub async fn delegate_team_leader(
        &self,
        current_leader_id: Uuid,
        team_id: Uuid,
        new_leader_id: Uuid,
    ) -> TeamResult<()> {
        let mut tx = self.store.begin().await?;
        let mut team = tx
            .find_team_for_structural_update(team_id)
            .await?
            .ok_or(TeamError::TeamNotFound(team_id))?;
        team.ensure_leader(current_leader_id)?;

        tx.find_membership(new_leader_id, team_id)
            .await?
            .ok_or(TeamError::NotTeamMember {
                member_id: new_leader_id,
                team_id,
            })?;

        let event = team.change_leader(new_leader_id);
        if event.is_some() {
            tx.save_team(&mut team).await?;
        }
        tx.commit().await?;

        match event {
            Some(event) => {
                tracing::info!(
                    team_id = %team_id,
                    from = %current_leader_id,
                    to = %new_leader_id,
                    "team leader delegated"
                );
                self.publish(&[event]).await;
            }
            None => tracing::debug!(team_id = %team_id, "leader delegated to self, nothing to do"),
        }
        Ok(())
    }

    /// Removes a member from the team on the leader's request
    ///
    /// The leader check runs before anything about the target is looked at.
    /// Removal never dissolves the team since the leader always remains.
    ///
    /// # Errors
    /// * `TeamNotFound`
    /// * `NotTeamLeader` - `member_id` does not lead the team
    /// * `CannotRemoveLeader` - the target is the leader
    /// * `MembershipNotFound` - the target is not in the team
    pub async fn remove_team_member(
        &self,
        member_id: Uuid,
        team_id: Uuid,
        member_id_to_remove: Uuid,
    ) -> TeamResult<()> {
        let mut tx = self.store.begin().await?;
        let team = tx
            .find_team_for_structural_update(team_id)
            .await?
            .ok_or(TeamError::TeamNotFound(team_id))?;
        team.ensure_leader(member_id)?;

        if team.is_leader(member_id_to_remove) {
            return Err(TeamError::CannotRemoveLeader { team_id });
        }

        let membership = tx
            .find_membership(member_id_to_remove, team_id)
            .await?
            .ok_or(TeamError::MembershipNotFound {
                member_id: member_id_to_remove,
                team_id,
            })?;
        tx.delete_membership(&membership).await?;
        tx.commit().await?;

        tracing::info!(team_id = %team_id, member_id = %member_id_to_remove, "team member removed");
        self.publish(&[TeamEvent::MemberRemoved {
            team_id,
            member_id: member_id_to_remove,
            removed_by: member_id,
        }])
        .await;
        Ok(())
    }

    /// Lets a member leave a team
    ///
    /// The member count is read inside the same unit of work as the delete.
    /// When the leaving member was the last one, the team is deleted as part
    /// of the same commit.
    ///
    /// # Errors
    /// * `TeamNotFound`
    /// * `MembershipNotFound` - the member is not in the team
    /// * `LeaderMustDelegateFirst` - the leader tried to leave while other
    ///   members remain
    pub async fn leave_team(&self, member_id: Uuid, team_id: Uuid) -> TeamResult<()> {
        let mut tx = self.store.begin().await?;
        let team = tx
            .find_team_for_structural_update(team_id)
            .await?
            .ok_or(TeamError::TeamNotFound(team_id))?;

        let membership = tx
            .find_membership(member_id, team_id)
            .await?
            .ok_or(TeamError::MembershipNotFound { member_id, team_id })?;

        let member_count = tx.count_active_members(team_id).await?;
        if team.is_leader(member_id) && member_count > 1 {
            return Err(TeamError::LeaderMustDelegateFirst { team_id });
        }

        tx.delete_membership(&membership).await?;
        let mut events = vec![TeamEvent::MemberLeft { team_id, member_id }];
        if member_count == 1 {
            tx.delete_team(team_id).await?;
            events.push(TeamEvent::Dissolved { team_id });
        }
        tx.commit().await?;

        if member_count == 1 {
            tracing::info!(
                team_id = %team_id,
                member_id = %member_id,
                "last member left, team dissolved"
            );
        } else {
            tracing::info!(team_id = %team_id, member_id = %member_id, "member left team");
        }
        self.publish(&events).await;
        Ok(())
    }

    /// Enrolls a member into an existing team
    ///
    /// # Errors
    /// * `TeamNotFound`
    /// * `MemberNotFound`
    /// * `AlreadyTeamMember`
    pub async fn join_team(&self, member_id: Uuid, team_id: Uuid) -> TeamResult<Membership> {
        let mut tx = self.store.begin().await?;
        tx.find_team_for_structural_update(team_id)
            .await?
            .ok_or(TeamError::TeamNotFound(team_id))?;
        tx.find_member(member_id)
            .await?
            .ok_or(TeamError::MemberNotFound(member_id))?;

        if tx.find_membership(member_id, team_id).await?.is_some() {
            return Err(TeamError::AlreadyTeamMember { member_id, team_id });
        }

        let membership = Membership::new(team_id, member_id);
        tx.save_membership(&membership).await?;
        tx.commit().await?;

        tracing::info!(team_id = %team_id, member_id = %member_id, "member joined team");
        self.publish(&[TeamEvent::MemberJoined { team_id, member_id }]).await;
        Ok(membership)
    }

    async fn publish(&self, events: &[TeamEvent]) {
        for event in events {
            for listener in &self.listeners {
                listener.on_event(event).await;
            }
        }
    }
}
