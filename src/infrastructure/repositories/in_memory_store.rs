use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::member::Member;
use crate::domain::repositories::{
    MemberDirectory, MembershipRepository, StoreError, TeamRepository, TeamStore, UnitOfWork,
};
use crate::domain::team::{Membership, Team};

#[derive(Debug, Clone, Default)]
struct StoreState {
    members: HashMap<Uuid, Member>,
    teams: HashMap<Uuid, Team>,
    /// Keyed by (team_id, member_id)
    memberships: HashMap<(Uuid, Uuid), Membership>,
}

impl StoreState {
    fn team_version(&self, id: Uuid) -> Option<i64> {
        self.teams.get(&id).map(Team::version)
    }

    fn remove_team(&mut self, id: Uuid) {
        self.teams.remove(&id);
        self.memberships.retain(|(team_id, _), _| *team_id != id);
    }
}

#[derive(Debug, Clone)]
enum PendingWrite {
    SaveTeam(Team),
    DeleteTeam(Uuid),
    InsertMembership(Membership),
    DeleteMembership { team_id: Uuid, member_id: Uuid },
}

/// Process-local team store
///
/// Each unit of work runs against a private snapshot taken at `begin` and
/// keeps a log of its writes. On commit the team versions it observed are
/// compared with the shared state and the log is replayed only if none of
/// them moved, which gives the same optimistic serialization as the
/// Postgres store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a member in the directory
    pub fn add_member(&self, member: Member) -> Result<(), StoreError> {
        let mut state = self.write_state()?;
        state.members.insert(member.id, member);
        Ok(())
    }

    /// Number of memberships the committed state holds for a team
    pub fn membership_count(&self, team_id: Uuid) -> Result<usize, StoreError> {
        let state = self.read_state()?;
        Ok(state
            .memberships
            .keys()
            .filter(|(tid, _)| *tid == team_id)
            .count())
    }

    /// Whether the committed state links `member_id` to `team_id`
    pub fn has_membership(&self, member_id: Uuid, team_id: Uuid) -> Result<bool, StoreError> {
        let state = self.read_state()?;
        Ok(state.memberships.contains_key(&(team_id, member_id)))
    }

    /// Number of teams in the committed state
    pub fn team_count(&self) -> Result<usize, StoreError> {
        Ok(self.read_state()?.teams.len())
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, StoreState>, StoreError> {
        read_lock(&self.state)
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, StoreState>, StoreError> {
        write_lock(&self.state)
    }

    fn snapshot(&self) -> Result<StoreState, StoreError> {
        Ok(self.read_state()?.clone())
    }
}

fn read_lock(state: &RwLock<StoreState>) -> Result<RwLockReadGuard<'_, StoreState>, StoreError> {
    state
        .read()
        .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
}

fn write_lock(state: &RwLock<StoreState>) -> Result<RwLockWriteGuard<'_, StoreState>, StoreError> {
    state
        .write()
        .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
}

#[async_trait]
impl TeamStore for InMemoryStore {
    type Tx = InMemoryTransaction;

    async fn begin(&self) -> Result<InMemoryTransaction, StoreError> {
        Ok(InMemoryTransaction {
            shared: Arc::clone(&self.state),
            working: self.snapshot()?,
            observed_versions: HashMap::new(),
            writes: Vec::new(),
        })
    }

    async fn find_team(&self, id: Uuid) -> Result<Option<Team>, StoreError> {
        Ok(self.read_state()?.teams.get(&id).cloned())
    }

    async fn list_teams_for_member(&self, member_id: Uuid) -> Result<Vec<Team>, StoreError> {
        let state = self.read_state()?;
        let mut teams: Vec<Team> = state
            .memberships
            .keys()
            .filter(|(_, mid)| *mid == member_id)
            .filter_map(|(team_id, _)| state.teams.get(team_id).cloned())
            .collect();
        teams.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(teams)
    }

    async fn list_members_of_team(&self, team_id: Uuid) -> Result<Vec<Member>, StoreError> {
        let state = self.read_state()?;
        let mut memberships: Vec<&Membership> = state
            .memberships
            .values()
            .filter(|m| m.team_id() == team_id)
            .collect();
        memberships.sort_by_key(|m| m.joined_at());
        Ok(memberships
            .into_iter()
            .filter_map(|m| state.members.get(&m.member_id()).cloned())
            .collect())
    }
}

/// Unit of work over an `InMemoryStore`
pub struct InMemoryTransaction {
    shared: Arc<RwLock<StoreState>>,
    working: StoreState,
    /// Version of each touched team when this unit first saw it
    /// (`None` = the team did not exist yet)
    observed_versions: HashMap<Uuid, Option<i64>>,
    writes: Vec<PendingWrite>,
}

impl InMemoryTransaction {
    fn observe(&mut self, team_id: Uuid) {
        let version = self.working.team_version(team_id);
        self.observed_versions.entry(team_id).or_insert(version);
    }

    /// Validates the observed versions against `shared` and replays the log
    fn apply(&self) -> Result<(), StoreError> {
        let mut shared = write_lock(&self.shared)?;

        for (team_id, observed) in &self.observed_versions {
            let current = shared.team_version(*team_id);
            if current != *observed {
                return Err(StoreError::Conflict(format!(
                    "team {} changed (expected version {:?}, found {:?})",
                    team_id, observed, current
                )));
            }
        }

        let mut next = shared.clone();
        for write in &self.writes {
            match write {
                PendingWrite::SaveTeam(team) => {
                    next.teams.insert(team.id(), team.clone());
                }
                PendingWrite::DeleteTeam(id) => next.remove_team(*id),
                PendingWrite::InsertMembership(membership) => {
                    let key = (membership.team_id(), membership.member_id());
                    if next.memberships.contains_key(&key) {
                        return Err(StoreError::Conflict(format!(
                            "membership of {} in team {} already exists",
                            key.1, key.0
                        )));
                    }
                    next.memberships.insert(key, membership.clone());
                }
                PendingWrite::DeleteMembership { team_id, member_id } => {
                    if next.memberships.remove(&(*team_id, *member_id)).is_none() {
                        return Err(StoreError::Conflict(format!(
                            "membership of {} in team {} is already gone",
                            member_id, team_id
                        )));
                    }
                }
            }
        }

        *shared = next;
        Ok(())
    }
}

#[async_trait]
impl MemberDirectory for InMemoryTransaction {
    async fn find_member(&mut self, id: Uuid) -> Result<Option<Member>, StoreError> {
        Ok(self.working.members.get(&id).cloned())
    }
}

#[async_trait]
impl TeamRepository for InMemoryTransaction {
    async fn find_team(&mut self, id: Uuid) -> Result<Option<Team>, StoreError> {
        Ok(self.working.teams.get(&id).cloned())
    }

    async fn find_team_for_structural_update(
        &mut self,
        id: Uuid,
    ) -> Result<Option<Team>, StoreError> {
        self.observe(id);

        let Some(team) = self.working.teams.get_mut(&id) else {
            return Ok(None);
        };
        team.set_version(team.version() + 1);
        let bumped = team.clone();
        self.writes.push(PendingWrite::SaveTeam(bumped.clone()));

        Ok(Some(bumped))
    }

    async fn save_team(&mut self, team: &mut Team) -> Result<(), StoreError> {
        self.observe(team.id());

        match self.working.team_version(team.id()) {
            Some(current) if current != team.version() => {
                return Err(StoreError::Conflict(format!(
                    "stale write to team {} (version {}, stored {})",
                    team.id(),
                    team.version(),
                    current
                )));
            }
            Some(current) => team.set_version(current + 1),
            None => {}
        }

        self.working.teams.insert(team.id(), team.clone());
        self.writes.push(PendingWrite::SaveTeam(team.clone()));
        Ok(())
    }

    async fn delete_team(&mut self, id: Uuid) -> Result<(), StoreError> {
        self.observe(id);

        if !self.working.teams.contains_key(&id) {
            return Err(StoreError::Conflict(format!("team {} is already gone", id)));
        }
        self.working.remove_team(id);
        self.writes.push(PendingWrite::DeleteTeam(id));
        Ok(())
    }
}

#[async_trait]
impl MembershipRepository for InMemoryTransaction {
    async fn find_membership(
        &mut self,
        member_id: Uuid,
        team_id: Uuid,
    ) -> Result<Option<Membership>, StoreError> {
        Ok(self.working.memberships.get(&(team_id, member_id)).cloned())
    }

    async fn save_membership(&mut self, membership: &Membership) -> Result<(), StoreError> {
        let key = (membership.team_id(), membership.member_id());
        if self.working.memberships.contains_key(&key) {
            return Err(StoreError::Conflict(format!(
                "membership of {} in team {} already exists",
                key.1, key.0
            )));
        }

        self.working.memberships.insert(key, membership.clone());
        self.writes
            .push(PendingWrite::InsertMembership(membership.clone()));
        Ok(())
    }

    async fn delete_membership(&mut self, membership: &Membership) -> Result<(), StoreError> {
        let team_id = membership.team_id();
        let member_id = membership.member_id();
        if self.working.memberships.remove(&(team_id, member_id)).is_none() {
            return Err(StoreError::Conflict(format!(
                "membership of {} in team {} is already gone",
                member_id, team_id
            )));
        }

        self.writes
            .push(PendingWrite::DeleteMembership { team_id, member_id });
        Ok(())
    }

    async fn count_active_members(&mut self, team_id: Uuid) -> Result<u64, StoreError> {
        let count = self
            .working
            .memberships
            .keys()
            .filter(|(tid, _)| *tid == team_id)
            .count();
        Ok(count as u64)
    }
}

#[async_trait]
impl UnitOfWork for InMemoryTransaction {
    async fn commit(self) -> Result<(), StoreError> {
        self.apply()
    }
}
