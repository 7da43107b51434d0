use super::errors::TeamError;
use super::events::TeamEvent;
use super::value_objects::{FeedbackType, ProjectDuration};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Team aggregate root
///
/// Represents a group of members collaborating within a project timeframe.
/// The aggregate only knows its leader by id; membership rows live in the
/// membership store and are checked by the lifecycle service.
///
/// # Invariants
/// - Name cannot be empty
/// - `leader_id` always references a member holding a membership in the team
/// - Duration start is strictly before its end (enforced by `ProjectDuration`)
/// - `version` grows on every structural read-for-update and every update
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use teamspace_api::domain::team::value_objects::{FeedbackType, ProjectDuration};
/// use teamspace_api::domain::team::Team;
/// use uuid::Uuid;
///
/// let duration = ProjectDuration::new(
///     NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 1, 10),
/// ).expect("valid duration");
///
/// let leader_id = Uuid::new_v4();
/// let (team, events) = Team::new(
///     "Feedback crew".to_string(),
///     leader_id,
///     duration,
///     FeedbackType::Anonymous,
/// ).expect("valid team");
///
/// assert_eq!(team.leader_id(), leader_id);
/// assert!(!events.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    id: Uuid,
    name: String,
    leader_id: Uuid,
    duration: ProjectDuration,
    feedback_type: FeedbackType,
    version: i64,
    created_at: DateTime<Utc>,
}

impl Team {
    /// Creates a new Team aggregate led by its founder
    ///
    /// # Returns
    /// * `Ok((Team, Vec<TeamEvent>))` - New team plus `Created` and the
    ///   founder's `MemberJoined` event
    /// * `Err(TeamError::InvalidTeamName)` - If the name is blank
    pub fn new(
        name: String,
        leader_id: Uuid,
        duration: ProjectDuration,
        feedback_type: FeedbackType,
    ) -> Result<(Self, Vec<TeamEvent>), TeamError> {
        let name = validate_name(name)?;

        let team = Self {
            id: Uuid::new_v4(),
            name,
            leader_id,
            duration,
            feedback_type,
            version: 0,
            created_at: Utc::now(),
        };

        let events = vec![
            TeamEvent::Created {
                team_id: team.id,
                name: team.name.clone(),
                leader_id,
            },
            TeamEvent::MemberJoined {
                team_id: team.id,
                member_id: leader_id,
            },
        ];

        Ok((team, events))
    }

    /// Overwrites the mutable team information
    ///
    /// Authority is not checked here; callers run `ensure_leader` first.
    pub fn update_info(
        &mut self,
        name: String,
        duration: ProjectDuration,
        feedback_type: FeedbackType,
    ) -> Result<TeamEvent, TeamError> {
        self.name = validate_name(name)?;
        self.duration = duration;
        self.feedback_type = feedback_type;

        Ok(TeamEvent::InfoUpdated { team_id: self.id })
    }

    /// Moves leadership to `new_leader_id`
    ///
    /// The caller must already have verified that the new leader holds a
    /// membership. Returns `None` when the member already leads the team.
    pub fn change_leader(&mut self, new_leader_id: Uuid) -> Option<TeamEvent> {
        if self.leader_id == new_leader_id {
            return None;
        }

        let previous_leader_id = self.leader_id;
        self.leader_id = new_leader_id;

        Some(TeamEvent::LeaderDelegated {
            team_id: self.id,
            previous_leader_id,
            new_leader_id,
        })
    }

    pub fn is_leader(&self, member_id: Uuid) -> bool {
        self.leader_id == member_id
    }

    /// Fails with `NotTeamLeader` unless `member_id` leads this team
    pub fn ensure_leader(&self, member_id: Uuid) -> Result<(), TeamError> {
        if self.is_leader(member_id) {
            Ok(())
        } else {
            Err(TeamError::NotTeamLeader {
                member_id,
                team_id: self.id,
            })
        }
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn leader_id(&self) -> Uuid {
        self.leader_id
    }

    pub fn duration(&self) -> ProjectDuration {
        self.duration
    }

    pub fn start_date(&self) -> NaiveDate {
        self.duration.start_date()
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.duration.end_date()
    }

    pub fn feedback_type(&self) -> FeedbackType {
        self.feedback_type
    }

    /// Returns the optimistic concurrency token
    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Records the version the store assigned on write
    pub(crate) fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    /// Reconstructs a Team from persistence layer data
    ///
    /// Bypasses validation since stored rows were validated on write.
    /// Only to be used by store implementations.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: Uuid,
        name: String,
        leader_id: Uuid,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        feedback_type: FeedbackType,
        version: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            leader_id,
            duration: ProjectDuration::from_persistence(start_date, end_date),
            feedback_type,
            version,
            created_at,
        }
    }
}

/// Rejects a blank team name
pub(crate) fn validate_name(name: String) -> Result<String, TeamError> {
    if name.trim().is_empty() {
        return Err(TeamError::InvalidTeamName);
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duration() -> ProjectDuration {
        ProjectDuration::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 10),
        )
        .unwrap()
    }

    fn new_team(leader_id: Uuid) -> Team {
        let (team, _) = Team::new(
            "haha".to_string(),
            leader_id,
            duration(),
            FeedbackType::Anonymous,
        )
        .unwrap();
        team
    }

    #[test]
    fn create_team_with_valid_name() {
        let leader_id = Uuid::new_v4();

        let (team, events) = Team::new(
            "Test team".to_string(),
            leader_id,
            duration(),
            FeedbackType::Identified,
        )
        .unwrap();

        assert_eq!(team.name(), "Test team");
        assert_eq!(team.leader_id(), leader_id);
        assert_eq!(team.feedback_type(), FeedbackType::Identified);
        assert_eq!(team.version(), 0);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn create_team_with_blank_name_fails() {
        let result = Team::new(
            "   ".to_string(),
            Uuid::new_v4(),
            duration(),
            FeedbackType::Anonymous,
        );

        assert!(matches!(result, Err(TeamError::InvalidTeamName)));
    }

    #[test]
    fn team_generates_created_and_joined_events() {
        let leader_id = Uuid::new_v4();
        let (team, events) = Team::new(
            "Test team".to_string(),
            leader_id,
            duration(),
            FeedbackType::Anonymous,
        )
        .unwrap();

        match &events[0] {
            TeamEvent::Created {
                team_id,
                name,
                leader_id: lid,
            } => {
                assert_eq!(*team_id, team.id());
                assert_eq!(name, "Test team");
                assert_eq!(*lid, leader_id);
            }
            _ => panic!("Expected Created event"),
        }
        assert_eq!(
            events[1],
            TeamEvent::MemberJoined {
                team_id: team.id(),
                member_id: leader_id
            }
        );
    }

    #[test]
    fn change_leader_to_other_member() {
        let leader_id = Uuid::new_v4();
        let new_leader_id = Uuid::new_v4();
        let mut team = new_team(leader_id);

        let event = team.change_leader(new_leader_id);

        assert_eq!(team.leader_id(), new_leader_id);
        assert!(team.is_leader(new_leader_id));
        assert!(!team.is_leader(leader_id));
        assert!(matches!(event, Some(TeamEvent::LeaderDelegated { .. })));
    }

    #[test]
    fn change_leader_to_self_is_noop() {
        let leader_id = Uuid::new_v4();
        let mut team = new_team(leader_id);
        let before = team.clone();

        assert!(team.change_leader(leader_id).is_none());
        assert_eq!(team, before);
    }

    #[test]
    fn ensure_leader_rejects_other_member() {
        let team = new_team(Uuid::new_v4());
        let other = Uuid::new_v4();

        let result = team.ensure_leader(other);

        assert!(matches!(
            result,
            Err(TeamError::NotTeamLeader { member_id, .. }) if member_id == other
        ));
    }

    #[test]
    fn update_info_overwrites_fields() {
        let mut team = new_team(Uuid::new_v4());
        let new_duration = ProjectDuration::new(
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            None,
        )
        .unwrap();

        let event = team
            .update_info("hoho".to_string(), new_duration, FeedbackType::Identified)
            .unwrap();

        assert_eq!(event, TeamEvent::InfoUpdated { team_id: team.id() });
        assert_eq!(team.name(), "hoho");
        assert_eq!(team.duration(), new_duration);
        assert_eq!(team.feedback_type(), FeedbackType::Identified);
    }

    #[test]
    fn update_info_with_blank_name_leaves_team_untouched() {
        let mut team = new_team(Uuid::new_v4());
        let before = team.clone();

        let result = team.update_info(String::new(), duration(), FeedbackType::Identified);

        assert!(result.is_err());
        assert_eq!(team, before);
    }

    #[test]
    fn from_persistence_round_trips_fields() {
        let id = Uuid::new_v4();
        let leader_id = Uuid::new_v4();
        let created_at = Utc::now();
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let team = Team::from_persistence(
            id,
            "stored".to_string(),
            leader_id,
            start,
            None,
            FeedbackType::Anonymous,
            7,
            created_at,
        );

        assert_eq!(team.id(), id);
        assert_eq!(team.version(), 7);
        assert_eq!(team.start_date(), start);
        assert!(team.end_date().is_none());
    }
}
