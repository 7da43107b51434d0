use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::JwtAuth;
use crate::api::AppState;
use crate::domain::member::Member;
use crate::domain::repositories::TeamStore;
use crate::domain::team::{FeedbackType, Membership, Team};
use crate::services::{retry_on_conflict, TeamDetails};

/// Request body for creating or updating a team
#[derive(Debug, Clone, Deserialize)]
pub struct TeamRequest {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub feedback_type: FeedbackType,
}

impl From<TeamRequest> for TeamDetails {
    fn from(req: TeamRequest) -> Self {
        Self {
            name: req.name,
            start_date: req.start_date,
            end_date: req.end_date,
            feedback_type: req.feedback_type,
        }
    }
}

/// Request body for handing over leadership
#[derive(Debug, Deserialize)]
pub struct DelegateLeaderRequest {
    pub new_leader_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub id: Uuid,
    pub name: String,
    pub leader_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub feedback_type: FeedbackType,
    pub version: i64,
}

impl From<&Team> for TeamResponse {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id(),
            name: team.name().to_string(),
            leader_id: team.leader_id(),
            start_date: team.start_date(),
            end_date: team.end_date(),
            feedback_type: team.feedback_type(),
            version: team.version(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&Member> for MemberResponse {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            name: member.name.clone(),
            email: member.email.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub team_id: Uuid,
    pub member_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

impl From<&Membership> for MembershipResponse {
    fn from(membership: &Membership) -> Self {
        Self {
            team_id: membership.team_id(),
            member_id: membership.member_id(),
            joined_at: membership.joined_at(),
        }
    }
}

/// Create a new team led by the caller
///
/// POST /api/teams
pub async fn create_team<S: TeamStore>(
    State(state): State<AppState<S>>,
    JwtAuth(member_id): JwtAuth,
    Json(req): Json<TeamRequest>,
) -> Result<(StatusCode, Json<TeamResponse>), ApiError> {
    let details = TeamDetails::from(req);
    let service = &state.service;

    let team = retry_on_conflict(state.conflict_retry_attempts, || {
        service.create_team(member_id, details.clone())
    })
    .await?;

    Ok((StatusCode::CREATED, Json(TeamResponse::from(&team))))
}

/// Get the teams the caller belongs to
///
/// GET /api/teams
pub async fn list_my_teams<S: TeamStore>(
    State(state): State<AppState<S>>,
    JwtAuth(member_id): JwtAuth,
) -> Result<Json<Vec<TeamResponse>>, ApiError> {
    let teams = state.service.get_my_teams(member_id).await?;

    Ok(Json(teams.iter().map(TeamResponse::from).collect()))
}

/// Get a team by ID
///
/// GET /api/teams/:id
pub async fn get_team<S: TeamStore>(
    State(state): State<AppState<S>>,
    JwtAuth(_): JwtAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamResponse>, ApiError> {
    let team = state.service.get_team(id).await?;

    Ok(Json(TeamResponse::from(&team)))
}

/// Update name, dates and feedback type (leader only)
///
/// PUT /api/teams/:id
pub async fn update_team<S: TeamStore>(
    State(state): State<AppState<S>>,
    JwtAuth(member_id): JwtAuth,
    Path(id): Path<Uuid>,
    Json(req): Json<TeamRequest>,
) -> Result<Json<TeamResponse>, ApiError> {
    let details = TeamDetails::from(req);
    let service = &state.service;

    let team = retry_on_conflict(state.conflict_retry_attempts, || {
        service.update_team_info(member_id, id, details.clone())
    })
    .await?;

    Ok(Json(TeamResponse::from(&team)))
}

/// List the members of a team
///
/// GET /api/teams/:id/members
pub async fn list_team_members<S: TeamStore>(
    State(state): State<AppState<S>>,
    JwtAuth(_): JwtAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<MemberResponse>>, ApiError> {
    let members = state.service.get_team_members(id).await?;

    Ok(Json(members.iter().map(MemberResponse::from).collect()))
}

/// Join a team as the caller
///
/// POST /api/teams/:id/members
pub async fn join_team<S: TeamStore>(
    State(state): State<AppState<S>>,
    JwtAuth(member_id): JwtAuth,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<MembershipResponse>), ApiError> {
    let service = &state.service;

    let membership = retry_on_conflict(state.conflict_retry_attempts, || {
        service.join_team(member_id, id)
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(MembershipResponse::from(&membership)),
    ))
}

/// Remove another member from a team (leader only)
///
/// DELETE /api/teams/:id/members/:member_id
pub async fn remove_team_member<S: TeamStore>(
    State(state): State<AppState<S>>,
    JwtAuth(member_id): JwtAuth,
    Path((id, member_id_to_remove)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let service = &state.service;

    retry_on_conflict(state.conflict_retry_attempts, || {
        service.remove_team_member(member_id, id, member_id_to_remove)
    })
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Hand leadership to another member (leader only)
///
/// PUT /api/teams/:id/leader
pub async fn delegate_leader<S: TeamStore>(
    State(state): State<AppState<S>>,
    JwtAuth(member_id): JwtAuth,
    Path(id): Path<Uuid>,
    Json(req): Json<DelegateLeaderRequest>,
) -> Result<StatusCode, ApiError> {
    let service = &state.service;

    retry_on_conflict(state.conflict_retry_attempts, || {
        service.delegate_team_leader(member_id, id, req.new_leader_id)
    })
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Leave a team as the caller
///
/// POST /api/teams/:id/leave
pub async fn leave_team<S: TeamStore>(
    State(state): State<AppState<S>>,
    JwtAuth(member_id): JwtAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let service = &state.service;

    retry_on_conflict(state.conflict_retry_attempts, || {
        service.leave_team(member_id, id)
    })
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
