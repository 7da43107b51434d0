use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::team::TeamError;

/// API error type with HTTP status code and message
///
/// Errors coming from the team lifecycle also carry a stable `code` so
/// clients can react without parsing the message.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub code: Option<&'static str>,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 401 Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Creates a 403 Forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// Creates a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Creates a 409 Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.code {
            Some(code) => Json(json!({ "error": self.message, "code": code })),
            None => Json(json!({ "error": self.message })),
        };

        (self.status, body).into_response()
    }
}

impl From<TeamError> for ApiError {
    fn from(err: TeamError) -> Self {
        let message = err.to_string();
        match err {
            TeamError::MemberNotFound(_) => {
                ApiError::not_found(message).with_code("MEMBER_NOT_FOUND")
            }
            TeamError::TeamNotFound(_) => ApiError::not_found(message).with_code("TEAM_NOT_FOUND"),
            TeamError::MembershipNotFound { .. } => {
                ApiError::not_found(message).with_code("MEMBERSHIP_NOT_FOUND")
            }
            TeamError::InvalidDuration { .. } => {
                ApiError::bad_request(message).with_code("INVALID_DURATION")
            }
            TeamError::InvalidTeamName => {
                ApiError::bad_request(message).with_code("INVALID_TEAM_NAME")
            }
            TeamError::NotTeamMember { .. } => {
                ApiError::bad_request(message).with_code("NOT_TEAM_MEMBER")
            }
            TeamError::CannotRemoveLeader { .. } => {
                ApiError::bad_request(message).with_code("CANNOT_REMOVE_LEADER")
            }
            TeamError::NotTeamLeader { .. } => {
                ApiError::forbidden(message).with_code("NOT_TEAM_LEADER")
            }
            TeamError::LeaderMustDelegateFirst { .. } => {
                ApiError::conflict(message).with_code("LEADER_MUST_DELEGATE_FIRST")
            }
            TeamError::AlreadyTeamMember { .. } => {
                ApiError::conflict(message).with_code("ALREADY_TEAM_MEMBER")
            }
            TeamError::ConflictRetry => ApiError::conflict(message).with_code("CONFLICT_RETRY"),
            TeamError::Store(_) => {
                tracing::error!(error = %message, "team store failure");
                ApiError::internal_server_error("Internal storage error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn not_found_kinds_map_to_404() {
        let err = ApiError::from(TeamError::TeamNotFound(Uuid::new_v4()));

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.code, Some("TEAM_NOT_FOUND"));
    }

    #[test]
    fn leader_check_maps_to_403() {
        let err = ApiError::from(TeamError::NotTeamLeader {
            member_id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
        });

        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn conflicts_map_to_409() {
        assert_eq!(
            ApiError::from(TeamError::ConflictRetry).status,
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(TeamError::LeaderMustDelegateFirst {
                team_id: Uuid::new_v4()
            })
            .status,
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn store_failures_hide_details() {
        let err = ApiError::from(TeamError::Store("connection refused".to_string()));

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("connection refused"));
        assert!(err.code.is_none());
    }
}
