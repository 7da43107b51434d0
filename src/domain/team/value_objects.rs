use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::errors::TeamError;

/// How feedback exchanged inside a team is attributed
///
/// Stored as the `feedback_type` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "feedback_type", rename_all = "UPPERCASE")]
pub enum FeedbackType {
    /// Receivers do not learn who wrote a feedback
    Anonymous,
    /// Feedback carries the writer's identity
    Identified,
}

impl std::fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedbackType::Anonymous => write!(f, "ANONYMOUS"),
            FeedbackType::Identified => write!(f, "IDENTIFIED"),
        }
    }
}

/// Project timeframe of a team
///
/// # Invariants
/// - When an end date is present, the start date is strictly before it
/// - An open-ended project (no end date) is always valid
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use teamspace_api::domain::team::value_objects::ProjectDuration;
///
/// let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
///
/// assert!(ProjectDuration::new(start, Some(end)).is_ok());
/// assert!(ProjectDuration::new(end, Some(start)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDuration {
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
}

impl ProjectDuration {
    /// Validates and builds a project duration
    ///
    /// # Returns
    /// * `Ok(ProjectDuration)` - If start precedes end (or there is no end)
    /// * `Err(TeamError::InvalidDuration)` - Otherwise, including start == end
    pub fn new(start_date: NaiveDate, end_date: Option<NaiveDate>) -> Result<Self, TeamError> {
        if let Some(end) = end_date {
            if start_date >= end {
                return Err(TeamError::InvalidDuration {
                    start: start_date,
                    end,
                });
            }
        }

        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Rebuilds a stored duration without re-validating it
    pub(crate) fn from_persistence(start_date: NaiveDate, end_date: Option<NaiveDate>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }
}
