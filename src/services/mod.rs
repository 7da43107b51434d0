// Application services
// Orchestrate domain rules over the store contracts

pub mod retry;
pub mod team_service;

pub use retry::retry_on_conflict;
pub use team_service::{TeamDetails, TeamService};
