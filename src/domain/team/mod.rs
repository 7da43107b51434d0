// Team domain module
// Contains the team aggregate root, memberships, value objects, errors and
// domain events

#![allow(clippy::module_inception)]

pub mod errors;
pub mod events;
pub mod membership;
pub mod team;
pub mod value_objects;

// Re-export main types for convenience
pub use errors::{TeamError, TeamResult};
pub use events::{TeamEvent, TeamEventListener};
pub use membership::Membership;
pub use team::Team;
pub use value_objects::{FeedbackType, ProjectDuration};
