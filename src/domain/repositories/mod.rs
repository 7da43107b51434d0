// Store contracts the team lifecycle depends on
// Implementations live in the infrastructure layer

pub mod errors;
pub mod member_directory;
pub mod membership_repository;
pub mod store;
pub mod team_repository;

pub use errors::StoreError;
pub use member_directory::MemberDirectory;
pub use membership_repository::MembershipRepository;
pub use store::{TeamStore, UnitOfWork};
pub use team_repository::TeamRepository;
