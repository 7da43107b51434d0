// Infrastructure layer module
// Contains database adapters and event hook implementations
// Follows Hexagonal Architecture

pub mod events;
pub mod repositories;
