// Store implementations (data access layer)
// Adapters that implement the domain store contracts

pub mod in_memory_store;
pub mod postgres_store;

pub use in_memory_store::{InMemoryStore, InMemoryTransaction};
pub use postgres_store::{PostgresStore, PostgresTransaction};
