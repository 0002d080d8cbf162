//! Core domain logic for GiftStash.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::person::{
    validate_idea_input, Idea, IdeaId, IdeaValidationError, Person, PersonId,
};
pub use repo::people_repo::{
    PeopleRepository, RepoError, RepoResult, SqliteKvPeopleRepository, PEOPLE_KEY,
};
pub use store::people_store::{PeopleStore, SaveIdeaError, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
