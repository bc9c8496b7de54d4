//! Repository capability (§6): the only way the core touches persistence.
//!
//! Grounded on the teacher's `data::data_registry::DataRegistry` (load-once,
//! `Arc`-shared, tolerate-missing-file reads) and `data::profile::load_profile`
//! ("Returns default ... if file missing or invalid"). The core depends only
//! on the [Repository] trait; [file_repository] is the concrete JSON-file
//! adapter that makes this crate runnable and testable without an external
//! database, exactly the role `data_registry.rs` plays for the teacher's
//! static catalogs plus `data/import.rs` plays for mutable roster state.

use std::fmt;

use crate::model::{ChiefGear, ConversationRecord, OwnedHero, Profile, User, UserRateState};

#[derive(Debug)]
pub enum RepositoryError {
    NotFound(String),
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryError::NotFound(what) => write!(f, "not found: {what}"),
            RepositoryError::Io(e) => write!(f, "{e}"),
            RepositoryError::Parse(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RepositoryError {}

/// Read + write capability the core consumes (§6). Implementations must be
/// safe to call from any worker (§5): reads are plain lookups, writes to
/// rate state must tolerate concurrent callers (the core's own per-user
/// serialization in [crate::rate_limit] covers atomicity; an implementation
/// MAY additionally enforce compare-and-swap at the storage layer).
pub trait Repository: Send + Sync {
    fn get_profile(&self, user_id: &str) -> Result<Profile, RepositoryError>;
    fn get_owned_heroes(&self, profile_id: &str) -> Result<Vec<OwnedHero>, RepositoryError>;
    fn get_chief_gear(&self, profile_id: &str) -> Result<Option<ChiefGear>, RepositoryError>;
    fn get_user(&self, user_id: &str) -> Result<User, RepositoryError>;

    fn update_rate_state(&self, user_id: &str, state: &UserRateState) -> Result<(), RepositoryError>;
    fn append_conversation(&self, record: &ConversationRecord) -> Result<(), RepositoryError>;
}

pub mod file_repository;
pub use file_repository::FileRepository;
