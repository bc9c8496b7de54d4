//! JSON-file-backed [Repository] adapter.
//!
//! Grounded on the teacher's `data::profile::load_profile` ("Returns
//! default... if file missing or invalid") for tolerant reads, and
//! `data::import::import_roster_csv` for the CSV roster helper below.
//! Conversations are appended to a JSON-lines file, mirroring the
//! append-only shape of `server::sync::apply_officer_sync`'s
//! read-modify-write under a lock, except append-only writes need no lock
//! per §5 ("append-only, no per-record locking required").

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;

use crate::model::{ChiefGear, ConversationRecord, OwnedHero, Profile, User, UserRateState};
use crate::repository::{Repository, RepositoryError};

/// Base directory layout:
/// `<base>/users/<user_id>.json`, `<base>/profiles/<profile_id>.json`,
/// `<base>/heroes/<profile_id>.json`, `<base>/chief_gear/<profile_id>.json`,
/// `<base>/conversations.jsonl`.
pub struct FileRepository {
    base_dir: PathBuf,
}

impl FileRepository {
    pub fn new(base_dir: impl Into<PathBuf>) -> FileRepository {
        FileRepository { base_dir: base_dir.into() }
    }

    fn path_for(&self, collection: &str, id: &str) -> PathBuf {
        self.base_dir.join(collection).join(format!("{id}.json"))
    }

    fn read_json<T: for<'de> serde::Deserialize<'de>>(&self, collection: &str, id: &str) -> Result<T, RepositoryError> {
        let path = self.path_for(collection, id);
        let raw = fs::read_to_string(&path).map_err(|_| RepositoryError::NotFound(format!("{collection}/{id}")))?;
        serde_json::from_str(&raw).map_err(RepositoryError::Parse)
    }

    pub(crate) fn write_json<T: serde::Serialize>(&self, collection: &str, id: &str, value: &T) -> Result<(), RepositoryError> {
        let path = self.path_for(collection, id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(RepositoryError::Io)?;
        }
        let serialized = serde_json::to_string_pretty(value).map_err(RepositoryError::Parse)?;
        fs::write(path, serialized).map_err(RepositoryError::Io)
    }

    pub(crate) fn conversations_path(&self) -> PathBuf {
        self.base_dir.join("conversations.jsonl")
    }
}

impl Repository for FileRepository {
    fn get_profile(&self, user_id: &str) -> Result<Profile, RepositoryError> {
        self.read_json("profiles", user_id)
    }

    fn get_owned_heroes(&self, profile_id: &str) -> Result<Vec<OwnedHero>, RepositoryError> {
        match self.read_json("heroes", profile_id) {
            Ok(heroes) => Ok(heroes),
            Err(RepositoryError::NotFound(_)) => Ok(Vec::new()),
            Err(other) => Err(other),
        }
    }

    fn get_chief_gear(&self, profile_id: &str) -> Result<Option<ChiefGear>, RepositoryError> {
        match self.read_json("chief_gear", profile_id) {
            Ok(gear) => Ok(Some(gear)),
            Err(RepositoryError::NotFound(_)) => Ok(None),
            Err(other) => Err(other),
        }
    }

    fn get_user(&self, user_id: &str) -> Result<User, RepositoryError> {
        self.read_json("users", user_id)
    }

    fn update_rate_state(&self, user_id: &str, state: &UserRateState) -> Result<(), RepositoryError> {
        let mut user: User = self.get_user(user_id)?;
        user.rate_state = state.clone();
        self.write_json("users", user_id, &user)
    }

    fn append_conversation(&self, record: &ConversationRecord) -> Result<(), RepositoryError> {
        let path = self.conversations_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(RepositoryError::Io)?;
        }
        let line = serde_json::to_string(record).map_err(RepositoryError::Parse)?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(RepositoryError::Io)?;
        writeln!(file, "{line}").map_err(RepositoryError::Io)
    }
}

#[derive(Debug)]
pub enum RosterImportError {
    Read(std::io::Error),
    ParseLine { line: usize, message: String },
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Read(e) => write!(f, "{e}"),
            RosterImportError::ParseLine { line, message } => write!(f, "line {line}: {message}"),
        }
    }
}

impl std::error::Error for RosterImportError {}

/// Parse a CSV roster export (`name,level,stars`) into [OwnedHero] records.
/// Ambient tooling grounded on the teacher's `import_roster_csv`: same
/// `trim(csv::Trim::All)` + `has_headers(false)` + skip-if-header-row shape,
/// adapted from officer rank/tier columns to hero level/star columns.
pub fn import_owned_heroes_csv(path: impl AsRef<Path>) -> Result<Vec<OwnedHero>, RosterImportError> {
    let content = fs::read_to_string(path).map_err(RosterImportError::Read)?;
    let mut heroes = Vec::new();
    let mut skip_next_if_header = true;

    let mut reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .has_headers(false)
        .from_reader(content.as_bytes());

    for (record_index, record) in reader.records().enumerate() {
        let line = record_index + 1;
        let record = record.map_err(|e| RosterImportError::ParseLine { line, message: e.to_string() })?;

        let name = record.get(0).unwrap_or("").trim();
        if name.is_empty() {
            continue;
        }
        if skip_next_if_header && name.eq_ignore_ascii_case("name") {
            skip_next_if_header = false;
            continue;
        }
        skip_next_if_header = false;

        let level: u8 = record.get(1).unwrap_or("1").trim().parse().unwrap_or(1);
        let stars: u8 = record.get(2).unwrap_or("0").trim().parse().unwrap_or(0);

        heroes.push(OwnedHero {
            name: name.to_string(),
            level,
            stars,
            ascension: 0,
            expedition_skill_levels: [1, 1, 1],
            exploration_skill_levels: [1, 1, 1],
            gear: Default::default(),
            mythic_gear: None,
        });
    }

    Ok(heroes)
}
