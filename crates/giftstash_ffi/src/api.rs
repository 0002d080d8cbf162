//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the people store operations to Dart via FRB.
//! - Keep error semantics simple for UI integration: envelopes with a
//!   user-displayable message, never rich Rust error types.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - The process-wide store instance lives here, not in core; core types
//!   stay explicitly owned and injectable.

use giftstash_core::db::open_db;
use giftstash_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    PeopleStore, Person, SaveIdeaError, SqliteKvPeopleRepository, StoreError,
};
use std::sync::{Mutex, MutexGuard, OnceLock};
use uuid::Uuid;

static STORE: OnceLock<Mutex<PeopleStore<SqliteKvPeopleRepository>>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Opens the on-device database and loads the people store.
///
/// Uses the recovery load policy: a corrupt persisted collection is backed
/// up and the store starts empty instead of blocking app startup.
///
/// # FFI contract
/// - Sync call; performs database open + migration + load.
/// - Idempotent: once the store is installed, later calls are no-ops.
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_store(db_path: String) -> String {
    if STORE.get().is_some() {
        return String::new();
    }

    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => return format!("failed to open database at `{db_path}`: {err}"),
    };

    let store = match PeopleStore::initialize_or_empty(SqliteKvPeopleRepository::new(conn)) {
        Ok(store) => store,
        Err(err) => return format!("failed to load people collection: {err}"),
    };

    match STORE.set(Mutex::new(store)) {
        Ok(()) => String::new(),
        // Lost a startup race; the installed instance wins.
        Err(_) => String::new(),
    }
}

/// Gift idea view model crossing the FFI boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct IdeaView {
    /// Stable idea ID in string form.
    pub id: String,
    /// Descriptive idea text.
    pub text: String,
    /// Captured photo URI.
    pub image: String,
    /// Display width captured by the UI.
    pub width: f64,
    /// Display height captured by the UI.
    pub height: f64,
}

/// Person view model crossing the FFI boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonView {
    /// Stable person ID in string form.
    pub id: String,
    /// Display name.
    pub name: String,
    /// ISO-8601 date-of-birth string as originally captured.
    pub date_of_birth: String,
    /// Ideas in insertion order.
    pub ideas: Vec<IdeaView>,
}

/// People listing envelope for UI rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct PeopleResponse {
    /// People in insertion order (empty before `init_store`).
    pub people: Vec<PersonView>,
    /// Human-readable diagnostics message.
    pub message: String,
}

/// Generic action response envelope for mutation calls.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Created person/idea ID, when the operation creates one.
    pub id: Option<String>,
    /// Human-readable message for diagnostics or direct display.
    pub message: String,
}

impl ActionResponse {
    fn created(message: impl Into<String>, id: String) -> Self {
        Self {
            ok: true,
            id: Some(id),
            message: message.into(),
        }
    }

    fn done(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            id: None,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Lists all people with their ideas for UI rendering.
///
/// # FFI contract
/// - Sync call, read-only.
/// - Never panics; returns an empty listing with a message when the store
///   is not initialized.
#[flutter_rust_bridge::frb(sync)]
pub fn list_people() -> PeopleResponse {
    let Some(store) = STORE.get() else {
        return PeopleResponse {
            people: Vec::new(),
            message: "store not initialized; call init_store first".to_string(),
        };
    };

    let store = lock_store(store);
    PeopleResponse {
        people: store.people().iter().map(person_view).collect(),
        message: String::new(),
    }
}

/// Adds a person and returns the created ID.
///
/// # FFI contract
/// - Sync call; performs one durable write.
/// - Never panics; failures are reported in the envelope.
#[flutter_rust_bridge::frb(sync)]
pub fn add_person(name: String, date_of_birth: String) -> ActionResponse {
    with_store(|store| match store.add_person(name, date_of_birth) {
        Ok(person_id) => ActionResponse::created("person added", person_id.to_string()),
        Err(err) => store_failure(err),
    })
}

/// Validates and saves a gift idea for a person.
///
/// Validation failures carry user-displayable messages ("Please enter a
/// gift idea.", ...) so the UI can show them verbatim in a modal.
///
/// # FFI contract
/// - Sync call; performs at most one durable write.
/// - Never panics; failures are reported in the envelope.
#[flutter_rust_bridge::frb(sync)]
pub fn save_idea(
    person_id: String,
    text: String,
    image: String,
    width: f64,
    height: f64,
) -> ActionResponse {
    let Some(person_id) = parse_id(&person_id, "person_id") else {
        return ActionResponse::failure(format!("invalid person_id `{person_id}`"));
    };

    with_store(
        |store| match store.save_idea_validated(person_id, &text, &image, width, height) {
            Ok(idea_id) => ActionResponse::created("idea saved", idea_id.to_string()),
            Err(SaveIdeaError::Validation(err)) => ActionResponse::failure(err.to_string()),
            Err(SaveIdeaError::Store(err)) => store_failure(err),
        },
    )
}

/// Deletes one idea from a person's list.
///
/// # FFI contract
/// - Sync call; missing person/idea is a successful no-op.
/// - Never panics; failures are reported in the envelope.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_idea(person_id: String, idea_id: String) -> ActionResponse {
    let Some(person_id) = parse_id(&person_id, "person_id") else {
        return ActionResponse::failure(format!("invalid person_id `{person_id}`"));
    };
    let Some(idea_id) = parse_id(&idea_id, "idea_id") else {
        return ActionResponse::failure(format!("invalid idea_id `{idea_id}`"));
    };

    with_store(|store| match store.delete_idea(person_id, idea_id) {
        Ok(()) => ActionResponse::done("idea deleted"),
        Err(err) => store_failure(err),
    })
}

/// Deletes a person and all of their ideas.
///
/// # FFI contract
/// - Sync call; missing person is a successful no-op.
/// - Never panics; failures are reported in the envelope.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_person(person_id: String) -> ActionResponse {
    let Some(person_id) = parse_id(&person_id, "person_id") else {
        return ActionResponse::failure(format!("invalid person_id `{person_id}`"));
    };

    with_store(|store| match store.delete_person(person_id) {
        Ok(()) => ActionResponse::done("person deleted"),
        Err(err) => store_failure(err),
    })
}

fn with_store(
    operation: impl FnOnce(&mut PeopleStore<SqliteKvPeopleRepository>) -> ActionResponse,
) -> ActionResponse {
    let Some(store) = STORE.get() else {
        return ActionResponse::failure("store not initialized; call init_store first");
    };

    let mut store = lock_store(store);
    operation(&mut *store)
}

fn lock_store(
    store: &Mutex<PeopleStore<SqliteKvPeopleRepository>>,
) -> MutexGuard<'_, PeopleStore<SqliteKvPeopleRepository>> {
    // A poisoned lock means a previous caller panicked mid-operation; the
    // collection itself is still structurally valid, so keep serving.
    store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn store_failure(err: StoreError) -> ActionResponse {
    match err {
        // The mutation is applied in memory; tell the UI about the
        // durability gap instead of pretending nothing happened, and hand
        // back the created ID so it can reconcile with the visible state.
        StoreError::PersistenceWriteFailed { applied_id, .. } => {
            log::warn!("event=ffi_mutation module=ffi status=degraded error={err}");
            ActionResponse {
                ok: false,
                id: applied_id.map(|id| id.to_string()),
                message: "saved on screen but writing to storage failed; changes may be lost on restart".to_string(),
            }
        }
        other => ActionResponse::failure(other.to_string()),
    }
}

fn parse_id(raw: &str, field: &str) -> Option<Uuid> {
    match Uuid::parse_str(raw.trim()) {
        Ok(id) => Some(id),
        Err(err) => {
            log::warn!("event=ffi_parse module=ffi status=error field={field} error={err}");
            None
        }
    }
}

fn person_view(person: &Person) -> PersonView {
    PersonView {
        id: person.id.to_string(),
        name: person.name.clone(),
        date_of_birth: person.date_of_birth.clone(),
        ideas: person
            .ideas
            .iter()
            .map(|idea| IdeaView {
                id: idea.id.to_string(),
                text: idea.text.clone(),
                image: idea.image.clone(),
                width: idea.width,
                height: idea.height,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        add_person, core_version, delete_idea, delete_person, init_logging, init_store,
        list_people, ping, save_idea,
    };
    use giftstash_core::db::DbError;
    use giftstash_core::{RepoError, StoreError};
    use std::time::{SystemTime, UNIX_EPOCH};
    use uuid::Uuid;

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn delete_person_rejects_malformed_id() {
        let response = delete_person("not-a-uuid".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("invalid person_id"));
    }

    #[test]
    fn delete_idea_rejects_malformed_idea_id() {
        // A valid person ID still fails on the malformed idea ID, before
        // the store is ever consulted.
        let response = delete_idea(Uuid::new_v4().to_string(), "nope".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("invalid idea_id"));
    }

    #[test]
    fn save_idea_rejects_malformed_person_id() {
        let response = save_idea(
            "broken".to_string(),
            "Socks".to_string(),
            "img://a".to_string(),
            100.0,
            150.0,
        );
        assert!(!response.ok);
        assert!(response.message.contains("invalid person_id"));
    }

    // The process-wide store is installed once; this is the only test that
    // touches it, so the before-init and after-init envelopes stay
    // deterministic under parallel test execution.
    #[test]
    fn store_lifecycle_roundtrip() {
        let before_init = add_person("Alice".to_string(), "1990-01-01T00:00:00.000Z".to_string());
        assert!(!before_init.ok);
        assert!(before_init.message.contains("store not initialized"));

        let empty_listing = list_people();
        assert!(empty_listing.people.is_empty());
        assert!(empty_listing.message.contains("store not initialized"));

        let db_path = unique_db_path("lifecycle");
        assert_eq!(init_store(db_path.clone()), String::new());
        // Re-initialization is a no-op.
        assert_eq!(init_store(db_path), String::new());

        let created = add_person("Alice".to_string(), "1990-01-01T00:00:00.000Z".to_string());
        assert!(created.ok, "{}", created.message);
        let person_id = created.id.expect("add_person should return an id");

        let rejected = save_idea(
            person_id.clone(),
            String::new(),
            "img://a".to_string(),
            10.0,
            10.0,
        );
        assert!(!rejected.ok);
        assert_eq!(rejected.message, "Please enter a gift idea.");
        assert!(rejected.id.is_none());

        let saved = save_idea(
            person_id.clone(),
            "Socks".to_string(),
            "img://a".to_string(),
            100.0,
            150.0,
        );
        assert!(saved.ok, "{}", saved.message);
        let idea_id = saved.id.expect("save_idea should return an id");

        let listing = list_people();
        assert_eq!(listing.people.len(), 1);
        assert_eq!(listing.people[0].id, person_id);
        assert_eq!(listing.people[0].ideas.len(), 1);
        assert_eq!(listing.people[0].ideas[0].id, idea_id);
        assert_eq!(listing.people[0].ideas[0].text, "Socks");

        let deleted_idea = delete_idea(person_id.clone(), idea_id);
        assert!(deleted_idea.ok, "{}", deleted_idea.message);
        assert!(list_people().people[0].ideas.is_empty());

        let deleted_person = delete_person(person_id);
        assert!(deleted_person.ok, "{}", deleted_person.message);
        assert!(list_people().people.is_empty());
    }

    #[test]
    fn degraded_write_envelope_reports_created_id() {
        let applied = Uuid::new_v4();
        let err = StoreError::PersistenceWriteFailed {
            applied_id: Some(applied),
            source: RepoError::Db(DbError::UnsupportedSchemaVersion {
                db_version: 2,
                latest_supported: 1,
            }),
        };

        let response = super::store_failure(err);
        assert!(!response.ok);
        assert_eq!(response.id, Some(applied.to_string()));
        assert!(response.message.contains("writing to storage failed"));
    }

    fn unique_db_path(suffix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after unix epoch")
            .as_nanos();
        std::env::temp_dir()
            .join(format!(
                "giftstash-ffi-{suffix}-{}-{nanos}.db",
                std::process::id()
            ))
            .to_str()
            .expect("temp dir should be valid UTF-8")
            .to_string()
    }
}
