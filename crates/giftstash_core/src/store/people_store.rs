//! People state store: canonical in-memory collection plus mutation API.
//!
//! # Responsibility
//! - Hold the single in-memory copy of the people collection.
//! - Provide the add/delete operations UI layers call, persisting the full
//!   collection after each mutation.
//!
//! # Invariants
//! - Mutations apply to memory first; the durable write follows. A failed
//!   write is reported as `PersistenceWriteFailed` and never rolls the
//!   in-memory change back.
//! - Writes are issued synchronously in mutation order, so the durable
//!   store converges to the latest in-memory snapshot (single in-flight
//!   write, no reordering).
//! - Delete operations are idempotent no-ops when the target is missing.

use crate::model::person::{
    validate_idea_input, Idea, IdeaId, IdeaValidationError, Person, PersonId,
};
use crate::repo::people_repo::{PeopleRepository, RepoError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from state store initialization and mutation operations.
#[derive(Debug)]
pub enum StoreError {
    /// Persisted value exists but cannot be parsed. Raised by the strict
    /// `initialize`; the recovery constructor backs the value up instead.
    CorruptPersistedState(RepoError),
    /// Persisted value could not be read for reasons other than corruption.
    LoadFailed(RepoError),
    /// `add_idea` referenced a person that is not in the collection.
    PersonNotFound(PersonId),
    /// The mutation was applied in memory but the durable write failed.
    /// In-memory state is ahead of durable state until a later save lands.
    PersistenceWriteFailed {
        /// ID created by the applied mutation, when it created one; lets
        /// callers reconcile with the visible in-memory state.
        applied_id: Option<Uuid>,
        source: RepoError,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CorruptPersistedState(err) => write!(f, "{err}"),
            Self::LoadFailed(err) => write!(f, "failed to load people collection: {err}"),
            Self::PersonNotFound(id) => write!(f, "person not found: {id}"),
            Self::PersistenceWriteFailed { source, .. } => {
                write!(f, "people collection write failed: {source}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CorruptPersistedState(err) | Self::LoadFailed(err) => Some(err),
            Self::PersistenceWriteFailed { source, .. } => Some(source),
            Self::PersonNotFound(_) => None,
        }
    }
}

/// Failure of the validated idea-save composition.
#[derive(Debug)]
pub enum SaveIdeaError {
    /// Presence check failed; nothing was created or persisted.
    Validation(IdeaValidationError),
    /// Validation passed but the underlying `add_idea` failed.
    Store(StoreError),
}

impl Display for SaveIdeaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SaveIdeaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<IdeaValidationError> for SaveIdeaError {
    fn from(value: IdeaValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for SaveIdeaError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Canonical owner of the in-memory people collection.
///
/// Constructed once at process start with an explicit repository and passed
/// to consumers by reference; there is no ambient global in this crate.
#[derive(Debug)]
pub struct PeopleStore<R: PeopleRepository> {
    repo: R,
    people: Vec<Person>,
}

impl<R: PeopleRepository> PeopleStore<R> {
    /// Loads the persisted collection into a new store.
    ///
    /// An absent persisted value yields an empty collection. A present but
    /// unparseable value fails with `CorruptPersistedState`; callers that
    /// prefer availability over strictness use [`initialize_or_empty`].
    ///
    /// [`initialize_or_empty`]: Self::initialize_or_empty
    pub fn initialize(repo: R) -> StoreResult<Self> {
        let people = repo.load().map_err(|err| {
            if err.is_corrupt() {
                error!("event=store_init module=store status=error error_code=corrupt_state error={err}");
                StoreError::CorruptPersistedState(err)
            } else {
                error!("event=store_init module=store status=error error_code=load_failed error={err}");
                StoreError::LoadFailed(err)
            }
        })?;

        info!(
            "event=store_init module=store status=ok people_count={}",
            people.len()
        );
        Ok(Self { repo, people })
    }

    /// Read-only snapshot of the collection, in insertion order.
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    /// Returns the person with the given ID, if present.
    pub fn person(&self, person_id: PersonId) -> Option<&Person> {
        self.people.iter().find(|person| person.id == person_id)
    }

    /// Appends a new person with an empty idea list and persists.
    ///
    /// Duplicate names are permitted; identity is the generated ID.
    pub fn add_person(
        &mut self,
        name: impl Into<String>,
        date_of_birth: impl Into<String>,
    ) -> StoreResult<PersonId> {
        let person = Person::new(name, date_of_birth);
        let person_id = person.id;
        self.people.push(person);

        info!("event=person_added module=store status=ok person_id={person_id}");
        self.persist(Some(person_id))?;
        Ok(person_id)
    }

    /// Appends a new idea to the given person's list and persists.
    ///
    /// # Errors
    /// - `PersonNotFound` when no person with `person_id` exists; the
    ///   collection is left untouched.
    pub fn add_idea(
        &mut self,
        person_id: PersonId,
        text: impl Into<String>,
        image: impl Into<String>,
        width: f64,
        height: f64,
    ) -> StoreResult<IdeaId> {
        let person = self
            .people
            .iter_mut()
            .find(|person| person.id == person_id)
            .ok_or(StoreError::PersonNotFound(person_id))?;

        let idea = Idea::new(text, image, width, height);
        let idea_id = idea.id;
        person.ideas.push(idea);

        info!("event=idea_added module=store status=ok person_id={person_id} idea_id={idea_id}");
        self.persist(Some(idea_id))?;
        Ok(idea_id)
    }

    /// Presence-checked idea save for direct UI consumption.
    ///
    /// Validates text and image before touching the collection, so a
    /// validation failure creates and persists nothing.
    pub fn save_idea_validated(
        &mut self,
        person_id: PersonId,
        text: &str,
        image: &str,
        width: f64,
        height: f64,
    ) -> Result<IdeaId, SaveIdeaError> {
        validate_idea_input(text, image)?;
        let idea_id = self.add_idea(person_id, text, image, width, height)?;
        Ok(idea_id)
    }

    /// Removes the matching idea from the given person's list and persists.
    ///
    /// A missing person or idea is an idempotent no-op: the collection is
    /// unchanged and no write is issued.
    pub fn delete_idea(&mut self, person_id: PersonId, idea_id: IdeaId) -> StoreResult<()> {
        let Some(person) = self
            .people
            .iter_mut()
            .find(|person| person.id == person_id)
        else {
            return Ok(());
        };

        let before = person.ideas.len();
        person.ideas.retain(|idea| idea.id != idea_id);
        if person.ideas.len() == before {
            return Ok(());
        }

        info!("event=idea_deleted module=store status=ok person_id={person_id} idea_id={idea_id}");
        self.persist(None)
    }

    /// Removes the person, cascading over all of their ideas, and persists.
    ///
    /// A missing person is an idempotent no-op.
    pub fn delete_person(&mut self, person_id: PersonId) -> StoreResult<()> {
        let before = self.people.len();
        self.people.retain(|person| person.id != person_id);
        if self.people.len() == before {
            return Ok(());
        }

        info!("event=person_deleted module=store status=ok person_id={person_id}");
        self.persist(None)
    }

    fn persist(&self, applied_id: Option<Uuid>) -> StoreResult<()> {
        match self.repo.save(&self.people) {
            Ok(()) => Ok(()),
            Err(err) => {
                // In-memory state is already published to readers; report
                // the durability gap instead of rolling back.
                warn!(
                    "event=people_save module=store status=error error_code=write_failed error={err}"
                );
                Err(StoreError::PersistenceWriteFailed {
                    applied_id,
                    source: err,
                })
            }
        }
    }
}

impl PeopleStore<crate::repo::people_repo::SqliteKvPeopleRepository> {
    /// Loads the persisted collection, falling back to empty on corruption.
    ///
    /// The unreadable raw value is copied to a `people.corrupt` backup row
    /// before the store starts empty, so the data stays recoverable. Load
    /// failures other than corruption still fail.
    pub fn initialize_or_empty(
        repo: crate::repo::people_repo::SqliteKvPeopleRepository,
    ) -> StoreResult<Self> {
        match repo.load() {
            Ok(people) => {
                info!(
                    "event=store_init module=store status=ok people_count={}",
                    people.len()
                );
                Ok(Self { repo, people })
            }
            Err(err) if err.is_corrupt() => {
                warn!(
                    "event=store_init module=store status=recovered error_code=corrupt_state error={err}"
                );
                repo.backup_raw("corrupt")
                    .map_err(StoreError::LoadFailed)?;
                Ok(Self {
                    repo,
                    people: Vec::new(),
                })
            }
            Err(err) => {
                error!(
                    "event=store_init module=store status=error error_code=load_failed error={err}"
                );
                Err(StoreError::LoadFailed(err))
            }
        }
    }
}
