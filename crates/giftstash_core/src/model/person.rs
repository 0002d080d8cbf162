//! Person and Idea domain model.
//!
//! # Responsibility
//! - Define the canonical records held by the people store and persisted
//!   as one JSON collection.
//! - Provide the presence check used by the validated idea-save path.
//!
//! # Invariants
//! - `id` fields are stable and never reused.
//! - A Person owns its ideas; an Idea never outlives its Person.
//! - Wire field names (`dob`, `img`, `w`, `h`) are fixed; there is no
//!   schema version field, so renames are breaking.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a tracked person.
pub type PersonId = Uuid;

/// Stable identifier for a gift idea within its owning person.
pub type IdeaId = Uuid;

/// A tracked individual with an ordered list of gift ideas.
///
/// Insertion order is display order; the core never reorders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Stable global ID, generated at creation.
    pub id: PersonId,
    /// Display name. Duplicates across people are permitted.
    pub name: String,
    /// ISO-8601 date-time string, stored verbatim from the caller.
    #[serde(rename = "dob")]
    pub date_of_birth: String,
    /// Ordered idea sequence, grows/shrinks only through store operations.
    #[serde(default)]
    pub ideas: Vec<Idea>,
}

impl Person {
    /// Creates a person with a generated stable ID and no ideas.
    pub fn new(name: impl Into<String>, date_of_birth: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name, date_of_birth)
    }

    /// Creates a person with a caller-provided stable ID.
    ///
    /// Used by tests and import paths where identity already exists.
    pub fn with_id(
        id: PersonId,
        name: impl Into<String>,
        date_of_birth: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            date_of_birth: date_of_birth.into(),
            ideas: Vec::new(),
        }
    }

    /// Returns the idea with the given ID, if this person owns it.
    pub fn idea(&self, idea_id: IdeaId) -> Option<&Idea> {
        self.ideas.iter().find(|idea| idea.id == idea_id)
    }
}

/// A gift idea: descriptive text plus a captured photo reference and its
/// display dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    /// Stable ID, unique within the owning person's idea list.
    pub id: IdeaId,
    /// Descriptive text. Non-empty when created through the validated path.
    pub text: String,
    /// Opaque URI of the captured photo.
    #[serde(rename = "img")]
    pub image: String,
    /// Display width computed by the caller at capture time, stored verbatim.
    #[serde(rename = "w")]
    pub width: f64,
    /// Display height computed by the caller at capture time, stored verbatim.
    #[serde(rename = "h")]
    pub height: f64,
}

impl Idea {
    /// Creates an idea with a generated stable ID.
    pub fn new(
        text: impl Into<String>,
        image: impl Into<String>,
        width: f64,
        height: f64,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), text, image, width, height)
    }

    /// Creates an idea with a caller-provided stable ID.
    pub fn with_id(
        id: IdeaId,
        text: impl Into<String>,
        image: impl Into<String>,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            image: image.into(),
            width,
            height,
        }
    }
}

/// Presence-check failure for the validated idea-save path.
///
/// Messages are written for direct user-facing display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdeaValidationError {
    /// Photo captured but no text entered.
    MissingText,
    /// Text entered but no photo captured.
    MissingImage,
    /// Neither text nor photo provided.
    MissingBoth,
}

impl Display for IdeaValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingText => write!(f, "Please enter a gift idea."),
            Self::MissingImage => write!(f, "Please take a picture."),
            Self::MissingBoth => write!(f, "Please enter a gift idea and take a picture."),
        }
    }
}

impl Error for IdeaValidationError {}

/// Checks that both idea text and image are present.
///
/// Both inputs are trimmed before the emptiness check, so all-whitespace
/// values count as missing. The core performs no validation beyond this
/// presence check; dimensions and the image URI itself are trusted caller
/// input.
pub fn validate_idea_input(text: &str, image: &str) -> Result<(), IdeaValidationError> {
    match (text.trim().is_empty(), image.trim().is_empty()) {
        (true, true) => Err(IdeaValidationError::MissingBoth),
        (true, false) => Err(IdeaValidationError::MissingText),
        (false, true) => Err(IdeaValidationError::MissingImage),
        (false, false) => Ok(()),
    }
}
