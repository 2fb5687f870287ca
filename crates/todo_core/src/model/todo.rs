//! Todo domain model.
//!
//! # Responsibility
//! - Define the canonical todo record stored in the JSON data file.
//! - Own title normalization and completion state transitions.
//!
//! # Invariants
//! - `title` is trimmed and never empty.
//! - `completed_at` is `Some` iff `completed` is true.
//! - `created_at` is captured once at construction and never rewritten.
//!
//! # See also
//! - `service::todo_store` for ID assignment and renumbering rules.

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Positional identifier of a todo inside the store.
///
/// Not stable across deletions: the store relabels survivors `1..=N`.
pub type TodoId = u32;

/// Wire format for `created_at` / `completed_at` (local wall-clock time).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Importance label attached to every todo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TodoValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(TodoValidationError::InvalidPriority(value.to_string())),
        }
    }
}

/// Validation failures for todo construction, edits and loaded data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    /// Title is empty or whitespace-only after trimming.
    EmptyTitle,
    /// IDs start at 1.
    ZeroId,
    /// Priority text is not one of `low|medium|high`.
    InvalidPriority(String),
    /// `completed` and `completed_at` disagree.
    CompletionMismatch { id: TodoId },
    /// The largest stored ID leaves no room for another one.
    IdSpaceExhausted,
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "todo title cannot be empty"),
            Self::ZeroId => write!(f, "todo id must be a positive integer"),
            Self::InvalidPriority(value) => write!(
                f,
                "invalid priority `{value}`; expected low|medium|high"
            ),
            Self::CompletionMismatch { id } => write!(
                f,
                "todo {id}: completed_at must be set iff completed is true"
            ),
            Self::IdSpaceExhausted => write!(f, "no todo id left above {}", TodoId::MAX),
        }
    }
}

impl Error for TodoValidationError {}

/// One todo record, serialized with the exact field order of the data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    /// Files written before descriptions were mandatory may omit this field.
    #[serde(default)]
    pub description: String,
    /// Files written before priorities existed read back as `medium`.
    #[serde(default)]
    pub priority: Priority,
    pub completed: bool,
    #[serde(with = "local_timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(default, with = "optional_local_timestamp")]
    pub completed_at: Option<NaiveDateTime>,
}

impl Todo {
    /// Builds a pending todo with trimmed text fields.
    ///
    /// # Errors
    /// - `ZeroId` when `id == 0`.
    /// - `EmptyTitle` when `title` trims to nothing.
    pub fn new(
        id: TodoId,
        title: &str,
        description: &str,
        priority: Priority,
        created_at: NaiveDateTime,
    ) -> Result<Self, TodoValidationError> {
        if id == 0 {
            return Err(TodoValidationError::ZeroId);
        }

        Ok(Self {
            id,
            title: normalize_title(title)?,
            description: description.trim().to_string(),
            priority,
            completed: false,
            created_at,
            completed_at: None,
        })
    }

    /// Marks the todo as done, stamping `completed_at` with `at`.
    ///
    /// Completing an already completed todo refreshes the stamp.
    pub fn mark_completed(&mut self, at: NaiveDateTime) {
        self.completed = true;
        self.completed_at = Some(at);
    }

    /// Returns the todo to pending and clears `completed_at`.
    pub fn mark_pending(&mut self) {
        self.completed = false;
        self.completed_at = None;
    }

    /// Brings `completed_at` back in line with `completed` for records edited
    /// by hand. A completed todo without a stamp takes `created_at`; a pending
    /// one drops its stamp. Returns whether anything changed.
    pub fn repair_completion(&mut self) -> bool {
        match (self.completed, self.completed_at) {
            (true, None) => {
                self.completed_at = Some(self.created_at);
                true
            }
            (false, Some(_)) => {
                self.completed_at = None;
                true
            }
            _ => false,
        }
    }

    /// Checks record-level invariants, used on data read back from disk.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        if self.id == 0 {
            return Err(TodoValidationError::ZeroId);
        }
        if self.title.trim().is_empty() {
            return Err(TodoValidationError::EmptyTitle);
        }
        if self.completed != self.completed_at.is_some() {
            return Err(TodoValidationError::CompletionMismatch { id: self.id });
        }
        Ok(())
    }
}

/// Trims a title and rejects empty results.
pub fn normalize_title(raw: &str) -> Result<String, TodoValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TodoValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

/// Current local time truncated to whole seconds, matching wire precision.
pub fn local_now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Renders a timestamp in the data file format.
pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a timestamp written in the data file format.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
}

mod local_timestamp {
    use super::{format_timestamp, parse_timestamp};
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_timestamp(&text)
            .map_err(|err| serde::de::Error::custom(format!("invalid timestamp `{text}`: {err}")))
    }
}

mod optional_local_timestamp {
    use super::{format_timestamp, parse_timestamp};
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(at) => serializer.serialize_some(&format_timestamp(at)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| {
                parse_timestamp(&text).map_err(|err| {
                    serde::de::Error::custom(format!("invalid timestamp `{text}`: {err}"))
                })
            })
            .transpose()
    }
}
