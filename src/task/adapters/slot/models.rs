//! Serialized task records held in the durable slot.

use crate::task::domain::{
    PersistedTaskData, Subtask, SubtaskId, SubtaskList, Task, TaskId, TaskStatus,
};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Namespace for identifiers derived from stored ids that are not UUIDs.
const LEGACY_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6b1f_4c2e_9a7d_5e30_8c41_d2f9_07a3_b518);

/// Stored identifier, kept opaque until it is mapped onto a UUID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredId {
    /// String identifier, normally a hyphenated UUID.
    Text(String),
    /// Numeric identifier such as a millisecond timestamp.
    Number(Number),
}

impl StoredId {
    /// Maps the stored identifier onto a UUID.
    ///
    /// UUID strings are taken as they are. Anything else resolves to a
    /// name-based UUID, so the same stored id always yields the same value.
    #[must_use]
    pub fn to_uuid(&self) -> Uuid {
        match self {
            Self::Text(text) => {
                Uuid::parse_str(text.trim()).unwrap_or_else(|_| legacy_uuid(text))
            }
            Self::Number(number) => legacy_uuid(&number.to_string()),
        }
    }
}

impl From<Uuid> for StoredId {
    fn from(uuid: Uuid) -> Self {
        Self::Text(uuid.to_string())
    }
}

fn legacy_uuid(raw: &str) -> Uuid {
    Uuid::new_v5(&LEGACY_ID_NAMESPACE, raw.trim().as_bytes())
}

/// Stored form of a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTask {
    /// Task identifier; missing reads as a fresh one.
    #[serde(default)]
    pub id: Option<StoredId>,
    /// Task title; missing reads as empty.
    #[serde(default)]
    pub title: Option<String>,
    /// Task description; missing or `null` reads as empty.
    #[serde(default)]
    pub description: Option<String>,
    /// Task status; missing or unknown reads as `pending`.
    #[serde(default)]
    pub status: Option<String>,
    /// Due date as `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub due_date: String,
    /// Creation timestamp as RFC 3339, or `YYYY-MM-DD` for midnight UTC.
    pub created_at: String,
    /// Subtasks in display order. Malformed entries are skipped on read.
    #[serde(deserialize_with = "lenient_subtasks")]
    pub subtasks: Vec<StoredSubtask>,
}

/// Stored form of a subtask.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSubtask {
    /// Subtask identifier; missing reads as a fresh one.
    #[serde(default)]
    pub id: Option<StoredId>,
    /// Display text; missing reads as empty.
    #[serde(default)]
    pub text: Option<String>,
    /// Completion flag; missing reads as `false`.
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Reasons a stored entry is skipped while loading.
#[derive(Debug, Error)]
pub enum StoredTaskError {
    /// The entry is not an object with `dueDate`, `createdAt`, and a
    /// `subtasks` array.
    #[error("entry lacks dueDate, createdAt, or a subtasks array")]
    MissingFields,

    /// The entry does not match the stored task shape.
    #[error("entry could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    /// A date field could not be parsed.
    #[error("invalid {field} value '{value}'")]
    InvalidDate {
        /// Offending field name.
        field: &'static str,
        /// Raw stored value.
        value: String,
    },
}

impl From<&Task> for StoredTask {
    fn from(task: &Task) -> Self {
        Self {
            id: Some(task.id().into_inner().into()),
            title: Some(task.title().to_owned()),
            description: Some(task.description().to_owned()),
            status: Some(task.status().as_str().to_owned()),
            due_date: task.due_date().format(DATE_FORMAT).to_string(),
            created_at: task
                .created_at()
                .to_rfc3339_opts(SecondsFormat::AutoSi, true),
            subtasks: task.subtasks().iter().map(StoredSubtask::from).collect(),
        }
    }
}

impl From<&Subtask> for StoredSubtask {
    fn from(subtask: &Subtask) -> Self {
        Self {
            id: Some(subtask.id().into_inner().into()),
            text: Some(subtask.text().to_owned()),
            completed: Some(subtask.is_completed()),
        }
    }
}

fn lenient_subtasks<'de, D>(deserializer: D) -> Result<Vec<StoredSubtask>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<Value>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            serde_json::from_value(entry)
                .inspect_err(|err| debug!(index, error = %err, "dropping saved subtask entry"))
                .ok()
        })
        .collect())
}

/// Validates and re-hydrates one stored entry.
///
/// # Errors
///
/// Returns [`StoredTaskError`] when the entry lacks a required field, has
/// the wrong shape, or carries a date that cannot be parsed.
pub fn entry_to_task(entry: Value) -> Result<Task, StoredTaskError> {
    if !has_required_fields(&entry) {
        return Err(StoredTaskError::MissingFields);
    }
    let stored: StoredTask = serde_json::from_value(entry)?;
    stored_to_task(stored)
}

fn has_required_fields(entry: &Value) -> bool {
    entry.as_object().is_some_and(|object| {
        object.contains_key("dueDate")
            && object.contains_key("createdAt")
            && object.get("subtasks").is_some_and(Value::is_array)
    })
}

fn stored_to_task(stored: StoredTask) -> Result<Task, StoredTaskError> {
    let StoredTask {
        id,
        title,
        description,
        status,
        due_date,
        created_at,
        subtasks,
    } = stored;

    let parsed_due_date = parse_due_date(&due_date).ok_or(StoredTaskError::InvalidDate {
        field: "dueDate",
        value: due_date,
    })?;
    let parsed_created_at =
        parse_created_at(&created_at).ok_or(StoredTaskError::InvalidDate {
            field: "createdAt",
            value: created_at,
        })?;

    let subtask_list = SubtaskList::from(
        subtasks
            .into_iter()
            .map(|subtask| {
                Subtask::from_persisted(
                    subtask
                        .id
                        .map_or_else(SubtaskId::new, |id| SubtaskId::from_uuid(id.to_uuid())),
                    subtask.text.unwrap_or_default(),
                    subtask.completed.unwrap_or(false),
                )
            })
            .collect::<Vec<_>>(),
    );

    Ok(Task::from_persisted(PersistedTaskData {
        id: id.map_or_else(TaskId::new, |stored_id| TaskId::from_uuid(stored_id.to_uuid())),
        title: title.unwrap_or_default(),
        description: description.unwrap_or_default(),
        status: status.as_deref().map(parse_status).unwrap_or_default(),
        due_date: parsed_due_date,
        created_at: parsed_created_at,
        subtasks: subtask_list,
    }))
}

fn parse_status(raw: &str) -> TaskStatus {
    TaskStatus::try_from(raw).unwrap_or_else(|err| {
        debug!(error = %err, "reading unknown status as pending");
        TaskStatus::default()
    })
}

/// Parses a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// Timestamps resolve to their UTC calendar day.
#[must_use]
pub fn parse_due_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|timestamp| timestamp.with_timezone(&Utc).date_naive())
        })
}

/// Parses a UTC timestamp from RFC 3339 or a bare `YYYY-MM-DD` date.
#[must_use]
pub fn parse_created_at(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|midnight| midnight.and_utc())
        })
}
