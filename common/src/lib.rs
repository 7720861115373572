// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields a creation payload must carry, under their JSON names.
pub const REQUIRED_FIELDS: [&str; 3] = ["id", "title", "dueDate"];

/// Format used for `dueDate` and for "today" when looking for due reminders.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A raw JSON object received from a client, used for both creation and
/// partial updates. Keys are kept exactly as sent.
pub type ReminderPayload = Map<String, Value>;

#[allow(clippy::doc_overindented_list_items)]
/// Represents a reminder held by the server.
///
/// Derivation attributes (derive):
/// - `Serialize`, `Deserialize`: Allows conversion to/from JSON, using the
///    camelCase names clients send (`dueDate`, `isCompleted`).
/// - `Debug`, `Clone`, `PartialEq`: Handy for logging, handing out copies
///    from the store and comparing in tests.
///
/// Any field a client sends beyond the four known ones lands in `extra` and
/// is written back out verbatim.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: String,

    pub title: String,

    // Kept as the raw string the client sent; it is only ever compared
    // against today's date formatted as YYYY-MM-DD.
    #[serde(rename = "dueDate")]
    pub due_date: String,

    #[serde(rename = "isCompleted", default)]
    pub is_completed: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Why a payload could not be turned into a `Reminder`.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadError {
    /// One or more of `REQUIRED_FIELDS` is absent or falsy.
    MissingFields(Vec<&'static str>),

    /// The fields are present but do not fit the record, e.g. a numeric
    /// `title` or an `isCompleted` that is not a boolean.
    Invalid(String),
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadError::MissingFields(fields) => {
                write!(f, "missing required fields: {}", fields.join(", "))
            }
            PayloadError::Invalid(msg) => write!(f, "invalid reminder: {msg}"),
        }
    }
}

impl std::error::Error for PayloadError {}

impl Reminder {
    /// Builds a new reminder from a creation payload.
    ///
    /// The payload must carry a truthy `id`, `title` and `dueDate`.
    /// `isCompleted` is always reset to `false`, whatever the client sent.
    pub fn from_create_payload(mut payload: ReminderPayload) -> Result<Self, PayloadError> {
        let missing = missing_required_fields(&payload);
        if !missing.is_empty() {
            return Err(PayloadError::MissingFields(missing));
        }

        payload.insert("isCompleted".to_string(), Value::Bool(false));
        from_fields(payload)
    }

    /// Returns a copy of this reminder with `patch` shallow-merged on top.
    ///
    /// Keys in the patch win over existing ones, including `isCompleted`.
    /// The `id` never changes: it is the key the reminder is stored under.
    pub fn merged(&self, patch: ReminderPayload) -> Result<Self, PayloadError> {
        let mut fields = self.to_fields();
        fields.extend(patch);
        fields.insert("id".to_string(), Value::String(self.id.clone()));
        from_fields(fields)
    }

    /// Flattens the reminder back into a single JSON object.
    pub fn to_fields(&self) -> ReminderPayload {
        let mut fields = self.extra.clone();
        fields.insert("id".to_string(), Value::String(self.id.clone()));
        fields.insert("title".to_string(), Value::String(self.title.clone()));
        fields.insert("dueDate".to_string(), Value::String(self.due_date.clone()));
        fields.insert("isCompleted".to_string(), Value::Bool(self.is_completed));
        fields
    }

    /// True when `dueDate` is exactly `date` written as YYYY-MM-DD.
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        self.due_date == date.format(DUE_DATE_FORMAT).to_string()
    }
}

fn from_fields(fields: ReminderPayload) -> Result<Reminder, PayloadError> {
    if let Some(field) = REQUIRED_FIELDS
        .iter()
        .find(|field| !matches!(fields.get(**field), Some(Value::String(_))))
    {
        return Err(PayloadError::Invalid(format!("{field} must be a string")));
    }
    serde_json::from_value(Value::Object(fields)).map_err(|e| PayloadError::Invalid(e.to_string()))
}

/// Lists the required fields that are absent or falsy in `payload`.
pub fn missing_required_fields(payload: &ReminderPayload) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !payload.get(*field).is_some_and(is_truthy))
        .collect()
}

/// Loose truthiness: `null`, `false`, zero and the empty string are falsy,
/// everything else (including empty arrays and objects) is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
