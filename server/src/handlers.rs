// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::store::ReminderStore;
use axum::{
    extract::{Json, Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{NaiveDate, Utc};
use common::{PayloadError, Reminder, ReminderPayload};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

const NOT_FOUND: &str = "Reminder not found";

/// Handler for creating (or replacing) a reminder.
pub async fn create_reminder(
    State(store): State<ReminderStore>,
    payload: Result<Json<ReminderPayload>, JsonRejection>, // Extracting the request body as JSON
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(payload) = payload?;
    debug!("Received request to create reminder: {:?}", payload.get("id"));

    let reminder = Reminder::from_create_payload(payload)?;
    let id = reminder.id.clone();
    store.set(&id, reminder);

    info!("Reminder {} created successfully.", id);
    Ok((StatusCode::CREATED, message("Reminder created successfully")))
}

/// Handler for fetching a single reminder.
pub async fn get_reminder(
    State(store): State<ReminderStore>,
    Path(id): Path<String>, // Extract reminder ID from the URL path
) -> Result<Json<Reminder>, AppError> {
    debug!("Looking up reminder {}", id);
    store
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::not_found(NOT_FOUND))
}

/// Handler for listing every reminder. Never fails, an empty store gives `[]`.
pub async fn list_reminders(State(store): State<ReminderStore>) -> Json<Vec<Reminder>> {
    let reminders = store.values();
    info!("Successfully retrieved {} reminders.", reminders.len());
    Json(reminders)
}

/// Handler for shallow-merging a partial payload onto an existing reminder.
pub async fn update_reminder(
    State(store): State<ReminderStore>,
    Path(id): Path<String>,
    payload: Result<Json<ReminderPayload>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    // An unknown ID is reported before the body is looked at.
    if !store.has(&id) {
        return Err(AppError::not_found(NOT_FOUND));
    }
    let Json(patch) = payload?;
    debug!(
        "Updating reminder {} with fields {:?}",
        id,
        patch.keys().collect::<Vec<_>>()
    );

    match store.update(&id, |current| current.merged(patch)) {
        Some(Ok(())) => {
            info!("Reminder {} updated successfully.", id);
            Ok(message("Reminder updated successfully"))
        }
        Some(Err(e)) => Err(e.into()),
        // Deleted between the check above and the update.
        None => Err(AppError::not_found(NOT_FOUND)),
    }
}

/// Handler for deleting a reminder by ID.
pub async fn delete_reminder(
    State(store): State<ReminderStore>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    debug!("Attempting to delete reminder {}", id);

    if store.delete(&id) {
        info!("Reminder {} deleted successfully.", id);
        Ok(message("Reminder deleted"))
    } else {
        Err(AppError::not_found(NOT_FOUND))
    }
}

/// Handler for `POST /reminders/{id}/mark-completed`.
pub async fn mark_completed(
    State(store): State<ReminderStore>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    set_completion(&store, &id, true)?;
    Ok(message("Reminder marked as completed"))
}

/// Handler for `POST /reminders/{id}/unmark-completed`.
pub async fn unmark_completed(
    State(store): State<ReminderStore>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    set_completion(&store, &id, false)?;
    Ok(message("Reminder unmarked as completed"))
}

fn set_completion(store: &ReminderStore, id: &str, is_completed: bool) -> Result<(), AppError> {
    store
        .update(id, |current| {
            Ok::<_, AppError>(Reminder {
                is_completed,
                ..current.clone()
            })
        })
        .ok_or_else(|| AppError::not_found(NOT_FOUND))??;
    info!("Reminder {} completion set to {}.", id, is_completed);
    Ok(())
}

// --- Filtered views ---
// Unlike `list_reminders`, these answer 404 when nothing matches.

/// Handler for listing completed reminders.
pub async fn list_completed(
    State(store): State<ReminderStore>,
) -> Result<Json<Vec<Reminder>>, AppError> {
    non_empty(store.filter(|r| r.is_completed), "No completed reminders")
}

/// Handler for listing reminders that are not completed yet.
pub async fn list_not_completed(
    State(store): State<ReminderStore>,
) -> Result<Json<Vec<Reminder>>, AppError> {
    non_empty(store.filter(|r| !r.is_completed), "No incomplete reminders")
}

/// Handler for listing reminders due today (UTC).
pub async fn list_due_today(
    State(store): State<ReminderStore>,
) -> Result<Json<Vec<Reminder>>, AppError> {
    let today = today_utc();
    debug!("Looking for reminders due on {}", today);
    non_empty(store.filter(|r| r.is_due_on(today)), "No reminders due today")
}

/// Current date on the server, taken in UTC.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

fn non_empty(
    reminders: Vec<Reminder>,
    empty_message: &str,
) -> Result<Json<Vec<Reminder>>, AppError> {
    if reminders.is_empty() {
        return Err(AppError::not_found(empty_message));
    }
    info!("Successfully retrieved {} reminders.", reminders.len());
    Ok(Json(reminders))
}

fn message(text: &str) -> Json<Value> {
    Json(json!({ "message": text }))
}

// --- Custom Error Handling ---

/// Our custom error type for the application.
#[derive(Debug)]
pub struct AppError {
    code: StatusCode,
    message: String,
}

impl AppError {
    fn new(code: StatusCode, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
        }
    }

    /// A creation payload is missing one of its required fields (400).
    pub fn validation(message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// The reminder, or every reminder of a filtered view, is missing (404).
    pub fn not_found(message: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl From<PayloadError> for AppError {
    fn from(err: PayloadError) -> Self {
        match err {
            PayloadError::MissingFields(fields) => {
                warn!("Validation failed: missing {}", fields.join(", "));
                Self::validation("Missing required fields")
            }
            PayloadError::Invalid(msg) => {
                warn!("Validation failed: {}", msg);
                Self::validation(&format!("Invalid reminder: {msg}"))
            }
        }
    }
}

/// Keeps axum's status for bodies it cannot parse, but answers with the
/// usual `{"error": ...}` shape.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), &rejection.body_text())
    }
}

/// Allows Axum to convert our `AppError` into an HTTP `Response`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        warn!(
            "Responding with error: status_code={}, message={}",
            self.code.as_u16(),
            self.message
        );
        (self.code, Json(json!({ "error": self.message }))).into_response()
    }
}
