// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::handlers;
use crate::store::ReminderStore;
use axum::{
    Router,
    routing::{get, post},
};

/// Creates and configures the application router.
///
/// `/reminders/completed`, `/reminders/not-completed` and `/reminders/due-today`
/// are fixed paths and must keep winning over `/reminders/{id}`, otherwise
/// `GET /reminders/completed` would be looked up as the reminder "completed".
pub fn create_router(store: ReminderStore) -> Router {
    Router::new()
        // `GET /reminders` lists everything, `POST /reminders` creates or replaces
        .route(
            "/reminders",
            get(handlers::list_reminders).post(handlers::create_reminder),
        )
        // Filtered views, registered ahead of the `{id}` routes
        .route("/reminders/completed", get(handlers::list_completed))
        .route("/reminders/not-completed", get(handlers::list_not_completed))
        .route("/reminders/due-today", get(handlers::list_due_today))
        // Single reminder by ID
        .route(
            "/reminders/{id}",
            get(handlers::get_reminder)
                .patch(handlers::update_reminder)
                .delete(handlers::delete_reminder),
        )
        // Completion toggles
        .route(
            "/reminders/{id}/mark-completed",
            post(handlers::mark_completed),
        )
        .route(
            "/reminders/{id}/unmark-completed",
            post(handlers::unmark_completed),
        )
        // Adds the reminder store to the application state
        .with_state(store)
}
