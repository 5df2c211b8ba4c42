pub mod contact;
pub mod dashboard;
pub mod submissions;

use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use crate::error::AppError;
use crate::filter::{Search, TimeWindow};
use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Submissions
        .route("/api/v1/submissions", get(submissions::list))
        .route("/api/v1/submissions/delete", post(submissions::batch_delete))
        .route("/api/v1/submissions/export", get(submissions::export))
        .route(
            "/api/v1/submissions/{id}",
            get(submissions::get).delete(submissions::delete),
        )
        // Dashboard
        .route("/api/v1/dashboard", get(dashboard::report))
        .route("/api/v1/dashboard/stream", get(dashboard::stream))
}

pub fn contact_routes() -> Router<SharedState> {
    Router::new().route("/api/v1/contact", post(contact::submit))
}

/// Time window and search term shared by every view of the submissions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewParams {
    pub window: Option<String>,
    pub search: Option<String>,
}

impl ViewParams {
    /// An absent or empty `window` means all time.
    pub fn window(&self) -> Result<TimeWindow, AppError> {
        match self.window.as_deref() {
            None | Some("") => Ok(TimeWindow::All),
            Some(name) => name.parse().map_err(AppError::BadRequest),
        }
    }

    pub fn search(&self) -> Search {
        Search::new(self.search.as_deref().unwrap_or(""))
    }
}
