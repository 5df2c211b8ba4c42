use std::collections::HashSet;

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::future::join_all;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::AdminAuth;
use crate::error::AppError;
use crate::export::{self, ExportFormat};
use crate::filter::{self, SortOrder};
use crate::models::Submission;
use crate::state::SharedState;

use super::ViewParams;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub window: Option<String>,
    pub search: Option<String>,
    pub sort: Option<SortOrder>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ExportParams {
    pub format: Option<ExportFormat>,
    pub window: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchDeleteRequest {
    pub ids: Vec<Uuid>,
}

pub async fn list(
    _admin: AdminAuth,
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let snapshot = state.store.snapshot().await?;
    let view_params = ViewParams {
        window: params.window,
        search: params.search,
    };
    let window = view_params.window()?;
    let search = view_params.search();

    let mut view = with_zone_now!(state.config.zone, |now| filter::apply(
        &snapshot.submissions,
        window,
        &search,
        &now
    ));
    filter::sort(&mut view, params.sort.unwrap_or_default());
    let page = filter::paginate(&view, params.page, params.per_page);

    Ok(Json(json!({
        "submissions": page.items,
        "total": page.total,
        "page": page.page,
        "per_page": page.per_page,
        "total_pages": page.total_pages,
        "version": snapshot.version,
    })))
}

pub async fn get(
    _admin: AdminAuth,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Submission>, AppError> {
    let snapshot = state.store.snapshot().await?;
    let submission = snapshot
        .get(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))?;
    Ok(Json(submission))
}

pub async fn delete(
    _admin: AdminAuth,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !state.store.delete(id).await? {
        return Err(AppError::NotFound("Submission not found".to_string()));
    }

    tracing::info!("Submission {id} deleted");
    Ok(Json(json!({ "deleted": id })))
}

/// Delete several submissions concurrently. Each id succeeds or fails on its
/// own; failures are logged and reported, never rolled back or retried.
pub async fn batch_delete(
    _admin: AdminAuth,
    State(state): State<SharedState>,
    Json(req): Json<BatchDeleteRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if req.ids.is_empty() {
        return Err(AppError::BadRequest(
            "Please select submissions to delete".to_string(),
        ));
    }

    // One delete per distinct id, so a repeated id cannot report itself missing
    let mut seen = HashSet::new();
    let ids: Vec<Uuid> = req.ids.into_iter().filter(|id| seen.insert(*id)).collect();

    let store = &state.store;
    let outcomes = join_all(
        ids.iter()
            .map(|&id| async move { (id, store.delete(id).await) }),
    )
    .await;

    let mut deleted = 0usize;
    let mut not_found = Vec::new();
    let mut failed = Vec::new();
    for (id, outcome) in outcomes {
        match outcome {
            Ok(true) => deleted += 1,
            Ok(false) => not_found.push(id),
            Err(e) => {
                tracing::error!("Error deleting submission {id}: {e}");
                failed.push(id);
            }
        }
    }

    tracing::info!(
        "Batch delete: {deleted} deleted, {} not found, {} failed",
        not_found.len(),
        failed.len()
    );

    Ok(Json(json!({
        "deleted": deleted,
        "not_found": not_found,
        "failed": failed,
    })))
}

pub async fn export(
    _admin: AdminAuth,
    State(state): State<SharedState>,
    Query(params): Query<ExportParams>,
) -> Result<Response, AppError> {
    let snapshot = state.store.snapshot().await?;
    let format = params.format.unwrap_or_default();
    let view_params = ViewParams {
        window: params.window,
        search: params.search,
    };
    let window = view_params.window()?;
    let search = view_params.search();

    let body = with_zone_now!(state.config.zone, |now| {
        let view = filter::apply(&snapshot.submissions, window, &search, &now);
        match format {
            ExportFormat::Csv => Ok(export::to_csv(&view, &now.timezone())),
            ExportFormat::Json => export::to_json(&view),
        }
    })
    .map_err(|e| AppError::Internal(format!("Failed to serialize export: {e}")))?;

    tracing::info!("Exported submissions as {}", format.filename());

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", format.filename()),
            ),
        ],
        body,
    )
        .into_response())
}
