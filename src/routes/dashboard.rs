use std::convert::Infallible;

use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures_util::stream::{self, Stream};
use serde::Serialize;

use crate::analytics::{self, DashboardReport};
use crate::auth::AdminAuth;
use crate::error::AppError;
use crate::filter::{self, Search, TimeWindow};
use crate::models::Snapshot;
use crate::state::{AppState, SharedState};

use super::ViewParams;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub version: u64,
    #[serde(flatten)]
    pub report: DashboardReport,
}

/// Run the full pipeline for one snapshot: filtered view, then aggregates.
pub fn render(
    state: &AppState,
    snapshot: &Snapshot,
    window: TimeWindow,
    search: &Search,
) -> DashboardResponse {
    let report = with_zone_now!(state.config.zone, |now| {
        let view = filter::apply(&snapshot.submissions, window, search, &now);
        analytics::build(&view, &now)
    });

    DashboardResponse {
        version: snapshot.version,
        report,
    }
}

pub async fn report(
    _admin: AdminAuth,
    State(state): State<SharedState>,
    Query(params): Query<ViewParams>,
) -> Result<Json<DashboardResponse>, AppError> {
    let window = params.window()?;
    let snapshot = state.store.snapshot().await?;
    Ok(Json(render(&state, &snapshot, window, &params.search())))
}

/// Server-sent `update` events: one on connect, then one per new snapshot.
pub async fn stream(
    _admin: AdminAuth,
    State(state): State<SharedState>,
    Query(params): Query<ViewParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let window = params.window()?;
    let search = params.search();
    let rx = state.store.subscribe();

    let updates = stream::unfold((rx, true), move |(mut rx, first)| {
        let state = state.clone();
        let search = search.clone();
        async move {
            if !first && rx.changed().await.is_err() {
                return None;
            }
            let snapshot = rx.borrow_and_update().clone();
            let response = render(&state, &snapshot, window, &search);
            let event = Event::default()
                .event("update")
                .json_data(&response)
                .unwrap_or_else(|e| {
                    tracing::error!("Failed to encode dashboard update: {e}");
                    Event::default().event("error")
                });
            Some((Ok(event), (rx, false)))
        }
    });

    Ok(Sse::new(updates).keep_alive(KeepAlive::default()))
}
