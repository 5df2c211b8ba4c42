use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::json;

use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::{parser, pipeline};

pub async fn submit(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let raw_data = parser::parse(&headers, body)
        .await
        .map_err(AppError::BadRequest)?;

    let submission = pipeline::run(&state, &headers, Some(addr.ip()), raw_data).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "created",
            "id": submission.id,
            "message": "Thank you! Your message has been saved.",
        })),
    ))
}
