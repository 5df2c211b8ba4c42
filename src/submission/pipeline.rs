use std::net::IpAddr;

use axum::http::HeaderMap;
use chrono::Utc;
use serde_json::Value;

use crate::error::AppError;
use crate::models::Submission;
use crate::state::SharedState;

use super::metadata;
use super::validation::{self, ContactForm};

/// Rate-limit, validate and store one contact form submission.
pub async fn run(
    state: &SharedState,
    headers: &HeaderMap,
    peer_addr: Option<IpAddr>,
    raw_data: Value,
) -> Result<Submission, AppError> {
    let ip = metadata::client_ip(headers, peer_addr, &state.config.trusted_proxies);

    state.contact_limiter.check(ip).map_err(|retry_after| {
        tracing::info!("Rate limited contact submission from {ip}");
        AppError::RateLimited(retry_after)
    })?;

    let form = ContactForm::from_value(raw_data).map_err(AppError::BadRequest)?;
    let valid = validation::validate(&form).map_err(|errors| {
        tracing::debug!("Rejected contact submission: {errors}");
        AppError::Validation(errors)
    })?;

    let submission = state
        .store
        .push(valid.into_submission(Utc::now().timestamp_millis()))
        .await?;

    tracing::info!("Saved submission {}", submission.id);
    Ok(submission)
}
