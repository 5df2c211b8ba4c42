/// Evaluate `$body` with `$now` bound to the current instant in the
/// configured zone. The body is compiled once per zone type.
macro_rules! with_zone_now {
    ($zone:expr, |$now:ident| $body:expr) => {
        match $zone {
            $crate::config::DisplayZone::Local => {
                let $now = ::chrono::Local::now();
                $body
            }
            $crate::config::DisplayZone::Fixed(offset) => {
                let $now = ::chrono::Utc::now().with_timezone(&offset);
                $body
            }
        }
    };
}

pub mod config;
pub mod error;
pub mod state;
pub mod auth;
pub mod models;
pub mod store;
pub mod analytics;
pub mod filter;
pub mod export;
pub mod routes;
pub mod submission;
pub mod rate_limit;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::rate_limit::ContactRateLimiter;
use crate::state::{AppState, SharedState};
use crate::store::SharedStore;

pub fn build_app(store: SharedStore, config: Config) -> (Router, SharedState) {
    let cors = contact_cors(&config.cors_origins);
    let max_body_size = config.max_body_size;
    let contact_limiter = ContactRateLimiter::new(
        config.rate_limit,
        Duration::from_secs(config.rate_limit_window_secs),
    );

    let state: SharedState = Arc::new(AppState {
        store,
        config,
        contact_limiter,
    });

    let app = Router::new()
        .merge(routes::api_routes())
        .merge(routes::contact_routes().layer(cors))
        .route("/health", axum::routing::get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(max_body_size)),
        )
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state.clone());

    (app, state)
}

/// The public contact form may be posted from other origins.
fn contact_cors(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(86400))
}

/// Periodically drop rate limiter entries whose window has closed.
pub fn spawn_limiter_cleanup(state: SharedState) -> tokio::task::JoinHandle<()> {
    let period = state.contact_limiter.window().max(Duration::from_secs(60));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            state.contact_limiter.prune();
            tracing::debug!("Rate limiter holds {} entries", state.contact_limiter.len());
        }
    })
}

async fn health() -> &'static str {
    "ok"
}
