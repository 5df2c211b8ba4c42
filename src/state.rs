use std::sync::Arc;

use crate::config::Config;
use crate::rate_limit::ContactRateLimiter;
use crate::store::SharedStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub store: SharedStore,
    pub config: Config,
    pub contact_limiter: ContactRateLimiter,
}
