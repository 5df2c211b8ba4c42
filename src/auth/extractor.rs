use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use subtle::ConstantTimeEq;

use crate::error::AppError;
use crate::state::SharedState;

/// Proof that the request carried the configured admin bearer token.
#[derive(Debug, Clone, Copy)]
pub struct AdminAuth;

impl FromRequestParts<SharedState> for AdminAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Unauthorized("Missing authentication token".to_string()))?;

        let matches: bool = bearer
            .token()
            .as_bytes()
            .ct_eq(state.config.admin_token.as_bytes())
            .into();

        if matches {
            Ok(AdminAuth)
        } else {
            Err(AppError::Unauthorized("Invalid token".to_string()))
        }
    }
}
