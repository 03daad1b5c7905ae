use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

use crate::access::{AccessDecision, evaluate};
use crate::api::auth::Caller;
use crate::api::{ApiError, AppState};
use crate::backend::{Backend, Role};

#[derive(Debug, Deserialize, IntoParams)]
pub struct AccessQuery {
    /// Role the route requires (student, teacher, admin)
    #[param(example = "teacher")]
    pub role: String,
}

/// Gate decision for the caller
#[derive(Serialize, ToSchema)]
pub struct AccessResponse {
    pub granted: bool,
    /// granted, unauthenticated, role_mismatch, approval_pending or approval_rejected
    #[schema(example = "approval_pending")]
    pub decision: String,
    /// Where the client should send the user instead
    #[schema(example = "/pending-approval")]
    pub redirect: Option<String>,
}

impl From<AccessDecision> for AccessResponse {
    fn from(d: AccessDecision) -> Self {
        Self {
            granted: d.is_granted(),
            decision: d.name().to_string(),
            redirect: d.redirect().map(str::to_string),
        }
    }
}

/// Check whether the caller may enter a route requiring `role`
///
/// Anonymous callers get an `unauthenticated` decision rather than a 401.
#[utoipa::path(
    get,
    path = "/v1/access",
    tag = "access",
    params(AccessQuery),
    responses(
        (status = 200, description = "Gate decision", body = AccessResponse),
        (status = 400, description = "Unknown role", body = crate::api::ErrorResponse),
        (status = 401, description = "Invalid token", body = crate::api::ErrorResponse)
    )
)]
#[instrument(skip(state, caller))]
pub async fn check_access<B: Backend>(
    State(state): State<AppState<B>>,
    caller: Option<Caller>,
    Query(query): Query<AccessQuery>,
) -> Result<Json<AccessResponse>, ApiError> {
    let required: Role = query.role.parse().map_err(ApiError::BadRequest)?;
    let profile = match &caller {
        Some(caller) => caller.profile(&state).await?,
        None => None,
    };
    Ok(Json(evaluate(required, profile.as_ref()).into()))
}
