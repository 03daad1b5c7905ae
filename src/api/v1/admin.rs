//! Teacher approval workflow (admin only).

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::api::auth::Caller;
use crate::api::{ApiError, AppState};
use crate::backend::{ApprovalStatus, Backend, Gender, Profile, ProfileRepository, Role};

/// Profile response DTO
#[derive(Serialize, ToSchema)]
pub struct ProfileResponse {
    #[schema(example = "8c0e8e52-1d0a-4a43-bb9e-8f0a3f1d2c11")]
    pub id: String,
    #[schema(example = "teacher@example.com")]
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Role,
    pub approval_status: Option<ApprovalStatus>,
    pub gender: Option<Gender>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            email: p.email,
            full_name: p.full_name,
            role: p.role,
            approval_status: p.approval_status,
            gender: p.gender,
            created_at: p.created_at,
        }
    }
}

/// List teachers awaiting approval
#[utoipa::path(
    get,
    path = "/v1/admin/teachers/pending",
    tag = "admin",
    responses(
        (status = 200, description = "Pending teacher profiles, oldest first", body = Vec<ProfileResponse>),
        (status = 401, description = "Missing or invalid token", body = crate::api::ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = crate::api::ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state, caller))]
pub async fn list_pending_teachers<B: Backend>(
    State(state): State<AppState<B>>,
    caller: Caller,
) -> Result<Json<Vec<ProfileResponse>>, ApiError> {
    caller.require_role(&state, Role::Admin).await?;
    let pending = state
        .backend()
        .profiles()
        .list_teachers_by_status(ApprovalStatus::Pending)
        .await?;
    Ok(Json(pending.into_iter().map(ProfileResponse::from).collect()))
}

async fn set_teacher_status<B: Backend>(
    state: &AppState<B>,
    caller: &Caller,
    id: &str,
    status: ApprovalStatus,
) -> Result<Profile, ApiError> {
    caller.require_role(state, Role::Admin).await?;

    let profiles = state.backend().profiles();
    let target = profiles.get(id).await?;
    if target.role != Role::Teacher {
        return Err(ApiError::BadRequest(format!(
            "Profile '{}' is not a teacher (role: {})",
            id, target.role
        )));
    }

    let updated = profiles.set_approval_status(id, status).await?;
    info!(teacher_id = %id, %status, admin_id = %caller.user.id, "Teacher approval updated");
    Ok(updated)
}

/// Approve a teacher
#[utoipa::path(
    post,
    path = "/v1/admin/teachers/{id}/approve",
    tag = "admin",
    params(("id" = String, Path, description = "Teacher profile ID")),
    responses(
        (status = 200, description = "Teacher approved", body = ProfileResponse),
        (status = 400, description = "Profile is not a teacher", body = crate::api::ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = crate::api::ErrorResponse),
        (status = 404, description = "Profile not found", body = crate::api::ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state, caller))]
pub async fn approve_teacher<B: Backend>(
    State(state): State<AppState<B>>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = set_teacher_status(&state, &caller, &id, ApprovalStatus::Approved).await?;
    Ok(Json(profile.into()))
}

/// Reject a teacher
#[utoipa::path(
    post,
    path = "/v1/admin/teachers/{id}/reject",
    tag = "admin",
    params(("id" = String, Path, description = "Teacher profile ID")),
    responses(
        (status = 200, description = "Teacher rejected", body = ProfileResponse),
        (status = 400, description = "Profile is not a teacher", body = crate::api::ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = crate::api::ErrorResponse),
        (status = 404, description = "Profile not found", body = crate::api::ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state, caller))]
pub async fn reject_teacher<B: Backend>(
    State(state): State<AppState<B>>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = set_teacher_status(&state, &caller, &id, ApprovalStatus::Rejected).await?;
    Ok(Json(profile.into()))
}
