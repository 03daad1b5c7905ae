//! Teacher directory and course catalog, filtered for the viewer.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

use crate::api::auth::Caller;
use crate::api::{ApiError, AppState};
use crate::backend::{Audience, Backend, CatalogRepository, Course, Gender, Teacher};
use crate::matching::{filter_courses, filter_teachers};

// =============================================================================
// DTOs (Data Transfer Objects)
// =============================================================================

/// Teacher response DTO
#[derive(Serialize, ToSchema)]
pub struct TeacherResponse {
    #[schema(example = "8c0e8e52-1d0a-4a43-bb9e-8f0a3f1d2c11")]
    pub id: String,
    #[schema(example = "Miriam Levi")]
    pub full_name: String,
    pub gender: Option<Gender>,
    /// Audience tags (men, women, children, adults)
    #[schema(value_type = Vec<String>, example = json!(["women", "children"]))]
    pub audiences: Vec<Audience>,
    #[schema(example = "Biblical Hebrew")]
    pub specialization: Option<String>,
    pub bio: Option<String>,
    #[schema(example = 35.0)]
    pub hourly_rate: Option<f64>,
    pub avatar_url: Option<String>,
}

impl From<Teacher> for TeacherResponse {
    fn from(t: Teacher) -> Self {
        Self {
            id: t.id,
            full_name: t.full_name,
            gender: t.gender,
            audiences: t.audiences,
            specialization: t.specialization,
            bio: t.bio,
            hourly_rate: t.hourly_rate,
            avatar_url: t.avatar_url,
        }
    }
}

/// Course response DTO
#[derive(Serialize, ToSchema)]
pub struct CourseResponse {
    #[schema(example = "3f1c2a9e-5d7b-4c11-9a51-0c2f6d1e8b77")]
    pub id: String,
    #[schema(example = "Intro to Biblical Hebrew")]
    pub title: String,
    pub description: Option<String>,
    pub teacher_id: Option<String>,
    #[schema(example = 49.0)]
    pub price: Option<f64>,
    pub is_free: bool,
    /// Audience tags; empty means everyone
    #[schema(value_type = Vec<String>, example = json!(["adults"]))]
    pub target_audience: Vec<Audience>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Course> for CourseResponse {
    fn from(c: Course) -> Self {
        Self {
            id: c.id,
            title: c.title,
            description: c.description,
            teacher_id: c.teacher_id,
            price: c.price,
            is_free: c.is_free,
            target_audience: c.audiences,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ViewerQuery {
    /// Viewer gender (male, female). Ignored when the caller's profile has one.
    #[param(example = "female")]
    pub gender: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Resolve the viewer's gender: profile first, then the query parameter.
async fn viewer_gender<B: Backend>(
    state: &AppState<B>,
    caller: Option<&Caller>,
    query: &ViewerQuery,
) -> Result<Option<Gender>, ApiError> {
    if let Some(caller) = caller
        && let Some(gender) = caller.profile(state).await?.and_then(|p| p.gender)
    {
        return Ok(Some(gender));
    }

    match query.gender.as_deref().map(str::trim).filter(|g| !g.is_empty()) {
        Some(g) => g.parse::<Gender>().map(Some).map_err(ApiError::BadRequest),
        None => Ok(None),
    }
}

/// List teachers visible to the viewer
#[utoipa::path(
    get,
    path = "/v1/teachers",
    tag = "catalog",
    params(ViewerQuery),
    responses(
        (status = 200, description = "Visible teachers", body = Vec<TeacherResponse>),
        (status = 400, description = "Invalid gender", body = crate::api::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::api::ErrorResponse)
    )
)]
#[instrument(skip(state, caller))]
pub async fn list_teachers<B: Backend>(
    State(state): State<AppState<B>>,
    caller: Option<Caller>,
    Query(query): Query<ViewerQuery>,
) -> Result<Json<Vec<TeacherResponse>>, ApiError> {
    let gender = viewer_gender(&state, caller.as_ref(), &query).await?;
    let teachers = state.backend().catalog().list_teachers().await?;

    Ok(Json(
        filter_teachers(teachers, gender)
            .into_iter()
            .map(TeacherResponse::from)
            .collect(),
    ))
}

/// List published courses visible to the viewer
#[utoipa::path(
    get,
    path = "/v1/courses",
    tag = "catalog",
    params(ViewerQuery),
    responses(
        (status = 200, description = "Visible courses", body = Vec<CourseResponse>),
        (status = 400, description = "Invalid gender", body = crate::api::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::api::ErrorResponse)
    )
)]
#[instrument(skip(state, caller))]
pub async fn list_courses<B: Backend>(
    State(state): State<AppState<B>>,
    caller: Option<Caller>,
    Query(query): Query<ViewerQuery>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let gender = viewer_gender(&state, caller.as_ref(), &query).await?;
    let courses = state.backend().catalog().list_courses().await?;

    Ok(Json(
        filter_courses(courses, gender)
            .into_iter()
            .map(CourseResponse::from)
            .collect(),
    ))
}
