//! Donation handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::api::auth::Caller;
use crate::api::{ApiError, AppState};
use crate::backend::{Backend, Donation, DonationRepository, NewDonation};

// =============================================================================
// DTOs (Data Transfer Objects)
// =============================================================================

#[derive(Serialize, ToSchema)]
pub struct DonationResponse {
    pub id: String,
    pub donor_id: Option<String>,
    pub teacher_id: Option<String>,
    #[schema(example = "Anonymous")]
    pub donor_name: Option<String>,
    #[schema(example = 18.0)]
    pub amount: f64,
    #[schema(example = "usd")]
    pub currency: String,
    pub message: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Donation> for DonationResponse {
    fn from(d: Donation) -> Self {
        Self {
            id: d.id,
            donor_id: d.donor_id,
            teacher_id: d.teacher_id,
            donor_name: d.donor_name,
            amount: d.amount,
            currency: d.currency,
            message: d.message,
            created_at: d.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDonationRequest {
    #[schema(example = "8c0e8e52-1d0a-4a43-bb9e-8f0a3f1d2c11")]
    pub teacher_id: String,
    #[schema(example = 18.0)]
    pub amount: f64,
    /// Defaults to the configured payment currency
    #[schema(example = "usd")]
    pub currency: Option<String>,
    #[schema(example = "Anonymous")]
    pub donor_name: Option<String>,
    #[schema(example = "Thank you for the lessons!")]
    pub message: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct TeacherDonations {
    pub items: Vec<DonationResponse>,
    /// Sum of all donation amounts
    #[schema(example = 54.0)]
    pub total: f64,
    pub count: usize,
}

// =============================================================================
// Handlers
// =============================================================================

/// Record a donation to a teacher
///
/// Anonymous donations are accepted; a signed-in caller is recorded as the donor.
#[utoipa::path(
    post,
    path = "/v1/donations",
    tag = "donations",
    request_body = CreateDonationRequest,
    responses(
        (status = 201, description = "Donation recorded", body = DonationResponse),
        (status = 400, description = "Invalid amount", body = crate::api::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::api::ErrorResponse)
    )
)]
#[instrument(skip(state, caller))]
pub async fn create_donation<B: Backend>(
    State(state): State<AppState<B>>,
    caller: Option<Caller>,
    Json(req): Json<CreateDonationRequest>,
) -> Result<(StatusCode, Json<DonationResponse>), ApiError> {
    if !req.amount.is_finite() || req.amount <= 0.0 {
        return Err(ApiError::BadRequest(
            "Donation amount must be positive".to_string(),
        ));
    }
    if req.teacher_id.trim().is_empty() {
        return Err(ApiError::BadRequest("teacher_id is required".to_string()));
    }

    let donation = NewDonation {
        donor_id: caller.map(|c| c.user.id),
        teacher_id: Some(req.teacher_id),
        donor_name: req.donor_name.filter(|n| !n.trim().is_empty()),
        amount: req.amount,
        currency: req
            .currency
            .map(|c| c.to_ascii_lowercase())
            .unwrap_or_else(|| state.settings().stripe.currency.clone()),
        message: req.message.filter(|m| !m.trim().is_empty()),
    };

    let created = state.backend().donations().create(&donation).await?;
    info!(donation_id = %created.id, amount = created.amount, "Donation recorded");
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List donations received by a teacher, newest first
#[utoipa::path(
    get,
    path = "/v1/teachers/{id}/donations",
    tag = "donations",
    params(("id" = String, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Donations and their total", body = TeacherDonations),
        (status = 500, description = "Internal server error", body = crate::api::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_teacher_donations<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<Json<TeacherDonations>, ApiError> {
    let donations = state.backend().donations().list_for_teacher(&id).await?;
    let total = donations.iter().map(|d| d.amount).sum();
    let count = donations.len();

    Ok(Json(TeacherDonations {
        items: donations.into_iter().map(DonationResponse::from).collect(),
        total,
        count,
    }))
}
