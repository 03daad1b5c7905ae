//! Payment functions: `create-payment`, `verify-payment`, `send-payment-email`.
//!
//! Request and response bodies use camelCase keys, matching what the web
//! client sends when invoking backend functions.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::api::auth::Caller;
use crate::api::{ApiError, AppState};
use crate::backend::{Backend, EnrollmentTarget, ItemKind};
use crate::payments::{
    CheckoutOutcome, Delivery, PaymentEmailRequest, compose_payment_email, start_checkout,
    verify_checkout,
};

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    /// Course or live class ID
    #[schema(example = "3f1c2a9e-5d7b-4c11-9a51-0c2f6d1e8b77")]
    pub course_id: String,
    /// Treat `courseId` as a live class ID
    #[serde(default)]
    pub is_live_class: bool,
}

/// Either the item was free and the caller is enrolled, or a checkout URL.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum CreatePaymentResponse {
    Free {
        #[schema(example = true)]
        free: bool,
    },
    Checkout {
        #[schema(example = "https://checkout.stripe.com/c/pay/cs_test_a1")]
        url: String,
    },
}

impl From<CheckoutOutcome> for CreatePaymentResponse {
    fn from(outcome: CheckoutOutcome) -> Self {
        match outcome {
            CheckoutOutcome::Free { free } => CreatePaymentResponse::Free { free },
            CheckoutOutcome::Redirect { url } => CreatePaymentResponse::Checkout { url },
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    #[schema(example = "cs_test_a1")]
    pub session_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyPaymentResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendPaymentEmailRequest {
    #[schema(example = "student@example.com")]
    pub student_email: String,
    #[schema(example = "Intro to Biblical Hebrew")]
    pub course_title: String,
    #[schema(example = 49.0)]
    pub amount: f64,
    #[schema(example = "pr-1042")]
    pub payment_request_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SendPaymentEmailResponse {
    pub success: bool,
    #[schema(example = "Payment email sent")]
    pub message: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Site origin for redirect URLs: the request's `Origin`, else the configured site URL.
fn request_origin<B: Backend>(headers: &HeaderMap, state: &AppState<B>) -> String {
    headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && *v != "null")
        .map(str::to_string)
        .unwrap_or_else(|| state.settings().site_url.clone())
}

/// Start checkout for a course or live class
///
/// Free items enroll the caller immediately; paid items return the hosted
/// checkout URL and record a pending payment.
#[utoipa::path(
    post,
    path = "/create-payment",
    tag = "functions",
    request_body = CreatePaymentRequest,
    responses(
        (status = 200, description = "Enrolled or checkout started", body = CreatePaymentResponse),
        (status = 400, description = "Already enrolled", body = crate::api::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::api::ErrorResponse),
        (status = 404, description = "Item not found", body = crate::api::ErrorResponse),
        (status = 500, description = "Processor or backend error", body = crate::api::ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state, headers, caller), fields(user_id = %caller.user.id))]
pub async fn create_payment<B: Backend>(
    State(state): State<AppState<B>>,
    caller: Caller,
    headers: HeaderMap,
    Json(req): Json<CreatePaymentRequest>,
) -> Result<Json<CreatePaymentResponse>, ApiError> {
    if req.course_id.trim().is_empty() {
        return Err(ApiError::BadRequest("courseId is required".to_string()));
    }
    let kind = if req.is_live_class {
        ItemKind::LiveClass
    } else {
        ItemKind::Course
    };
    let target = EnrollmentTarget::new(kind, req.course_id);
    let origin = request_origin(&headers, &state);

    let outcome = start_checkout(
        state.backend(),
        state.stripe(),
        &caller.user,
        &target,
        &origin,
    )
    .await?;
    Ok(Json(outcome.into()))
}

/// Verify a checkout session
///
/// Marks the payment completed and enrolls the student once the session
/// is paid.
#[utoipa::path(
    post,
    path = "/verify-payment",
    tag = "functions",
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Verification result", body = VerifyPaymentResponse),
        (status = 401, description = "Missing or invalid token", body = crate::api::ErrorResponse),
        (status = 500, description = "Processor or backend error", body = crate::api::ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state, _caller))]
pub async fn verify_payment<B: Backend>(
    State(state): State<AppState<B>>,
    _caller: Caller,
    Json(req): Json<VerifyPaymentRequest>,
) -> Result<Json<VerifyPaymentResponse>, ApiError> {
    let outcome = verify_checkout(state.backend(), state.stripe(), &req.session_id).await?;
    Ok(Json(VerifyPaymentResponse {
        success: outcome.success,
    }))
}

/// Email a payment link to a student
#[utoipa::path(
    post,
    path = "/send-payment-email",
    tag = "functions",
    request_body = SendPaymentEmailRequest,
    responses(
        (status = 200, description = "Email sent or logged", body = SendPaymentEmailResponse),
        (status = 400, description = "Invalid request", body = crate::api::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::api::ErrorResponse),
        (status = 500, description = "Delivery failed", body = crate::api::ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state, _caller, req), fields(to = %req.student_email))]
pub async fn send_payment_email<B: Backend>(
    State(state): State<AppState<B>>,
    _caller: Caller,
    Json(req): Json<SendPaymentEmailRequest>,
) -> Result<Json<SendPaymentEmailResponse>, ApiError> {
    if !req.student_email.contains('@') {
        return Err(ApiError::BadRequest("studentEmail is invalid".to_string()));
    }
    if !req.amount.is_finite() || req.amount <= 0.0 {
        return Err(ApiError::BadRequest("amount must be positive".to_string()));
    }
    if req.payment_request_id.trim().is_empty() {
        return Err(ApiError::BadRequest("paymentRequestId is required".to_string()));
    }

    let request = PaymentEmailRequest {
        student_email: req.student_email,
        course_title: req.course_title,
        amount: req.amount,
        payment_request_id: req.payment_request_id,
    };
    let settings = state.settings();
    let email = compose_payment_email(&request, &settings.site_url, &settings.stripe.currency);

    let message = match state.mailer().send(&email).await? {
        Delivery::Sent { .. } => "Payment email sent",
        Delivery::Logged => "Payment email logged (mail delivery not configured)",
    };
    Ok(Json(SendPaymentEmailResponse {
        success: true,
        message: message.to_string(),
    }))
}
