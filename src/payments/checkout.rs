//! Checkout and verification flows behind `create-payment` and
//! `verify-payment`.
//!
//! Enrollment uses check-then-insert against the backend. Two concurrent
//! requests for the same student and item can both pass the check; the
//! backend's unique constraint (if present) is the only guard.

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::backend::{
    AuthUser, Backend, CatalogRepository, EnrollmentRepository, EnrollmentTarget, ItemKind,
    NewEnrollment, NewPayment, PaymentRepository, PaymentStatus,
};
use crate::payments::stripe::{CheckoutRequest, StripeClient, to_minor_units};
use crate::payments::{PaymentError, PaymentResult};

pub const METADATA_USER_ID: &str = "user_id";
pub const METADATA_ITEM_ID: &str = "item_id";
pub const METADATA_ITEM_KIND: &str = "item_kind";

/// Result of starting a checkout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CheckoutOutcome {
    /// The item was free; the student is now enrolled
    Free { free: bool },
    /// Send the student to the hosted checkout page
    Redirect { url: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VerifyOutcome {
    pub success: bool,
}

/// The parts of a course or live class that checkout needs.
struct Purchasable {
    title: String,
    price: Option<f64>,
    is_free: bool,
}

impl Purchasable {
    fn is_free(&self) -> bool {
        self.is_free || self.price.is_none_or(|p| p == 0.0)
    }
}

async fn load_item<B: Backend>(backend: &B, target: &EnrollmentTarget) -> PaymentResult<Purchasable> {
    let item = match target.kind {
        ItemKind::Course => {
            let course = backend.catalog().course(&target.id).await?;
            Purchasable {
                title: course.title,
                price: course.price,
                is_free: course.is_free,
            }
        }
        ItemKind::LiveClass => {
            let live = backend.catalog().live_class(&target.id).await?;
            Purchasable {
                title: live.title,
                price: live.price,
                is_free: live.is_free,
            }
        }
    };
    Ok(item)
}

/// Client page the student lands on when they abandon checkout.
fn cancel_path(target: &EnrollmentTarget) -> String {
    match target.kind {
        ItemKind::Course => format!("/courses/{}", target.id),
        ItemKind::LiveClass => format!("/live-classes/{}", target.id),
    }
}

/// Enroll `user` in the item, or create a checkout session for it.
#[instrument(skip(backend, stripe, user), fields(user_id = %user.id))]
pub async fn start_checkout<B: Backend>(
    backend: &B,
    stripe: &StripeClient,
    user: &AuthUser,
    target: &EnrollmentTarget,
    origin: &str,
) -> PaymentResult<CheckoutOutcome> {
    let item = load_item(backend, target).await?;

    if backend.enrollments().find(&user.id, target).await?.is_some() {
        return Err(PaymentError::AlreadyEnrolled);
    }

    if item.is_free() {
        backend
            .enrollments()
            .create(&NewEnrollment::new(user.id.clone(), target))
            .await?;
        info!(item = %target.id, kind = %target.kind, "Enrolled in free item");
        return Ok(CheckoutOutcome::Free { free: true });
    }

    let price = item.price.unwrap_or_default();
    let origin = origin.trim_end_matches('/');
    let request = CheckoutRequest {
        product_name: item.title,
        unit_amount: to_minor_units(price)?,
        currency: stripe.currency().to_string(),
        customer_email: user.email.clone(),
        success_url: format!(
            "{}/payment-success?session_id={{CHECKOUT_SESSION_ID}}",
            origin
        ),
        cancel_url: format!("{}{}", origin, cancel_path(target)),
        metadata: vec![
            (METADATA_USER_ID.to_string(), user.id.clone()),
            (METADATA_ITEM_ID.to_string(), target.id.clone()),
            (METADATA_ITEM_KIND.to_string(), target.kind.to_string()),
        ],
    };

    let session = stripe.create_checkout_session(&request).await?;
    let url = session.url.ok_or_else(|| PaymentError::Processor {
        status: 200,
        message: format!("Checkout session {} has no url", session.id),
    })?;

    backend
        .payments()
        .create(&NewPayment::pending(
            user.id.clone(),
            target,
            price,
            stripe.currency(),
            session.id.clone(),
        ))
        .await?;
    info!(session_id = %session.id, "Checkout session created");
    Ok(CheckoutOutcome::Redirect { url })
}

/// Reconcile a checkout session with the payment and enrollment rows.
#[instrument(skip(backend, stripe))]
pub async fn verify_checkout<B: Backend>(
    backend: &B,
    stripe: &StripeClient,
    session_id: &str,
) -> PaymentResult<VerifyOutcome> {
    let session = stripe.retrieve_session(session_id).await?;
    let payment = backend.payments().find_by_session(session_id).await?;

    if !session.is_paid() {
        let pending = payment
            .as_ref()
            .filter(|p| p.status == PaymentStatus::Pending);
        if let (true, Some(payment)) = (session.is_expired(), pending) {
            backend
                .payments()
                .set_status(&payment.id, PaymentStatus::Failed)
                .await?;
            info!(payment_id = %payment.id, "Checkout session expired; payment marked failed");
        }
        return Ok(VerifyOutcome { success: false });
    }

    match &payment {
        Some(p) if p.status != PaymentStatus::Completed => {
            backend
                .payments()
                .set_status(&p.id, PaymentStatus::Completed)
                .await?;
        }
        Some(_) => {}
        None => warn!("Paid session has no payment row"),
    }

    let missing = |field: &str| PaymentError::MissingMetadata {
        session_id: session_id.to_string(),
        field: field.to_string(),
    };

    let user_id = session
        .metadata(METADATA_USER_ID)
        .map(str::to_string)
        .or_else(|| payment.as_ref().map(|p| p.user_id.clone()))
        .ok_or_else(|| missing(METADATA_USER_ID))?;

    let from_metadata = match (
        session.metadata(METADATA_ITEM_KIND),
        session.metadata(METADATA_ITEM_ID),
    ) {
        (Some(kind), Some(id)) => kind
            .parse::<ItemKind>()
            .ok()
            .map(|kind| EnrollmentTarget::new(kind, id)),
        _ => None,
    };
    let target = from_metadata
        .or_else(|| payment.as_ref().and_then(|p| p.target()))
        .ok_or_else(|| missing(METADATA_ITEM_ID))?;

    if backend.enrollments().find(&user_id, &target).await?.is_none() {
        backend
            .enrollments()
            .create(&NewEnrollment::new(user_id.clone(), &target))
            .await?;
        info!(%user_id, item = %target.id, "Enrolled after payment");
    }

    Ok(VerifyOutcome { success: true })
}
