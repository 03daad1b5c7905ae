//! API route configuration.

use axum::Router;
use axum::routing::{get, post};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_scalar::{Scalar, Servable};

use super::error::ErrorResponse;
use super::functions::{
    self, CreatePaymentRequest, CreatePaymentResponse, SendPaymentEmailRequest,
    SendPaymentEmailResponse, VerifyPaymentRequest, VerifyPaymentResponse,
};
use super::state::AppState;
use super::v1::{
    self, AccessResponse, ConversationResponse, CourseResponse, CreateDonationRequest,
    DonationResponse, HealthResponse, MessageResponse, OpenConversationRequest, ProfileResponse,
    SendMessageRequest, TeacherDonations, TeacherResponse,
};
use crate::backend::{ApprovalStatus, Backend, Gender, Role};

/// Build routes with generic backend type.
///
/// This macro reduces boilerplate when registering handlers that are generic
/// over the Backend trait. It applies the turbofish operator automatically.
macro_rules! routes {
    ($B:ty => {
        $($method:ident $path:literal => $($handler:ident)::+),* $(,)?
    }) => {{
        let router = Router::new();
        $(
            let router = router.route($path, $method($($handler)::+::<$B>));
        )*
        router
    }};
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// OpenAPI documentation for the marketplace API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tutorhub API",
        version = "0.3.0",
        description = "Tutoring marketplace: catalog, access gate, approvals, donations, chat",
        license(name = "GPL-2.0")
    ),
    paths(
        v1::health,
        v1::list_teachers,
        v1::list_courses,
        v1::check_access,
        v1::list_pending_teachers,
        v1::approve_teacher,
        v1::reject_teacher,
        v1::create_donation,
        v1::list_teacher_donations,
        v1::list_conversations,
        v1::open_conversation,
        v1::list_messages,
        v1::send_message,
    ),
    components(
        schemas(
            HealthResponse,
            TeacherResponse,
            CourseResponse,
            AccessResponse,
            ProfileResponse,
            DonationResponse,
            CreateDonationRequest,
            TeacherDonations,
            ConversationResponse,
            OpenConversationRequest,
            MessageResponse,
            SendMessageRequest,
            Role,
            ApprovalStatus,
            Gender,
            ErrorResponse,
        )
    ),
    nest(
        (path = "/functions/v1", api = FunctionsDoc)
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "system", description = "System health and status endpoints"),
        (name = "catalog", description = "Teachers and courses filtered for the viewer"),
        (name = "access", description = "Role and approval gate"),
        (name = "admin", description = "Teacher approval workflow"),
        (name = "donations", description = "Donations to teachers"),
        (name = "chat", description = "Student/teacher conversations"),
        (name = "functions", description = "Payment functions")
    )
)]
pub struct ApiDoc;

#[derive(OpenApi)]
#[openapi(
    paths(
        functions::create_payment,
        functions::verify_payment,
        functions::send_payment_email,
    ),
    components(schemas(
        CreatePaymentRequest,
        CreatePaymentResponse,
        VerifyPaymentRequest,
        VerifyPaymentResponse,
        SendPaymentEmailRequest,
        SendPaymentEmailResponse,
    ))
)]
struct FunctionsDoc;

/// Create the router.
///
/// Marketplace endpoints live under `/api/v1`, payment functions under
/// `/functions/v1`. Interactive docs are mounted at `/docs` when enabled.
pub fn create_router<B: Backend>(state: AppState<B>, enable_docs: bool) -> Router {
    // System routes (non-generic)
    let system_routes = Router::new().route("/health", get(v1::health));

    let v1_routes = routes!(B => {
        get "/v1/teachers" => v1::list_teachers,
        get "/v1/courses" => v1::list_courses,
        get "/v1/access" => v1::check_access,
        get "/v1/admin/teachers/pending" => v1::list_pending_teachers,
        post "/v1/admin/teachers/{id}/approve" => v1::approve_teacher,
        post "/v1/admin/teachers/{id}/reject" => v1::reject_teacher,
        post "/v1/donations" => v1::create_donation,
        get "/v1/teachers/{id}/donations" => v1::list_teacher_donations,
        get "/v1/conversations" => v1::list_conversations,
        post "/v1/conversations" => v1::open_conversation,
        get "/v1/conversations/{id}/messages" => v1::list_messages,
        post "/v1/conversations/{id}/messages" => v1::send_message,
    });

    let function_routes = routes!(B => {
        post "/create-payment" => functions::create_payment,
        post "/verify-payment" => functions::verify_payment,
        post "/send-payment-email" => functions::send_payment_email,
    });

    let mut router = system_routes
        .nest("/api", v1_routes)
        .nest("/functions/v1", function_routes);

    if enable_docs {
        router = router.merge(Scalar::with_url("/docs", ApiDoc::openapi()));
    }

    router.with_state(state)
}
