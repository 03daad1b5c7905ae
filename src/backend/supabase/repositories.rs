//! Repository implementations over PostgREST.

use serde_json::json;
use tracing::instrument;

use super::client::SupabaseClient;
use crate::backend::models::{
    ApprovalStatus, ChatMessage, Conversation, Course, Donation, Enrollment, EnrollmentTarget,
    LiveClass, NewChatMessage, NewConversation, NewDonation, NewEnrollment, NewPayment, Payment,
    PaymentStatus, Profile, Role, SortOrder, Teacher,
};
use crate::backend::query::Query;
use crate::backend::repository::{
    CatalogRepository, ChatRepository, DonationRepository, EnrollmentRepository,
    PaymentRepository, ProfileRepository,
};
use crate::backend::{BackendError, BackendResult};

/// Replace the backend's generic "row not found" with an entity-specific one.
fn not_found_as<T>(result: BackendResult<T>, entity_type: &str, id: &str) -> BackendResult<T> {
    result.map_err(|e| {
        if e.is_not_found() {
            BackendError::not_found(entity_type, id)
        } else {
            e
        }
    })
}

#[derive(Clone)]
pub struct SupabaseProfiles {
    client: SupabaseClient,
}

impl SupabaseProfiles {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

impl ProfileRepository for SupabaseProfiles {
    #[instrument(skip(self))]
    async fn get(&self, id: &str) -> BackendResult<Profile> {
        let result = self
            .client
            .select_single("profiles", &Query::new().eq("id", id))
            .await;
        not_found_as(result, "profile", id)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> BackendResult<Option<Profile>> {
        self.client
            .select_maybe("profiles", &Query::new().eq("email", email))
            .await
    }

    #[instrument(skip(self))]
    async fn list_teachers_by_status(&self, status: ApprovalStatus) -> BackendResult<Vec<Profile>> {
        let query = Query::new()
            .eq("role", Role::Teacher)
            .eq("approval_status", status)
            .order("created_at", SortOrder::Asc);
        self.client.select("profiles", &query).await
    }

    #[instrument(skip(self))]
    async fn set_approval_status(&self, id: &str, status: ApprovalStatus) -> BackendResult<Profile> {
        let result = self
            .client
            .update(
                "profiles",
                &Query::new().eq("id", id),
                &json!({ "approval_status": status }),
            )
            .await;
        not_found_as(result, "profile", id)
    }

    #[instrument(skip(self))]
    async fn set_role(&self, id: &str, role: Role) -> BackendResult<Profile> {
        let result = self
            .client
            .update("profiles", &Query::new().eq("id", id), &json!({ "role": role }))
            .await;
        not_found_as(result, "profile", id)
    }
}

#[derive(Clone)]
pub struct SupabaseCatalog {
    client: SupabaseClient,
}

impl SupabaseCatalog {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

impl CatalogRepository for SupabaseCatalog {
    #[instrument(skip(self))]
    async fn course(&self, id: &str) -> BackendResult<Course> {
        let result = self
            .client
            .select_single("courses", &Query::new().eq("id", id))
            .await;
        not_found_as(result, "course", id)
    }

    #[instrument(skip(self))]
    async fn live_class(&self, id: &str) -> BackendResult<LiveClass> {
        let result = self
            .client
            .select_single("live_classes", &Query::new().eq("id", id))
            .await;
        not_found_as(result, "live_class", id)
    }

    #[instrument(skip(self))]
    async fn list_courses(&self) -> BackendResult<Vec<Course>> {
        let query = Query::new()
            .eq("is_published", true)
            .order("created_at", SortOrder::Desc);
        self.client.select("courses", &query).await
    }

    #[instrument(skip(self))]
    async fn list_teachers(&self) -> BackendResult<Vec<Teacher>> {
        let query = Query::new()
            .eq("is_active", true)
            .order("full_name", SortOrder::Asc);
        self.client.select("teachers", &query).await
    }
}

#[derive(Clone)]
pub struct SupabaseEnrollments {
    client: SupabaseClient,
}

impl SupabaseEnrollments {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

impl EnrollmentRepository for SupabaseEnrollments {
    #[instrument(skip(self))]
    async fn find(&self, student_id: &str, target: &EnrollmentTarget) -> BackendResult<Option<Enrollment>> {
        let query = Query::new()
            .eq("student_id", student_id)
            .eq(target.kind.column(), &target.id);
        self.client.select_maybe("enrollments", &query).await
    }

    #[instrument(skip(self))]
    async fn create(&self, enrollment: &NewEnrollment) -> BackendResult<Enrollment> {
        self.client.insert("enrollments", enrollment).await
    }
}

#[derive(Clone)]
pub struct SupabasePayments {
    client: SupabaseClient,
}

impl SupabasePayments {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

impl PaymentRepository for SupabasePayments {
    #[instrument(skip(self))]
    async fn create(&self, payment: &NewPayment) -> BackendResult<Payment> {
        self.client.insert("payments", payment).await
    }

    #[instrument(skip(self))]
    async fn find_by_session(&self, session_id: &str) -> BackendResult<Option<Payment>> {
        self.client
            .select_maybe("payments", &Query::new().eq("stripe_session_id", session_id))
            .await
    }

    #[instrument(skip(self))]
    async fn set_status(&self, id: &str, status: PaymentStatus) -> BackendResult<Payment> {
        let result = self
            .client
            .update("payments", &Query::new().eq("id", id), &json!({ "status": status }))
            .await;
        not_found_as(result, "payment", id)
    }
}

#[derive(Clone)]
pub struct SupabaseDonations {
    client: SupabaseClient,
}

impl SupabaseDonations {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

impl DonationRepository for SupabaseDonations {
    #[instrument(skip(self))]
    async fn create(&self, donation: &NewDonation) -> BackendResult<Donation> {
        self.client.insert("donations", donation).await
    }

    #[instrument(skip(self))]
    async fn list_for_teacher(&self, teacher_id: &str) -> BackendResult<Vec<Donation>> {
        let query = Query::new()
            .eq("teacher_id", teacher_id)
            .order("created_at", SortOrder::Desc);
        self.client.select("donations", &query).await
    }
}

#[derive(Clone)]
pub struct SupabaseChat {
    client: SupabaseClient,
}

impl SupabaseChat {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

impl ChatRepository for SupabaseChat {
    #[instrument(skip(self))]
    async fn conversation(&self, id: &str) -> BackendResult<Conversation> {
        let result = self
            .client
            .select_single("conversations", &Query::new().eq("id", id))
            .await;
        not_found_as(result, "conversation", id)
    }

    #[instrument(skip(self))]
    async fn find_conversation(&self, student_id: &str, teacher_id: &str) -> BackendResult<Option<Conversation>> {
        let query = Query::new()
            .eq("student_id", student_id)
            .eq("teacher_id", teacher_id);
        self.client.select_maybe("conversations", &query).await
    }

    #[instrument(skip(self))]
    async fn create_conversation(&self, conversation: &NewConversation) -> BackendResult<Conversation> {
        self.client.insert("conversations", conversation).await
    }

    #[instrument(skip(self))]
    async fn list_conversations(&self, user_id: &str) -> BackendResult<Vec<Conversation>> {
        let query = Query::new()
            .or_eq(&[("student_id", user_id), ("teacher_id", user_id)])
            .order("created_at", SortOrder::Desc);
        self.client.select("conversations", &query).await
    }

    #[instrument(skip(self))]
    async fn list_messages(&self, conversation_id: &str) -> BackendResult<Vec<ChatMessage>> {
        let query = Query::new()
            .eq("conversation_id", conversation_id)
            .order("created_at", SortOrder::Asc);
        self.client.select("chat_messages", &query).await
    }

    #[instrument(skip(self))]
    async fn send_message(&self, message: &NewChatMessage) -> BackendResult<ChatMessage> {
        self.client.insert("chat_messages", message).await
    }
}
