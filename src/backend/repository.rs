//! Repository traits for data access abstraction.
//!
//! These traits define the contract for data access, allowing the managed
//! backend and the in-memory store to be swapped without changing the
//! handlers. Methods return `Send` futures so they can be awaited from axum
//! handlers that are generic over [`Backend`].

use std::future::Future;

use crate::backend::{
    BackendResult,
    models::{
        ApprovalStatus, AuthUser, ChatMessage, Conversation, Course, Donation, Enrollment,
        EnrollmentTarget, LiveClass, NewChatMessage, NewConversation, NewDonation, NewEnrollment,
        NewPayment, Payment, PaymentStatus, Profile, Role, Teacher,
    },
};

/// Access-token verification.
pub trait AuthRepository: Send + Sync {
    /// Resolve the user an access token was issued to.
    fn user_from_token(
        &self,
        access_token: &str,
    ) -> impl Future<Output = BackendResult<AuthUser>> + Send;
}

/// Repository for `profiles`.
pub trait ProfileRepository: Send + Sync {
    /// Get a profile by user ID.
    fn get(&self, id: &str) -> impl Future<Output = BackendResult<Profile>> + Send;

    /// Find a profile by email.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = BackendResult<Option<Profile>>> + Send;

    /// List teacher profiles in the given approval state, oldest first.
    fn list_teachers_by_status(
        &self,
        status: ApprovalStatus,
    ) -> impl Future<Output = BackendResult<Vec<Profile>>> + Send;

    /// Set a profile's approval status and return the updated row.
    fn set_approval_status(
        &self,
        id: &str,
        status: ApprovalStatus,
    ) -> impl Future<Output = BackendResult<Profile>> + Send;

    /// Set a profile's role and return the updated row.
    fn set_role(&self, id: &str, role: Role) -> impl Future<Output = BackendResult<Profile>> + Send;
}

/// Repository for the browsable catalog (`teachers`, `courses`, `live_classes`).
pub trait CatalogRepository: Send + Sync {
    /// Get a course by ID.
    fn course(&self, id: &str) -> impl Future<Output = BackendResult<Course>> + Send;

    /// Get a live class by ID.
    fn live_class(&self, id: &str) -> impl Future<Output = BackendResult<LiveClass>> + Send;

    /// All published courses, newest first.
    fn list_courses(&self) -> impl Future<Output = BackendResult<Vec<Course>>> + Send;

    /// All active teachers, by name.
    fn list_teachers(&self) -> impl Future<Output = BackendResult<Vec<Teacher>>> + Send;
}

/// Repository for `enrollments`.
pub trait EnrollmentRepository: Send + Sync {
    /// Find a student's enrollment in a course or live class.
    fn find(
        &self,
        student_id: &str,
        target: &EnrollmentTarget,
    ) -> impl Future<Output = BackendResult<Option<Enrollment>>> + Send;

    /// Insert an enrollment row.
    fn create(
        &self,
        enrollment: &NewEnrollment,
    ) -> impl Future<Output = BackendResult<Enrollment>> + Send;
}

/// Repository for `payments`.
pub trait PaymentRepository: Send + Sync {
    /// Insert a payment row.
    fn create(&self, payment: &NewPayment) -> impl Future<Output = BackendResult<Payment>> + Send;

    /// Find the payment created for a checkout session.
    fn find_by_session(
        &self,
        session_id: &str,
    ) -> impl Future<Output = BackendResult<Option<Payment>>> + Send;

    /// Set a payment's status and return the updated row.
    fn set_status(
        &self,
        id: &str,
        status: PaymentStatus,
    ) -> impl Future<Output = BackendResult<Payment>> + Send;
}

/// Repository for `donations`.
pub trait DonationRepository: Send + Sync {
    /// Insert a donation row.
    fn create(&self, donation: &NewDonation)
    -> impl Future<Output = BackendResult<Donation>> + Send;

    /// Donations received by a teacher, newest first.
    fn list_for_teacher(
        &self,
        teacher_id: &str,
    ) -> impl Future<Output = BackendResult<Vec<Donation>>> + Send;
}

/// Repository for `conversations` and `chat_messages`.
pub trait ChatRepository: Send + Sync {
    /// Get a conversation by ID.
    fn conversation(&self, id: &str) -> impl Future<Output = BackendResult<Conversation>> + Send;

    /// Find the conversation between a student and a teacher.
    fn find_conversation(
        &self,
        student_id: &str,
        teacher_id: &str,
    ) -> impl Future<Output = BackendResult<Option<Conversation>>> + Send;

    /// Insert a conversation row.
    fn create_conversation(
        &self,
        conversation: &NewConversation,
    ) -> impl Future<Output = BackendResult<Conversation>> + Send;

    /// Conversations the user takes part in, newest first.
    fn list_conversations(
        &self,
        user_id: &str,
    ) -> impl Future<Output = BackendResult<Vec<Conversation>>> + Send;

    /// Messages in a conversation, oldest first.
    fn list_messages(
        &self,
        conversation_id: &str,
    ) -> impl Future<Output = BackendResult<Vec<ChatMessage>>> + Send;

    /// Insert a message row.
    fn send_message(
        &self,
        message: &NewChatMessage,
    ) -> impl Future<Output = BackendResult<ChatMessage>> + Send;
}

/// Combined backend interface.
pub trait Backend: Send + Sync + 'static {
    type Auth: AuthRepository;
    type Profiles: ProfileRepository;
    type Catalog: CatalogRepository;
    type Enrollments: EnrollmentRepository;
    type Payments: PaymentRepository;
    type Donations: DonationRepository;
    type Chat: ChatRepository;

    /// Get the auth API.
    fn auth(&self) -> &Self::Auth;

    /// Get the profile repository.
    fn profiles(&self) -> &Self::Profiles;

    /// Get the catalog repository.
    fn catalog(&self) -> &Self::Catalog;

    /// Get the enrollment repository.
    fn enrollments(&self) -> &Self::Enrollments;

    /// Get the payment repository.
    fn payments(&self) -> &Self::Payments;

    /// Get the donation repository.
    fn donations(&self) -> &Self::Donations;

    /// Get the chat repository.
    fn chat(&self) -> &Self::Chat;
}
