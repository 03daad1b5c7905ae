//! Domain models for the marketplace tables.
//!
//! Field names follow the backend's column names so rows deserialize
//! straight from PostgREST responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::serde_utils::{lenient_f64, lenient_gender, null_as_default, required_f64};

/// Row identifiers are UUID strings issued by the backend.
pub type Id = String;

/// Sort order for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

// =============================================================================
// Identity
// =============================================================================

/// The authenticated user behind an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Id,
    #[serde(default)]
    pub email: Option<String>,
}

/// Tokens returned by a successful sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: AuthUser,
}

/// Role of a profile.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Teacher,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Teacher => write!(f, "teacher"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Teacher approval workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApprovalStatus::Pending => write!(f, "pending"),
            ApprovalStatus::Approved => write!(f, "approved"),
            ApprovalStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApprovalStatus::Pending),
            "approved" => Ok(ApprovalStatus::Approved),
            "rejected" => Ok(ApprovalStatus::Rejected),
            _ => Err(format!("Unknown approval status: {}", s)),
        }
    }
}

/// Declared gender of a viewer or teacher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}

/// Audience tag on teachers and courses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Men,
    Women,
    Children,
    Adults,
    /// Tags this build does not know about. Never matches a viewer.
    #[serde(other)]
    Other,
}

/// User profile row (`profiles`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Id,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub approval_status: Option<ApprovalStatus>,
    #[serde(default, deserialize_with = "lenient_gender")]
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub audiences: Vec<Audience>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Name to show in listings, falling back to the email.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("-")
    }
}

// =============================================================================
// Catalog
// =============================================================================

fn default_true() -> bool {
    true
}

/// Teacher directory row (`teachers`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: Id,
    #[serde(default)]
    pub user_id: Option<Id>,
    pub full_name: String,
    #[serde(default, deserialize_with = "lenient_gender")]
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub audiences: Vec<Audience>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Recorded course row (`courses`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub teacher_id: Option<Id>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_free: bool,
    #[serde(
        default,
        rename = "target_audience",
        deserialize_with = "null_as_default"
    )]
    pub audiences: Vec<Audience>,
    #[serde(default = "default_true")]
    pub is_published: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Scheduled live class row (`live_classes`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveClass {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub teacher_id: Option<Id>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_free: bool,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub meeting_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Enrollment & payments
// =============================================================================

/// What a student enrolls in or pays for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Course,
    LiveClass,
}

impl ItemKind {
    /// Foreign-key column referencing this kind on enrollment and payment rows.
    pub fn column(self) -> &'static str {
        match self {
            ItemKind::Course => "course_id",
            ItemKind::LiveClass => "live_class_id",
        }
    }

    pub fn entity_name(self) -> &'static str {
        match self {
            ItemKind::Course => "course",
            ItemKind::LiveClass => "live_class",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.entity_name())
    }
}

impl std::str::FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "course" => Ok(ItemKind::Course),
            "live_class" => Ok(ItemKind::LiveClass),
            _ => Err(format!("Unknown item kind: {}", s)),
        }
    }
}

/// A course or live class identified by kind and id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnrollmentTarget {
    pub kind: ItemKind,
    pub id: Id,
}

impl EnrollmentTarget {
    pub fn new(kind: ItemKind, id: impl Into<Id>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    pub fn course(id: impl Into<Id>) -> Self {
        Self::new(ItemKind::Course, id)
    }

    pub fn live_class(id: impl Into<Id>) -> Self {
        Self::new(ItemKind::LiveClass, id)
    }

    /// Split into the `(course_id, live_class_id)` column pair.
    fn columns(&self) -> (Option<Id>, Option<Id>) {
        match self.kind {
            ItemKind::Course => (Some(self.id.clone()), None),
            ItemKind::LiveClass => (None, Some(self.id.clone())),
        }
    }

    fn from_columns(course_id: Option<&Id>, live_class_id: Option<&Id>) -> Option<Self> {
        match (course_id, live_class_id) {
            (Some(id), _) => Some(Self::course(id.clone())),
            (None, Some(id)) => Some(Self::live_class(id.clone())),
            (None, None) => None,
        }
    }
}

/// Enrollment row (`enrollments`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: Id,
    pub student_id: Id,
    #[serde(default)]
    pub course_id: Option<Id>,
    #[serde(default)]
    pub live_class_id: Option<Id>,
    #[serde(default)]
    pub enrolled_at: Option<DateTime<Utc>>,
}

impl Enrollment {
    pub fn target(&self) -> Option<EnrollmentTarget> {
        EnrollmentTarget::from_columns(self.course_id.as_ref(), self.live_class_id.as_ref())
    }
}

/// Insert payload for `enrollments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewEnrollment {
    pub student_id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_class_id: Option<Id>,
}

impl NewEnrollment {
    pub fn new(student_id: impl Into<Id>, target: &EnrollmentTarget) -> Self {
        let (course_id, live_class_id) = target.columns();
        Self {
            student_id: student_id.into(),
            course_id,
            live_class_id,
        }
    }
}

/// Status of a payment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Completed => write!(f, "completed"),
            PaymentStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Payment row (`payments`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Id,
    pub user_id: Id,
    #[serde(default)]
    pub course_id: Option<Id>,
    #[serde(default)]
    pub live_class_id: Option<Id>,
    #[serde(deserialize_with = "required_f64")]
    pub amount: f64,
    pub currency: String,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default)]
    pub stripe_session_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Payment {
    pub fn target(&self) -> Option<EnrollmentTarget> {
        EnrollmentTarget::from_columns(self.course_id.as_ref(), self.live_class_id.as_ref())
    }
}

/// Insert payload for `payments`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPayment {
    pub user_id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_class_id: Option<Id>,
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    pub stripe_session_id: String,
}

impl NewPayment {
    pub fn pending(
        user_id: impl Into<Id>,
        target: &EnrollmentTarget,
        amount: f64,
        currency: impl Into<String>,
        stripe_session_id: impl Into<String>,
    ) -> Self {
        let (course_id, live_class_id) = target.columns();
        Self {
            user_id: user_id.into(),
            course_id,
            live_class_id,
            amount,
            currency: currency.into(),
            status: PaymentStatus::Pending,
            stripe_session_id: stripe_session_id.into(),
        }
    }
}

// =============================================================================
// Donations
// =============================================================================

/// Donation row (`donations`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    pub id: Id,
    #[serde(default)]
    pub donor_id: Option<Id>,
    #[serde(default)]
    pub teacher_id: Option<Id>,
    #[serde(default)]
    pub donor_name: Option<String>,
    #[serde(deserialize_with = "required_f64")]
    pub amount: f64,
    pub currency: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for `donations`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDonation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donor_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donor_name: Option<String>,
    pub amount: f64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// =============================================================================
// Chat
// =============================================================================

/// Conversation between a student and a teacher (`conversations`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Id,
    pub student_id: Id,
    pub teacher_id: Id,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Conversation {
    pub fn has_participant(&self, user_id: &str) -> bool {
        self.student_id == user_id || self.teacher_id == user_id
    }
}

/// Insert payload for `conversations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewConversation {
    pub student_id: Id,
    pub teacher_id: Id,
}

/// Message row (`chat_messages`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Id,
    pub conversation_id: Id,
    pub sender_id: Id,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for `chat_messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewChatMessage {
    pub conversation_id: Id,
    pub sender_id: Id,
    pub content: String,
}
