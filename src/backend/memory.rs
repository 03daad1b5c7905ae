//! In-memory backend.
//!
//! Backs the test suites and `serve --in-memory`. Rows live in `DashMap`s
//! keyed by id; an insertion sequence keeps list results stable when
//! timestamps tie. Access tokens are registered up front with
//! [`MemoryBackend::add_session`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::backend::models::{
    ApprovalStatus, AuthUser, ChatMessage, Conversation, Course, Donation, Enrollment,
    EnrollmentTarget, Id, LiveClass, NewChatMessage, NewConversation, NewDonation, NewEnrollment,
    NewPayment, Payment, PaymentStatus, Profile, Role, Teacher,
};
use crate::backend::repository::{
    AuthRepository, Backend, CatalogRepository, ChatRepository, DonationRepository,
    EnrollmentRepository, PaymentRepository, ProfileRepository,
};
use crate::backend::{BackendError, BackendResult};

/// One table: rows by id, each tagged with its insertion sequence.
struct Table<T> {
    rows: DashMap<Id, (u64, T)>,
    seq: AtomicU64,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            rows: DashMap::new(),
            seq: AtomicU64::new(0),
        }
    }

    fn insert(&self, id: Id, row: T) -> T {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        self.rows.insert(id, (seq, row.clone()));
        row
    }

    fn get(&self, id: &str) -> Option<T> {
        self.rows.get(id).map(|entry| entry.value().1.clone())
    }

    fn update<F: FnOnce(&mut T)>(&self, id: &str, f: F) -> Option<T> {
        self.rows.get_mut(id).map(|mut entry| {
            f(&mut entry.value_mut().1);
            entry.value().1.clone()
        })
    }

    /// Matching rows in insertion order.
    fn filter<P: Fn(&T) -> bool>(&self, predicate: P) -> Vec<T> {
        let mut rows: Vec<(u64, T)> = self
            .rows
            .iter()
            .filter(|entry| predicate(&entry.value().1))
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|(seq, _)| *seq);
        rows.into_iter().map(|(_, row)| row).collect()
    }

    fn find<P: Fn(&T) -> bool>(&self, predicate: P) -> Option<T> {
        self.filter(predicate).into_iter().next()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

struct Tables {
    sessions: DashMap<String, AuthUser>,
    profiles: Table<Profile>,
    teachers: Table<Teacher>,
    courses: Table<Course>,
    live_classes: Table<LiveClass>,
    enrollments: Table<Enrollment>,
    payments: Table<Payment>,
    donations: Table<Donation>,
    conversations: Table<Conversation>,
    messages: Table<ChatMessage>,
}

impl Tables {
    fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            profiles: Table::new(),
            teachers: Table::new(),
            courses: Table::new(),
            live_classes: Table::new(),
            enrollments: Table::new(),
            payments: Table::new(),
            donations: Table::new(),
            conversations: Table::new(),
            messages: Table::new(),
        }
    }
}

fn new_id() -> Id {
    Uuid::new_v4().to_string()
}

macro_rules! memory_repository {
    ($($name:ident),* $(,)?) => {
        $(
            #[derive(Clone)]
            pub struct $name {
                tables: Arc<Tables>,
            }
        )*
    };
}

memory_repository!(
    MemoryAuth,
    MemoryProfiles,
    MemoryCatalog,
    MemoryEnrollments,
    MemoryPayments,
    MemoryDonations,
    MemoryChat,
);

/// Backend holding every table in process memory.
#[derive(Clone)]
pub struct MemoryBackend {
    tables: Arc<Tables>,
    auth: MemoryAuth,
    profiles: MemoryProfiles,
    catalog: MemoryCatalog,
    enrollments: MemoryEnrollments,
    payments: MemoryPayments,
    donations: MemoryDonations,
    chat: MemoryChat,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        let tables = Arc::new(Tables::new());
        Self {
            auth: MemoryAuth {
                tables: Arc::clone(&tables),
            },
            profiles: MemoryProfiles {
                tables: Arc::clone(&tables),
            },
            catalog: MemoryCatalog {
                tables: Arc::clone(&tables),
            },
            enrollments: MemoryEnrollments {
                tables: Arc::clone(&tables),
            },
            payments: MemoryPayments {
                tables: Arc::clone(&tables),
            },
            donations: MemoryDonations {
                tables: Arc::clone(&tables),
            },
            chat: MemoryChat {
                tables: Arc::clone(&tables),
            },
            tables,
        }
    }

    /// Register an access token for a user.
    pub fn add_session(&self, access_token: &str, user: AuthUser) {
        self.tables.sessions.insert(access_token.to_string(), user);
    }

    pub fn seed_profile(&self, profile: Profile) -> Profile {
        self.tables.profiles.insert(profile.id.clone(), profile)
    }

    pub fn seed_teacher(&self, teacher: Teacher) -> Teacher {
        self.tables.teachers.insert(teacher.id.clone(), teacher)
    }

    pub fn seed_course(&self, course: Course) -> Course {
        self.tables.courses.insert(course.id.clone(), course)
    }

    pub fn seed_live_class(&self, live_class: LiveClass) -> LiveClass {
        self.tables
            .live_classes
            .insert(live_class.id.clone(), live_class)
    }

    /// Every enrollment row, in insertion order.
    pub fn all_enrollments(&self) -> Vec<Enrollment> {
        self.tables.enrollments.filter(|_| true)
    }

    /// Every payment row, in insertion order.
    pub fn all_payments(&self) -> Vec<Payment> {
        self.tables.payments.filter(|_| true)
    }

    pub fn enrollment_count(&self) -> usize {
        self.tables.enrollments.len()
    }
}

impl Backend for MemoryBackend {
    type Auth = MemoryAuth;
    type Profiles = MemoryProfiles;
    type Catalog = MemoryCatalog;
    type Enrollments = MemoryEnrollments;
    type Payments = MemoryPayments;
    type Donations = MemoryDonations;
    type Chat = MemoryChat;

    fn auth(&self) -> &Self::Auth {
        &self.auth
    }

    fn profiles(&self) -> &Self::Profiles {
        &self.profiles
    }

    fn catalog(&self) -> &Self::Catalog {
        &self.catalog
    }

    fn enrollments(&self) -> &Self::Enrollments {
        &self.enrollments
    }

    fn payments(&self) -> &Self::Payments {
        &self.payments
    }

    fn donations(&self) -> &Self::Donations {
        &self.donations
    }

    fn chat(&self) -> &Self::Chat {
        &self.chat
    }
}

impl AuthRepository for MemoryAuth {
    async fn user_from_token(&self, access_token: &str) -> BackendResult<AuthUser> {
        self.tables
            .sessions
            .get(access_token)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| BackendError::Unauthorized {
                message: "invalid JWT".to_string(),
            })
    }
}

impl ProfileRepository for MemoryProfiles {
    async fn get(&self, id: &str) -> BackendResult<Profile> {
        self.tables
            .profiles
            .get(id)
            .ok_or_else(|| BackendError::not_found("profile", id))
    }

    async fn find_by_email(&self, email: &str) -> BackendResult<Option<Profile>> {
        Ok(self
            .tables
            .profiles
            .find(|p| p.email.as_deref() == Some(email)))
    }

    async fn list_teachers_by_status(&self, status: ApprovalStatus) -> BackendResult<Vec<Profile>> {
        Ok(self
            .tables
            .profiles
            .filter(|p| p.role == Role::Teacher && p.approval_status == Some(status)))
    }

    async fn set_approval_status(&self, id: &str, status: ApprovalStatus) -> BackendResult<Profile> {
        self.tables
            .profiles
            .update(id, |p| p.approval_status = Some(status))
            .ok_or_else(|| BackendError::not_found("profile", id))
    }

    async fn set_role(&self, id: &str, role: Role) -> BackendResult<Profile> {
        self.tables
            .profiles
            .update(id, |p| p.role = role)
            .ok_or_else(|| BackendError::not_found("profile", id))
    }
}

impl CatalogRepository for MemoryCatalog {
    async fn course(&self, id: &str) -> BackendResult<Course> {
        self.tables
            .courses
            .get(id)
            .ok_or_else(|| BackendError::not_found("course", id))
    }

    async fn live_class(&self, id: &str) -> BackendResult<LiveClass> {
        self.tables
            .live_classes
            .get(id)
            .ok_or_else(|| BackendError::not_found("live_class", id))
    }

    async fn list_courses(&self) -> BackendResult<Vec<Course>> {
        let mut courses = self.tables.courses.filter(|c| c.is_published);
        courses.reverse();
        Ok(courses)
    }

    async fn list_teachers(&self) -> BackendResult<Vec<Teacher>> {
        let mut teachers = self.tables.teachers.filter(|t| t.is_active);
        teachers.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(teachers)
    }
}

impl EnrollmentRepository for MemoryEnrollments {
    async fn find(&self, student_id: &str, target: &EnrollmentTarget) -> BackendResult<Option<Enrollment>> {
        Ok(self
            .tables
            .enrollments
            .find(|e| e.student_id == student_id && e.target().as_ref() == Some(target)))
    }

    async fn create(&self, enrollment: &NewEnrollment) -> BackendResult<Enrollment> {
        if enrollment.course_id.is_none() && enrollment.live_class_id.is_none() {
            return Err(BackendError::validation(
                "enrollment needs a course_id or live_class_id",
            ));
        }
        let row = Enrollment {
            id: new_id(),
            student_id: enrollment.student_id.clone(),
            course_id: enrollment.course_id.clone(),
            live_class_id: enrollment.live_class_id.clone(),
            enrolled_at: Some(Utc::now()),
        };
        Ok(self.tables.enrollments.insert(row.id.clone(), row))
    }
}

impl PaymentRepository for MemoryPayments {
    async fn create(&self, payment: &NewPayment) -> BackendResult<Payment> {
        let row = Payment {
            id: new_id(),
            user_id: payment.user_id.clone(),
            course_id: payment.course_id.clone(),
            live_class_id: payment.live_class_id.clone(),
            amount: payment.amount,
            currency: payment.currency.clone(),
            status: payment.status,
            stripe_session_id: Some(payment.stripe_session_id.clone()),
            created_at: Some(Utc::now()),
        };
        Ok(self.tables.payments.insert(row.id.clone(), row))
    }

    async fn find_by_session(&self, session_id: &str) -> BackendResult<Option<Payment>> {
        Ok(self
            .tables
            .payments
            .find(|p| p.stripe_session_id.as_deref() == Some(session_id)))
    }

    async fn set_status(&self, id: &str, status: PaymentStatus) -> BackendResult<Payment> {
        self.tables
            .payments
            .update(id, |p| p.status = status)
            .ok_or_else(|| BackendError::not_found("payment", id))
    }
}

impl DonationRepository for MemoryDonations {
    async fn create(&self, donation: &NewDonation) -> BackendResult<Donation> {
        let row = Donation {
            id: new_id(),
            donor_id: donation.donor_id.clone(),
            teacher_id: donation.teacher_id.clone(),
            donor_name: donation.donor_name.clone(),
            amount: donation.amount,
            currency: donation.currency.clone(),
            message: donation.message.clone(),
            created_at: Some(Utc::now()),
        };
        Ok(self.tables.donations.insert(row.id.clone(), row))
    }

    async fn list_for_teacher(&self, teacher_id: &str) -> BackendResult<Vec<Donation>> {
        let mut donations = self
            .tables
            .donations
            .filter(|d| d.teacher_id.as_deref() == Some(teacher_id));
        donations.reverse();
        Ok(donations)
    }
}

impl ChatRepository for MemoryChat {
    async fn conversation(&self, id: &str) -> BackendResult<Conversation> {
        self.tables
            .conversations
            .get(id)
            .ok_or_else(|| BackendError::not_found("conversation", id))
    }

    async fn find_conversation(&self, student_id: &str, teacher_id: &str) -> BackendResult<Option<Conversation>> {
        Ok(self
            .tables
            .conversations
            .find(|c| c.student_id == student_id && c.teacher_id == teacher_id))
    }

    async fn create_conversation(&self, conversation: &NewConversation) -> BackendResult<Conversation> {
        let row = Conversation {
            id: new_id(),
            student_id: conversation.student_id.clone(),
            teacher_id: conversation.teacher_id.clone(),
            created_at: Some(Utc::now()),
        };
        Ok(self.tables.conversations.insert(row.id.clone(), row))
    }

    async fn list_conversations(&self, user_id: &str) -> BackendResult<Vec<Conversation>> {
        let mut conversations = self
            .tables
            .conversations
            .filter(|c| c.has_participant(user_id));
        conversations.reverse();
        Ok(conversations)
    }

    async fn list_messages(&self, conversation_id: &str) -> BackendResult<Vec<ChatMessage>> {
        Ok(self
            .tables
            .messages
            .filter(|m| m.conversation_id == conversation_id))
    }

    async fn send_message(&self, message: &NewChatMessage) -> BackendResult<ChatMessage> {
        let row = ChatMessage {
            id: new_id(),
            conversation_id: message.conversation_id.clone(),
            sender_id: message.sender_id.clone(),
            content: message.content.clone(),
            created_at: Some(Utc::now()),
        };
        Ok(self.tables.messages.insert(row.id.clone(), row))
    }
}
