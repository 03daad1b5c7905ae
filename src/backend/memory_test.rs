//! Tests for MemoryBackend.

use crate::backend::{
    ApprovalStatus, AuthRepository, Backend, CatalogRepository, ChatRepository,
    DonationRepository, EnrollmentRepository, EnrollmentTarget, MemoryBackend, NewChatMessage,
    NewConversation, NewDonation, NewEnrollment, NewPayment, PaymentRepository, PaymentStatus,
    ProfileRepository, Role,
};
use crate::test_support::{course, profile, sign_in, teacher};

#[tokio::test(flavor = "multi_thread")]
async fn tokens_resolve_only_when_registered() {
    let backend = MemoryBackend::new();
    let token = sign_in(&backend, profile("s-1", Role::Student, None));

    let user = backend.auth().user_from_token(&token).await.unwrap();
    assert_eq!(user.id, "s-1");

    let err = backend.auth().user_from_token("bogus").await.unwrap_err();
    assert!(matches!(err, crate::backend::BackendError::Unauthorized { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn profile_updates_and_status_listing() {
    let backend = MemoryBackend::new();
    backend.seed_profile(profile("t-1", Role::Teacher, Some(ApprovalStatus::Pending)));
    backend.seed_profile(profile("t-2", Role::Teacher, Some(ApprovalStatus::Approved)));
    backend.seed_profile(profile("s-1", Role::Student, Some(ApprovalStatus::Pending)));

    let pending = backend
        .profiles()
        .list_teachers_by_status(ApprovalStatus::Pending)
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, "t-1");

    let approved = backend
        .profiles()
        .set_approval_status("t-1", ApprovalStatus::Approved)
        .await
        .unwrap();
    assert_eq!(approved.approval_status, Some(ApprovalStatus::Approved));

    let promoted = backend.profiles().set_role("s-1", Role::Admin).await.unwrap();
    assert_eq!(promoted.role, Role::Admin);

    let found = backend
        .profiles()
        .find_by_email("s-1@example.com")
        .await
        .unwrap();
    assert_eq!(found.map(|p| p.role), Some(Role::Admin));

    let err = backend.profiles().get("missing").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test(flavor = "multi_thread")]
async fn catalog_lists_only_visible_rows() {
    let backend = MemoryBackend::new();
    backend.seed_course(course("c-1", Some(10.0), false));
    let mut draft = course("c-2", None, true);
    draft.is_published = false;
    backend.seed_course(draft);
    backend.seed_course(course("c-3", None, true));

    let courses = backend.catalog().list_courses().await.unwrap();
    let ids: Vec<_> = courses.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["c-3", "c-1"]);

    backend.seed_teacher(teacher("t-2", "Zara", None, &[]));
    backend.seed_teacher(teacher("t-1", "Avi", None, &[]));
    let mut retired = teacher("t-3", "Moshe", None, &[]);
    retired.is_active = false;
    backend.seed_teacher(retired);

    let teachers = backend.catalog().list_teachers().await.unwrap();
    let names: Vec<_> = teachers.iter().map(|t| t.full_name.as_str()).collect();
    assert_eq!(names, vec!["Avi", "Zara"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn enrollments_are_keyed_by_student_and_target() {
    let backend = MemoryBackend::new();
    let target = EnrollmentTarget::course("c-1");

    backend
        .enrollments()
        .create(&NewEnrollment::new("s-1", &target))
        .await
        .unwrap();

    assert!(backend.enrollments().find("s-1", &target).await.unwrap().is_some());
    assert!(
        backend
            .enrollments()
            .find("s-1", &EnrollmentTarget::live_class("c-1"))
            .await
            .unwrap()
            .is_none()
    );
    assert!(backend.enrollments().find("s-2", &target).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn payments_are_found_by_session_and_updated() {
    let backend = MemoryBackend::new();
    let payment = backend
        .payments()
        .create(&NewPayment::pending(
            "s-1",
            &EnrollmentTarget::live_class("l-1"),
            25.0,
            "usd",
            "cs_1",
        ))
        .await
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Pending);

    let found = backend.payments().find_by_session("cs_1").await.unwrap().unwrap();
    assert_eq!(found.id, payment.id);

    let completed = backend
        .payments()
        .set_status(&payment.id, PaymentStatus::Completed)
        .await
        .unwrap();
    assert_eq!(completed.status, PaymentStatus::Completed);
    assert!(backend.payments().find_by_session("cs_2").await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn donations_list_newest_first() {
    let backend = MemoryBackend::new();
    for amount in [5.0, 10.0] {
        backend
            .donations()
            .create(&NewDonation {
                donor_id: None,
                teacher_id: Some("t-1".to_string()),
                donor_name: Some("Anon".to_string()),
                amount,
                currency: "usd".to_string(),
                message: None,
            })
            .await
            .unwrap();
    }

    let donations = backend.donations().list_for_teacher("t-1").await.unwrap();
    let amounts: Vec<_> = donations.iter().map(|d| d.amount).collect();
    assert_eq!(amounts, vec![10.0, 5.0]);
    assert!(backend.donations().list_for_teacher("t-2").await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn chat_threads_keep_message_order() {
    let backend = MemoryBackend::new();
    let chat = backend.chat();

    let conversation = chat
        .create_conversation(&NewConversation {
            student_id: "s-1".to_string(),
            teacher_id: "t-1".to_string(),
        })
        .await
        .unwrap();

    for content in ["hello", "shalom"] {
        chat.send_message(&NewChatMessage {
            conversation_id: conversation.id.clone(),
            sender_id: "s-1".to_string(),
            content: content.to_string(),
        })
        .await
        .unwrap();
    }

    let messages = chat.list_messages(&conversation.id).await.unwrap();
    let contents: Vec<_> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["hello", "shalom"]);

    assert!(chat.find_conversation("s-1", "t-1").await.unwrap().is_some());
    assert_eq!(chat.list_conversations("t-1").await.unwrap().len(), 1);
    assert!(chat.list_conversations("s-2").await.unwrap().is_empty());
}
