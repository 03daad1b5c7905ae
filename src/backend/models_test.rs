//! Tests for domain models.

use crate::backend::models::*;

#[test]
fn role_and_approval_deserialize_from_database_format() {
    let teacher: Role = serde_json::from_str("\"teacher\"").unwrap();
    assert_eq!(teacher, Role::Teacher);

    let rejected: ApprovalStatus = serde_json::from_str("\"rejected\"").unwrap();
    assert_eq!(rejected, ApprovalStatus::Rejected);
}

#[test]
fn role_parses_and_displays_consistently() {
    for role in [Role::Student, Role::Teacher, Role::Admin] {
        let parsed: Role = role.to_string().parse().unwrap();
        assert_eq!(parsed, role);
    }
    assert!("superuser".parse::<Role>().is_err());
}

#[test]
fn gender_parse_is_case_insensitive() {
    assert_eq!("Male".parse::<Gender>().unwrap(), Gender::Male);
    assert_eq!("FEMALE".parse::<Gender>().unwrap(), Gender::Female);
    assert!("other".parse::<Gender>().is_err());
}

#[test]
fn odd_gender_values_do_not_break_row_decoding() {
    let teachers: Vec<Teacher> = serde_json::from_str(
        r#"[
            {"id": "t-1", "full_name": "Avi", "gender": "male"},
            {"id": "t-2", "full_name": "Dina", "gender": ""},
            {"id": "t-3", "full_name": "Miri", "gender": "other"},
            {"id": "t-4", "full_name": "Noa", "gender": null}
        ]"#,
    )
    .unwrap();
    let genders: Vec<_> = teachers.iter().map(|t| t.gender).collect();
    assert_eq!(genders, vec![Some(Gender::Male), None, None, None]);

    let profile: Profile =
        serde_json::from_str(r#"{"id": "u-1", "gender": "Female"}"#).unwrap();
    assert_eq!(profile.gender, Some(Gender::Female));

    let profile: Profile = serde_json::from_str(r#"{"id": "u-2", "gender": " MALE "}"#).unwrap();
    assert_eq!(profile.gender, Some(Gender::Male));
}

#[test]
fn unknown_audience_tags_deserialize_as_other() {
    let tags: Vec<Audience> = serde_json::from_str(r#"["men", "seniors"]"#).unwrap();
    assert_eq!(tags, vec![Audience::Men, Audience::Other]);
}

#[test]
fn profile_tolerates_sparse_rows() {
    let profile: Profile = serde_json::from_str(
        r#"{"id": "u-1", "role": "teacher", "approval_status": null, "audiences": null}"#,
    )
    .unwrap();
    assert_eq!(profile.role, Role::Teacher);
    assert_eq!(profile.approval_status, None);
    assert!(profile.audiences.is_empty());
    assert_eq!(profile.display_name(), "-");
}

#[test]
fn course_reads_target_audience_and_numeric_price() {
    let course: Course = serde_json::from_str(
        r#"{
            "id": "c-1",
            "title": "Intro to Hebrew",
            "price": "120.50",
            "is_free": null,
            "target_audience": ["women", "children"],
            "created_at": "2025-03-01T10:00:00.123456+00:00"
        }"#,
    )
    .unwrap();
    assert_eq!(course.price, Some(120.5));
    assert!(!course.is_free);
    assert!(course.is_published);
    assert_eq!(course.audiences, vec![Audience::Women, Audience::Children]);
    assert!(course.created_at.is_some());
}

#[test]
fn new_enrollment_only_serializes_the_target_column() {
    let course = NewEnrollment::new("u-1", &EnrollmentTarget::course("c-1"));
    let json = serde_json::to_value(&course).unwrap();
    assert_eq!(json["course_id"], "c-1");
    assert!(json.get("live_class_id").is_none());

    let live = NewEnrollment::new("u-1", &EnrollmentTarget::live_class("l-1"));
    let json = serde_json::to_value(&live).unwrap();
    assert_eq!(json["live_class_id"], "l-1");
    assert!(json.get("course_id").is_none());
}

#[test]
fn payment_target_falls_back_to_live_class_column() {
    let payment: Payment = serde_json::from_str(
        r#"{"id": "p-1", "user_id": "u-1", "live_class_id": "l-9",
            "amount": 30, "currency": "usd", "status": "pending"}"#,
    )
    .unwrap();
    assert_eq!(payment.target(), Some(EnrollmentTarget::live_class("l-9")));
    assert_eq!(payment.status, PaymentStatus::Pending);
}

#[test]
fn item_kind_maps_to_foreign_key_columns() {
    assert_eq!(ItemKind::Course.column(), "course_id");
    assert_eq!(ItemKind::LiveClass.column(), "live_class_id");
    assert_eq!("live_class".parse::<ItemKind>().unwrap(), ItemKind::LiveClass);
}

#[test]
fn conversation_participants() {
    let conversation = Conversation {
        id: "conv-1".to_string(),
        student_id: "s-1".to_string(),
        teacher_id: "t-1".to_string(),
        created_at: None,
    };
    assert!(conversation.has_participant("s-1"));
    assert!(conversation.has_participant("t-1"));
    assert!(!conversation.has_participant("x-1"));
}
