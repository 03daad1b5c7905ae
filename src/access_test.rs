use crate::access::{AccessDecision, evaluate};
use crate::backend::{ApprovalStatus, Role};
use crate::test_support::profile;

#[test]
fn no_profile_is_unauthenticated() {
    let decision = evaluate(Role::Student, None);
    assert_eq!(decision, AccessDecision::Unauthenticated);
    assert_eq!(decision.redirect(), Some("/auth"));
}

#[test]
fn wrong_role_redirects_home() {
    let student = profile("s-1", Role::Student, None);
    let decision = evaluate(Role::Admin, Some(&student));
    assert_eq!(
        decision,
        AccessDecision::RoleMismatch {
            required: Role::Admin,
            actual: Role::Student
        }
    );
    assert_eq!(decision.redirect(), Some("/"));
}

#[test]
fn teacher_approval_states() {
    let cases = [
        (None, AccessDecision::ApprovalPending, Some("/pending-approval")),
        (
            Some(ApprovalStatus::Pending),
            AccessDecision::ApprovalPending,
            Some("/pending-approval"),
        ),
        (
            Some(ApprovalStatus::Rejected),
            AccessDecision::ApprovalRejected,
            Some("/rejected"),
        ),
        (Some(ApprovalStatus::Approved), AccessDecision::Granted, None),
    ];

    for (status, expected, redirect) in cases {
        let teacher = profile("t-1", Role::Teacher, status);
        let decision = evaluate(Role::Teacher, Some(&teacher));
        assert_eq!(decision, expected, "status {:?}", status);
        assert_eq!(decision.redirect(), redirect);
    }
}

#[test]
fn approval_status_is_ignored_for_other_roles() {
    let student = profile("s-1", Role::Student, Some(ApprovalStatus::Rejected));
    assert!(evaluate(Role::Student, Some(&student)).is_granted());

    let admin = profile("a-1", Role::Admin, None);
    assert!(evaluate(Role::Admin, Some(&admin)).is_granted());
}

#[test]
fn granted_iff_role_matches_and_teacher_is_approved() {
    let roles = [Role::Student, Role::Teacher, Role::Admin];
    let statuses = [
        None,
        Some(ApprovalStatus::Pending),
        Some(ApprovalStatus::Approved),
        Some(ApprovalStatus::Rejected),
    ];

    for required in roles {
        for actual in roles {
            for status in statuses {
                let p = profile("u-1", actual, status);
                let expected = actual == required
                    && (required != Role::Teacher || status == Some(ApprovalStatus::Approved));
                assert_eq!(
                    evaluate(required, Some(&p)).is_granted(),
                    expected,
                    "required {} actual {} status {:?}",
                    required,
                    actual,
                    status
                );
            }
        }
    }
}

#[test]
fn decision_serializes_with_tag() {
    let json = serde_json::to_value(AccessDecision::RoleMismatch {
        required: Role::Teacher,
        actual: Role::Student,
    })
    .unwrap();
    assert_eq!(json["decision"], "role_mismatch");
    assert_eq!(json["required"], "teacher");
    assert_eq!(json["actual"], "student");
}
