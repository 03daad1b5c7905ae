//! Role and approval gate for dashboard routes.
//!
//! A route declares the role it requires; [`evaluate`] decides whether the
//! caller's profile may enter and, if not, where the client should be sent.

use serde::Serialize;

use crate::backend::{ApprovalStatus, Profile, Role};

/// Outcome of checking a profile against a required role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    Granted,
    /// No signed-in profile
    Unauthenticated,
    /// Signed in with a different role
    RoleMismatch { required: Role, actual: Role },
    /// Teacher whose approval is pending or was never set
    ApprovalPending,
    ApprovalRejected,
}

impl AccessDecision {
    pub fn is_granted(self) -> bool {
        matches!(self, AccessDecision::Granted)
    }

    pub fn name(self) -> &'static str {
        match self {
            AccessDecision::Granted => "granted",
            AccessDecision::Unauthenticated => "unauthenticated",
            AccessDecision::RoleMismatch { .. } => "role_mismatch",
            AccessDecision::ApprovalPending => "approval_pending",
            AccessDecision::ApprovalRejected => "approval_rejected",
        }
    }

    /// Client route to redirect to, `None` when access is granted.
    pub fn redirect(self) -> Option<&'static str> {
        match self {
            AccessDecision::Granted => None,
            AccessDecision::Unauthenticated => Some("/auth"),
            AccessDecision::RoleMismatch { .. } => Some("/"),
            AccessDecision::ApprovalPending => Some("/pending-approval"),
            AccessDecision::ApprovalRejected => Some("/rejected"),
        }
    }
}

/// Decide whether `profile` may enter a route that requires `required`.
pub fn evaluate(required: Role, profile: Option<&Profile>) -> AccessDecision {
    let Some(profile) = profile else {
        return AccessDecision::Unauthenticated;
    };

    if profile.role != required {
        return AccessDecision::RoleMismatch {
            required,
            actual: profile.role,
        };
    }

    if required == Role::Teacher {
        match profile.approval_status {
            None | Some(ApprovalStatus::Pending) => return AccessDecision::ApprovalPending,
            Some(ApprovalStatus::Rejected) => return AccessDecision::ApprovalRejected,
            Some(ApprovalStatus::Approved) => {}
        }
    }

    AccessDecision::Granted
}
