//! Bearer-token extractors and role checks.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::{header, request::Parts};

use crate::access::{AccessDecision, evaluate};
use crate::api::{ApiError, AppState};
use crate::backend::{AuthRepository, AuthUser, Backend, Profile, ProfileRepository, Role};

/// An authenticated caller, resolved from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user: AuthUser,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl<B: Backend> FromRequestParts<AppState<B>> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState<B>) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;
        let user = state.backend().auth().user_from_token(token).await?;
        Ok(Caller { user })
    }
}

/// `Option<Caller>`: no header means anonymous, a bad token is still rejected.
impl<B: Backend> OptionalFromRequestParts<AppState<B>> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<B>,
    ) -> Result<Option<Self>, Self::Rejection> {
        if parts.headers.get(header::AUTHORIZATION).is_none() {
            return Ok(None);
        }
        <Caller as FromRequestParts<AppState<B>>>::from_request_parts(parts, state)
            .await
            .map(Some)
    }
}

impl Caller {
    /// The caller's profile, or `None` if no profile row exists yet.
    pub async fn profile<B: Backend>(&self, state: &AppState<B>) -> Result<Option<Profile>, ApiError> {
        match state.backend().profiles().get(&self.user.id).await {
            Ok(profile) => Ok(Some(profile)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Load the caller's profile and require it to pass the gate for `role`.
    pub async fn require_role<B: Backend>(&self, state: &AppState<B>, role: Role) -> Result<Profile, ApiError> {
        let profile = self.profile(state).await?;
        let decision = evaluate(role, profile.as_ref());
        match (decision, profile) {
            (AccessDecision::Granted, Some(profile)) => Ok(profile),
            (decision, _) => Err(denied(decision)),
        }
    }
}

/// Map a refused gate decision to an HTTP error.
pub fn denied(decision: AccessDecision) -> ApiError {
    match decision {
        AccessDecision::Unauthenticated => ApiError::Unauthorized("No profile for this user".to_string()),
        AccessDecision::RoleMismatch { required, actual } => {
            ApiError::Forbidden(format!("Requires role {} (caller is {})", required, actual))
        }
        AccessDecision::ApprovalPending => ApiError::Forbidden("Teacher approval pending".to_string()),
        AccessDecision::ApprovalRejected => ApiError::Forbidden("Teacher application rejected".to_string()),
        AccessDecision::Granted => ApiError::Internal("access granted".to_string()),
    }
}
