use serde::Serialize;
use tabled::{Table, Tabled};
use tracing::instrument;

use crate::backend::{ApprovalStatus, Profile, ProfileRepository, Role};
use crate::cli::error::{CliError, CliResult};
use crate::cli::utils::{apply_table_style, or_dash, truncate_with_ellipsis};

#[derive(Tabled)]
pub(crate) struct PendingTeacherDisplay {
    #[tabled(rename = "ID")]
    pub(crate) id: String,
    #[tabled(rename = "Name")]
    pub(crate) name: String,
    #[tabled(rename = "Email")]
    pub(crate) email: String,
    #[tabled(rename = "Signed up")]
    pub(crate) created_at: String,
}

impl From<&Profile> for PendingTeacherDisplay {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id.clone(),
            name: truncate_with_ellipsis(&or_dash(profile.full_name.as_deref()), 30),
            email: or_dash(profile.email.as_deref()),
            created_at: profile
                .created_at
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Serialize)]
struct PendingTeacherJson<'a> {
    id: &'a str,
    full_name: Option<&'a str>,
    email: Option<&'a str>,
    approval_status: ApprovalStatus,
}

/// List teachers awaiting approval
#[instrument(skip(profiles))]
pub async fn list_pending<P: ProfileRepository>(profiles: &P, format: &str) -> CliResult<String> {
    let pending = profiles
        .list_teachers_by_status(ApprovalStatus::Pending)
        .await?;

    match format {
        "json" => {
            let rows: Vec<PendingTeacherJson> = pending
                .iter()
                .map(|p| PendingTeacherJson {
                    id: &p.id,
                    full_name: p.full_name.as_deref(),
                    email: p.email.as_deref(),
                    approval_status: p.approval_status.unwrap_or_default(),
                })
                .collect();
            Ok(serde_json::to_string_pretty(&rows)?)
        }
        _ => {
            if pending.is_empty() {
                return Ok("No teachers awaiting approval.".to_string());
            }

            let display: Vec<PendingTeacherDisplay> =
                pending.iter().map(PendingTeacherDisplay::from).collect();
            let mut table = Table::new(display);
            apply_table_style(&mut table);
            Ok(table.to_string())
        }
    }
}

async fn set_status<P: ProfileRepository>(
    profiles: &P,
    id: &str,
    status: ApprovalStatus,
) -> CliResult<String> {
    let profile = profiles.get(id).await?;
    if profile.role != Role::Teacher {
        return Err(CliError::InvalidInput {
            message: format!("Profile '{}' is not a teacher (role: {})", id, profile.role),
        });
    }

    let updated = profiles.set_approval_status(id, status).await?;
    Ok(format!(
        "✓ Teacher {} is now {}",
        updated.display_name(),
        status
    ))
}

/// Approve a pending teacher
#[instrument(skip(profiles))]
pub async fn approve<P: ProfileRepository>(profiles: &P, id: &str) -> CliResult<String> {
    set_status(profiles, id, ApprovalStatus::Approved).await
}

/// Reject a teacher application
#[instrument(skip(profiles))]
pub async fn reject<P: ProfileRepository>(profiles: &P, id: &str) -> CliResult<String> {
    set_status(profiles, id, ApprovalStatus::Rejected).await
}
