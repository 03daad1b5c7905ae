//! Admin bootstrap: there is no way to become an admin from the app itself.

use tracing::{info, instrument};

use crate::backend::{ProfileRepository, Role, SupabaseAuth};
use crate::cli::error::{CliError, CliResult};

/// Manual steps for creating the first admin from the project dashboard.
pub fn instructions() -> String {
    [
        "To create an admin user by hand:",
        "",
        "  1. Sign up in the app with the email you want to use.",
        "  2. Open the Supabase dashboard, Table Editor, `profiles`.",
        "  3. Find the row with that email and set `role` to `admin`.",
        "  4. Sign out and back in; the admin dashboard is at /admin.",
        "",
        "Or let this CLI do it:",
        "",
        "  tutorhub admin create --email admin@example.com --password <secret>",
        "  tutorhub admin promote someone@example.com",
    ]
    .join("\n")
}

fn validate_credentials(email: &str, password: &str) -> CliResult<()> {
    if !email.contains('@') {
        return Err(CliError::InvalidInput {
            message: format!("'{}' is not an email address", email),
        });
    }
    if password.chars().count() < 6 {
        return Err(CliError::InvalidInput {
            message: "Password must be at least 6 characters".to_string(),
        });
    }
    Ok(())
}

/// Create a confirmed auth user and mark its profile as admin.
#[instrument(skip(auth, profiles, password))]
pub async fn create<P: ProfileRepository>(
    auth: &SupabaseAuth,
    profiles: &P,
    email: &str,
    password: &str,
    name: Option<&str>,
) -> CliResult<String> {
    validate_credentials(email, password)?;

    let user = auth.admin_create_user(email, password, name).await?;
    info!(user_id = %user.id, "Created auth user");

    // The signup trigger creates the profile with the default role.
    profiles.set_role(&user.id, Role::Admin).await?;

    Ok(format!("✓ Created admin {} ({})", email, user.id))
}

/// Set an existing profile's role to admin.
#[instrument(skip(profiles))]
pub async fn promote<P: ProfileRepository>(profiles: &P, email: &str) -> CliResult<String> {
    let profile = profiles
        .find_by_email(email)
        .await?
        .ok_or_else(|| CliError::ProfileNotFound {
            email: email.to_string(),
        })?;

    if profile.role == Role::Admin {
        return Ok(format!("{} is already an admin", email));
    }

    let updated = profiles.set_role(&profile.id, Role::Admin).await?;
    Ok(format!(
        "✓ Promoted {} from {} to {}",
        email, profile.role, updated.role
    ))
}
