mod commands;
pub mod error;
pub mod utils;


use std::net::IpAddr;

use clap::{Parser, Subcommand};

use crate::backend::{Backend, SupabaseBackend};
use crate::cli::commands::serve::ServeOptions;
use crate::cli::error::{CliError, CliResult};
use crate::config::Settings;

#[derive(Parser)]
#[command(name = "tutorhub")]
#[command(author, version, about = "Tutoring marketplace server and admin tools", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API and payment functions server
    Serve {
        /// Host address to bind to (default: TUTORHUB_HOST or 0.0.0.0)
        #[arg(long)]
        host: Option<IpAddr>,
        /// Port to listen on (default: TUTORHUB_PORT or 3737)
        #[arg(short, long)]
        port: Option<u16>,
        /// Serve interactive API docs at /docs
        #[arg(long)]
        docs: bool,
        /// Use a throwaway in-memory store instead of Supabase
        #[arg(long)]
        in_memory: bool,
    },
    /// Admin account bootstrap
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
    /// Teacher approval workflow
    Teachers {
        #[command(subcommand)]
        command: TeacherCommands,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Print the manual steps for creating an admin
    Instructions,
    /// Create a confirmed user and make it an admin
    Create {
        #[arg(long)]
        email: String,
        #[arg(long, env = "TUTORHUB_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
        /// Display name
        #[arg(long)]
        name: Option<String>,
    },
    /// Give an existing user the admin role
    Promote {
        /// Email of the user to promote
        email: String,
    },
}

#[derive(Subcommand)]
enum TeacherCommands {
    /// List teachers awaiting approval
    Pending {
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Approve a teacher
    Approve {
        /// Teacher profile ID
        id: String,
    },
    /// Reject a teacher
    Reject {
        /// Teacher profile ID
        id: String,
    },
}

fn supabase(settings: &Settings) -> CliResult<SupabaseBackend> {
    settings
        .supabase
        .as_ref()
        .map(SupabaseBackend::new)
        .ok_or(CliError::BackendNotConfigured)
}

async fn run_admin(settings: &Settings, command: AdminCommands) -> CliResult<String> {
    match command {
        AdminCommands::Instructions => Ok(commands::admin::instructions()),
        AdminCommands::Create {
            email,
            password,
            name,
        } => {
            let backend = supabase(settings)?;
            commands::admin::create(
                backend.auth(),
                backend.profiles(),
                &email,
                &password,
                name.as_deref(),
            )
            .await
        }
        AdminCommands::Promote { email } => {
            let backend = supabase(settings)?;
            commands::admin::promote(backend.profiles(), &email).await
        }
    }
}

async fn run_teachers(settings: &Settings, command: TeacherCommands) -> CliResult<String> {
    let backend = supabase(settings)?;
    match command {
        TeacherCommands::Pending { format } => {
            commands::teacher::list_pending(backend.profiles(), &format).await
        }
        TeacherCommands::Approve { id } => commands::teacher::approve(backend.profiles(), &id).await,
        TeacherCommands::Reject { id } => commands::teacher::reject(backend.profiles(), &id).await,
    }
}

/// Install logging before reading settings, which logs the `.env` outcome.
fn load_settings() -> miette::Result<Settings> {
    crate::api::init_tracing();
    Ok(Settings::from_env()?)
}

fn print_outcome(result: CliResult<String>) {
    match result {
        Ok(output) => println!("{}", output),
        Err(e) => eprintln!("Error: {}", e),
    }
}

pub async fn run() -> miette::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve {
            host,
            port,
            docs,
            in_memory,
        }) => {
            let settings = load_settings()?;
            commands::serve::run(
                settings,
                ServeOptions {
                    host,
                    port,
                    docs,
                    in_memory,
                },
            )
            .await?;
        }
        Some(Commands::Admin { command }) => {
            let settings = load_settings()?;
            print_outcome(run_admin(&settings, command).await);
        }
        Some(Commands::Teachers { command }) => {
            let settings = load_settings()?;
            print_outcome(run_teachers(&settings, command).await);
        }
        None => {
            // Show help when no command provided
            let _ = Cli::parse_from(["tutorhub", "--help"]);
        }
    }

    Ok(())
}
