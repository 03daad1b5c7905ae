//! Data access layer.
//!
//! Trait-based abstractions over the marketplace tables, with two
//! implementations: the managed backend reached over HTTP and an
//! in-memory store.
//!
//! # Architecture
//!
//! - `error`: Backend-agnostic error types
//! - `models`: Table rows and insert payloads
//! - `query`: PostgREST filter builder
//! - `repository`: Trait definitions for data access
//! - `supabase`: HTTP implementation
//! - `memory`: In-memory implementation

mod error;
mod memory;
mod models;
mod query;
mod repository;
mod supabase;

#[cfg(test)]
mod error_test;
#[cfg(test)]
mod memory_test;
#[cfg(test)]
mod models_test;

pub use error::{BackendError, BackendResult, ROW_NOT_FOUND_CODE};
pub use memory::MemoryBackend;
pub use models::*;
pub use query::Query;
pub use repository::*;
pub use supabase::{SignUpMetadata, SupabaseAuth, SupabaseBackend, SupabaseClient};
