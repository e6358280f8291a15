//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into request-level operations.
//! - Map entities to DTOs and failures to client-facing statuses.
//!
//! # Invariants
//! - Services hold no cross-request state; they are wired per connection.
//! - Services stay storage-agnostic and depend only on store traits.

pub mod error;
pub mod project_service;
pub mod response;
pub mod task_service;
pub mod user_service;
