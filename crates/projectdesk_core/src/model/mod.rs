//! Domain entities and their boundary projections.
//!
//! # Responsibility
//! - Define the stored records for projects, users, and tasks.
//! - Define the DTOs handed across the service boundary.
//!
//! # Invariants
//! - Every entity carries a stable UUID identity generated on creation.
//! - Relations are held as ids (join rows, foreign keys), never object links.

pub mod project;
pub mod task;
pub mod user;
