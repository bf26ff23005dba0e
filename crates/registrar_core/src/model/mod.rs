//! Course registration domain model.
//!
//! # Responsibility
//! - Define the records shared by repository, service and callers.
//!
//! # Invariants
//! - Identities (`id`) are assigned by the store and never reused.
//! - Records are never mutated or deleted once created.

pub mod course;
pub mod enrollment;
