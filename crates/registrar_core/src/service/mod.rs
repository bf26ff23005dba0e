//! Core use-case services.
//!
//! # Responsibility
//! - Own business rules between callers and repositories.
//! - Keep callers decoupled from storage details.

pub mod enrollment_service;
