//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Seed each collection on first access.
//! - Keep HTTP/CLI layers decoupled from storage details.

pub mod credential;
pub mod error;
pub mod resident_service;
pub mod session_service;
pub mod user_service;
