//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into the use cases the UI screens trigger.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod task_service;
