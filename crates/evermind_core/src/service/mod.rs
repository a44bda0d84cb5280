//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate store, sync, view and reminder components into host-level
//!   entry points.
//! - Keep CLI and other hosts decoupled from storage details.

pub mod assignment_service;
