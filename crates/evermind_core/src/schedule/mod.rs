//! Time classification of assignments relative to "now".
//!
//! # Invariants
//! - Classification is pure: no clock reads, no side effects.
//! - `overdue`, `due_today`, `due_soon` are computed independently.

pub mod classifier;
