//! Assignment domain model and persisted document shape.
//!
//! # Responsibility
//! - Define the canonical assignment record shared by every view.
//! - Define the `{ events: [...] }` document exchanged with caches and
//!   remote stores.
//!
//! # Invariants
//! - Every assignment is identified by a stable `AssignmentId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod assignment;
pub mod document;
