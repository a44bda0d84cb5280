//! Canonical in-memory assignment collection.
//!
//! # Responsibility
//! - Own the ordered list every view and reminder pass reads from.
//! - Enforce id uniqueness and add-time validation.
//!
//! # Invariants
//! - Insertion order is preserved; views sort copies, never the store.
//! - Unknown ids on toggle/delete are silent no-ops.

pub mod assignment_store;
