//! Synchronization between the in-memory store, a local cache and a
//! per-user remote document.
//!
//! # Responsibility
//! - Define collaborator contracts (`IdentityProvider`, `RemoteStore`,
//!   `LocalCache`).
//! - Provide the bridge that loads a session and mirrors snapshots.
//! - Ship in-memory and SQLite-backed collaborator implementations.
//!
//! # Invariants
//! - The remote document is replaced wholesale; there is no merge.
//! - Sync failures are reported to the caller, never raised as panics.

pub mod bridge;
pub mod collaborators;
pub mod memory;
pub mod sqlite;
