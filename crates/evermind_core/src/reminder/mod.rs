//! Reminder planning and the keyed one-shot timer registry.
//!
//! # Responsibility
//! - Decide which pending assignments get a reminder in the next window.
//! - Hold at most one timer per assignment and fire each one once.
//!
//! # Invariants
//! - Recomputing never stacks timers; each id is cancel-and-replace.
//! - Nothing is scheduled or fired while the notifier gate is closed.

pub mod notifier;
pub mod scheduler;
