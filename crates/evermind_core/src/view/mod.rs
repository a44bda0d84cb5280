//! Read-only projections over the assignment collection.
//!
//! # Responsibility
//! - Derive the today list, the filtered/sorted list and the week grid.
//! - Return plain data; rendering belongs to the host.
//!
//! # Invariants
//! - Projections never mutate the collection.
//! - Zero matches is `ViewState::Empty`, distinct from `NotLoaded`.
//! - Same inputs always produce identical output.

pub mod projector;
pub mod week;

use serde::Serialize;

/// Load/empty/ready envelope shared by every projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ViewState<T> {
    /// No session has been loaded yet.
    NotLoaded,
    /// Loaded, but nothing matched.
    Empty,
    Ready(T),
}

impl<T> ViewState<T> {
    pub fn is_loaded(&self) -> bool {
        !matches!(self, Self::NotLoaded)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ViewState<U> {
        match self {
            Self::NotLoaded => ViewState::NotLoaded,
            Self::Empty => ViewState::Empty,
            Self::Ready(value) => ViewState::Ready(f(value)),
        }
    }
}

impl<T> ViewState<Vec<T>> {
    /// `Empty` for an empty list, `Ready` otherwise.
    pub fn from_items(items: Vec<T>) -> Self {
        if items.is_empty() {
            Self::Empty
        } else {
            Self::Ready(items)
        }
    }

    /// Items when ready; an empty slice for `Empty` and `NotLoaded`.
    pub fn items(&self) -> &[T] {
        match self {
            Self::Ready(items) => items,
            _ => &[],
        }
    }
}
