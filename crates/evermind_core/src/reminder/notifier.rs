//! Notification-permission collaborator.

use std::cell::{Cell, RefCell};

/// Host-side notification capability.
///
/// `is_enabled` is the user's in-app preference; `is_permitted` is the
/// platform grant. Both must hold before any reminder is scheduled.
pub trait Notifier {
    fn is_enabled(&self) -> bool;
    fn is_permitted(&self) -> bool;
    fn fire(&self, title: &str, body: &str);

    /// Combined gate checked by the scheduler.
    fn can_notify(&self) -> bool {
        self.is_enabled() && self.is_permitted()
    }
}

/// Notifier that never allows notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNotifier;

impl Notifier for DisabledNotifier {
    fn is_enabled(&self) -> bool {
        false
    }

    fn is_permitted(&self) -> bool {
        false
    }

    fn fire(&self, _title: &str, _body: &str) {}
}

/// One delivered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredNotification {
    pub title: String,
    pub body: String,
}

/// In-memory notifier that records what it was asked to show.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    enabled: Cell<bool>,
    permitted: Cell<bool>,
    fired: RefCell<Vec<FiredNotification>>,
}

impl RecordingNotifier {
    /// Enabled and permitted.
    pub fn allowing() -> Self {
        let notifier = Self::default();
        notifier.set_enabled(true);
        notifier.set_permitted(true);
        notifier
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    pub fn set_permitted(&self, permitted: bool) {
        self.permitted.set(permitted);
    }

    pub fn fired(&self) -> Vec<FiredNotification> {
        self.fired.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    fn is_permitted(&self) -> bool {
        self.permitted.get()
    }

    fn fire(&self, title: &str, body: &str) {
        self.fired.borrow_mut().push(FiredNotification {
            title: title.to_string(),
            body: body.to_string(),
        });
    }
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }

    fn is_permitted(&self) -> bool {
        (**self).is_permitted()
    }

    fn fire(&self, title: &str, body: &str) {
        (**self).fire(title, body)
    }
}

impl<N: Notifier + ?Sized> Notifier for std::rc::Rc<N> {
    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }

    fn is_permitted(&self) -> bool {
        (**self).is_permitted()
    }

    fn fire(&self, title: &str, body: &str) {
        (**self).fire(title, body)
    }
}
