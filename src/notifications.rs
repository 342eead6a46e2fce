//! Notifications
//!
//! Short toast messages reporting the outcome of a cart change. Only one
//! notification is active at a time; showing a new one replaces the current one.

use jiff::{SignedDuration, Timestamp};

use crate::store::ChangeKind;

/// Message shown when a new line is added.
pub const ITEM_ADDED: &str = "Added to cart!";

/// Message shown when a line's quantity changes.
pub const QUANTITY_UPDATED: &str = "Quantity updated in cart!";

/// Message shown when a line is removed.
pub const ITEM_REMOVED: &str = "Item removed from cart";

/// The toast message for a change, if it warrants one.
pub fn message_for(change: ChangeKind) -> Option<&'static str> {
    match change {
        ChangeKind::ItemAdded => Some(ITEM_ADDED),
        ChangeKind::QuantityUpdated => Some(QUANTITY_UPDATED),
        ChangeKind::ItemRemoved => Some(ITEM_REMOVED),
        ChangeKind::NotFound => None,
    }
}

/// How long a notification stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationTiming {
    /// Fully visible period
    pub visible: SignedDuration,

    /// Fade-out period following the visible one
    pub fade: SignedDuration,
}

impl Default for NotificationTiming {
    fn default() -> Self {
        Self {
            visible: SignedDuration::from_millis(2500),
            fade: SignedDuration::from_millis(300),
        }
    }
}

/// Display phase of the active notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fully visible
    Visible,

    /// Fading out
    Fading,
}

/// A notification on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Text shown to the user
    pub message: String,

    /// When it was shown
    pub shown_at: Timestamp,
}

/// Single-slot notification state.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    timing: NotificationTiming,
    active: Option<Notification>,
}

impl Notifier {
    /// Create a notifier with the given timing.
    #[must_use]
    pub fn new(timing: NotificationTiming) -> Self {
        Self {
            timing,
            active: None,
        }
    }

    /// Show `message`, replacing any active notification.
    pub fn show(&mut self, message: impl Into<String>, now: Timestamp) -> &Notification {
        self.active.insert(Notification {
            message: message.into(),
            shown_at: now,
        })
    }

    /// Show the message for `change`. Changes without a message leave the
    /// current notification alone.
    pub fn notify(&mut self, change: ChangeKind, now: Timestamp) -> Option<&Notification> {
        let message = message_for(change)?;

        Some(self.show(message, now))
    }

    /// The phase of the active notification at `now`, `None` once it has expired.
    #[must_use]
    pub fn phase(&self, now: Timestamp) -> Option<Phase> {
        let active = self.active.as_ref()?;
        let elapsed = now.duration_since(active.shown_at);

        if elapsed < self.timing.visible {
            Some(Phase::Visible)
        } else if elapsed < self.timing.visible.saturating_add(self.timing.fade) {
            Some(Phase::Fading)
        } else {
            None
        }
    }

    /// The notification on screen at `now`, clearing it once it has expired.
    pub fn current(&mut self, now: Timestamp) -> Option<(&Notification, Phase)> {
        let Some(phase) = self.phase(now) else {
            self.active = None;
            return None;
        };

        self.active.as_ref().map(|notification| (notification, phase))
    }

    /// Remove the active notification immediately.
    pub fn dismiss(&mut self) {
        self.active = None;
    }
}
