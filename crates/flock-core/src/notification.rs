//! Notification messages.
//!
//! A [`Notification`] is created by the router at event time and moved into
//! exactly one recipient mailbox. It is never mutated afterwards. Display
//! phrasing is the renderer's job; the core only carries the closed
//! [`NotificationKind`] tag.

use crate::account::AccountId;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// Someone liked the recipient's post.
    Like,
    /// Someone commented on the recipient's post.
    Comment,
    /// An account the recipient follows published a post.
    NewPost,
}

/// How the notification reached the recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryMode {
    /// Targeted action, signalled immediately and queued.
    Direct,
    /// Fan-out to followers, queued only.
    Broadcast,
}

/// A queued notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    initiator: AccountId,
    kind: NotificationKind,
    body: Option<String>,
    mode: DeliveryMode,
}

impl Notification {
    /// Notification for a targeted action.
    pub fn direct(initiator: AccountId, kind: NotificationKind, body: Option<String>) -> Self {
        Self { initiator, kind, body, mode: DeliveryMode::Direct }
    }

    /// Notification for a fan-out event.
    pub fn broadcast(initiator: AccountId, kind: NotificationKind) -> Self {
        Self { initiator, kind, body: None, mode: DeliveryMode::Broadcast }
    }

    /// Account that caused the notification.
    pub fn initiator(&self) -> AccountId {
        self.initiator
    }

    /// Notification kind.
    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Free-text body (comment text).
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Delivery mode.
    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }
}
