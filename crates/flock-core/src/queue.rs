//! Per-account notification mailbox.
//!
//! Unbounded FIFO. [`NotificationQueue::drain_all`] is lazy: each message is
//! removed at the moment it is yielded, so a consumer that stops early leaves
//! the rest queued in order.

use std::collections::VecDeque;

use crate::notification::Notification;

/// FIFO of pending notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationQueue {
    pending: VecDeque<Notification>,
}

impl NotificationQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the tail.
    pub fn enqueue(&mut self, notification: Notification) {
        self.pending.push_back(notification);
    }

    /// Number of pending messages.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Oldest pending message, without removing it.
    pub fn peek(&self) -> Option<&Notification> {
        self.pending.front()
    }

    /// Pending messages in arrival order, without removing them.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.pending.iter()
    }

    /// Consume pending messages in arrival order.
    pub fn drain_all(&mut self) -> DrainAll<'_> {
        DrainAll { pending: &mut self.pending }
    }
}

/// Lazy draining iterator returned by [`NotificationQueue::drain_all`].
#[derive(Debug)]
pub struct DrainAll<'a> {
    pending: &'a mut VecDeque<Notification>,
}

impl Iterator for DrainAll<'_> {
    type Item = Notification;

    fn next(&mut self) -> Option<Self::Item> {
        self.pending.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.pending.len();
        (len, Some(len))
    }
}

impl ExactSizeIterator for DrainAll<'_> {}
