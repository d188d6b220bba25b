//! Notification Router
//!
//! Computes the recipients of an event and writes a message into each
//! recipient's mailbox.
//!
//! ## Rules
//!
//! - Direct events (like, comment): single recipient, the post owner. Queued
//!   and signalled immediately via [`RouterAction::Delivered`].
//! - Broadcast events (new post): every follower of the initiator at event
//!   time, in follower-set order. Queued only, no signal.
//! - The initiator never receives its own notification. For direct events
//!   this suppresses the whole event.
//!
//! ## Design
//!
//! - Routing does not validate. Connection and credential checks happen
//!   before the router is called, so routing cannot fail.
//! - Mailboxes are reached through the [`Mailboxes`] trait, so the router
//!   does not depend on how accounts are stored.
//! - Action-based: the immediate signal is returned, never printed.

use crate::{
    account::AccountId,
    graph::FollowGraph,
    notification::{Notification, NotificationKind},
};

/// Write access to recipient mailboxes.
pub trait Mailboxes {
    /// Append `notification` to `recipient`'s mailbox.
    ///
    /// Returns false if `recipient` has no mailbox.
    fn deliver(&mut self, recipient: AccountId, notification: Notification) -> bool;
}

/// Event handed to the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteEvent {
    /// `initiator` liked a post owned by `recipient`.
    Like {
        /// Account that liked.
        initiator: AccountId,
        /// Post owner.
        recipient: AccountId,
    },

    /// `initiator` commented on a post owned by `recipient`.
    Comment {
        /// Account that commented.
        initiator: AccountId,
        /// Post owner.
        recipient: AccountId,
        /// Comment text.
        body: String,
    },

    /// `initiator` published a post.
    NewPost {
        /// Publishing account.
        initiator: AccountId,
    },
}

impl RouteEvent {
    /// Account that caused the event.
    pub fn initiator(&self) -> AccountId {
        match self {
            Self::Like { initiator, .. }
            | Self::Comment { initiator, .. }
            | Self::NewPost { initiator } => *initiator,
        }
    }

    /// Notification kind this event produces.
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::Like { .. } => NotificationKind::Like,
            Self::Comment { .. } => NotificationKind::Comment,
            Self::NewPost { .. } => NotificationKind::NewPost,
        }
    }
}

/// Actions returned by the router for the caller to surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterAction {
    /// A direct notification was queued and should be signalled now.
    Delivered {
        /// Account that received it.
        recipient: AccountId,
        /// Copy of the queued message.
        notification: Notification,
    },
}

/// Running totals, for logs and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouterStats {
    /// Direct messages queued.
    pub direct: u64,
    /// Broadcast messages queued.
    pub broadcast: u64,
    /// Messages not created because the recipient was the initiator.
    pub suppressed: u64,
    /// Messages dropped because the recipient had no mailbox.
    pub undeliverable: u64,
}

/// Fans events out to mailboxes.
#[derive(Debug, Clone, Default)]
pub struct NotificationRouter {
    stats: RouterStats,
}

impl NotificationRouter {
    /// Create a router with zeroed stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Totals since creation.
    pub fn stats(&self) -> RouterStats {
        self.stats
    }

    /// Route one event.
    ///
    /// Broadcast recipients are read from `graph` once, before any message is
    /// queued. Later graph changes do not affect this event.
    pub fn route<M>(
        &mut self,
        event: RouteEvent,
        graph: &FollowGraph,
        mailboxes: &mut M,
    ) -> Vec<RouterAction>
    where
        M: Mailboxes + ?Sized,
    {
        match event {
            RouteEvent::Like { initiator, recipient } => {
                self.route_direct(initiator, recipient, NotificationKind::Like, None, mailboxes)
            },
            RouteEvent::Comment { initiator, recipient, body } => self.route_direct(
                initiator,
                recipient,
                NotificationKind::Comment,
                Some(body),
                mailboxes,
            ),
            RouteEvent::NewPost { initiator } => {
                let recipients = graph.followers_of(initiator);
                self.route_broadcast(initiator, NotificationKind::NewPost, &recipients, mailboxes);
                Vec::new()
            },
        }
    }

    fn route_direct<M>(
        &mut self,
        initiator: AccountId,
        recipient: AccountId,
        kind: NotificationKind,
        body: Option<String>,
        mailboxes: &mut M,
    ) -> Vec<RouterAction>
    where
        M: Mailboxes + ?Sized,
    {
        if initiator == recipient {
            self.stats.suppressed += 1;
            tracing::trace!(%initiator, ?kind, "self notification suppressed");
            return Vec::new();
        }

        let notification = Notification::direct(initiator, kind, body);
        if !mailboxes.deliver(recipient, notification.clone()) {
            self.stats.undeliverable += 1;
            tracing::warn!(%initiator, %recipient, ?kind, "no mailbox for recipient");
            return Vec::new();
        }

        self.stats.direct += 1;
        tracing::debug!(%initiator, %recipient, ?kind, "direct notification queued");

        vec![RouterAction::Delivered { recipient, notification }]
    }

    fn route_broadcast<M>(
        &mut self,
        initiator: AccountId,
        kind: NotificationKind,
        recipients: &[AccountId],
        mailboxes: &mut M,
    ) where
        M: Mailboxes + ?Sized,
    {
        for &recipient in recipients {
            if recipient == initiator {
                self.stats.suppressed += 1;
                continue;
            }

            if mailboxes.deliver(recipient, Notification::broadcast(initiator, kind)) {
                self.stats.broadcast += 1;
            } else {
                self.stats.undeliverable += 1;
                tracing::warn!(%initiator, %recipient, ?kind, "no mailbox for recipient");
            }
        }

        tracing::debug!(%initiator, ?kind, recipients = recipients.len(), "broadcast queued");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::notification::DeliveryMode;

    /// Mailboxes keyed by id; ids not present have no mailbox.
    #[derive(Default)]
    struct TestMailboxes(HashMap<AccountId, Vec<Notification>>);

    impl TestMailboxes {
        fn with(ids: &[AccountId]) -> Self {
            Self(ids.iter().map(|id| (*id, Vec::new())).collect())
        }

        fn of(&self, id: AccountId) -> &[Notification] {
            self.0.get(&id).map(Vec::as_slice).unwrap_or_default()
        }
    }

    impl Mailboxes for TestMailboxes {
        fn deliver(&mut self, recipient: AccountId, notification: Notification) -> bool {
            match self.0.get_mut(&recipient) {
                Some(queue) => {
                    queue.push(notification);
                    true
                },
                None => false,
            }
        }
    }

    const OWNER: AccountId = AccountId::new(0);
    const F1: AccountId = AccountId::new(1);
    const F2: AccountId = AccountId::new(2);

    #[test]
    fn like_queues_and_signals() {
        let mut router = NotificationRouter::new();
        let mut mailboxes = TestMailboxes::with(&[OWNER, F1]);
        let graph = FollowGraph::new();

        let actions =
            router.route(RouteEvent::Like { initiator: F1, recipient: OWNER }, &graph, &mut mailboxes);

        let expected = Notification::direct(F1, NotificationKind::Like, None);
        assert_eq!(mailboxes.of(OWNER), &[expected.clone()]);
        assert_eq!(
            actions,
            vec![RouterAction::Delivered { recipient: OWNER, notification: expected }]
        );
        assert_eq!(router.stats().direct, 1);
    }

    #[test]
    fn comment_carries_body() {
        let mut router = NotificationRouter::new();
        let mut mailboxes = TestMailboxes::with(&[OWNER, F1]);
        let graph = FollowGraph::new();

        router.route(
            RouteEvent::Comment { initiator: F1, recipient: OWNER, body: "nice".to_string() },
            &graph,
            &mut mailboxes,
        );

        let queued = &mailboxes.of(OWNER)[0];
        assert_eq!(queued.kind(), NotificationKind::Comment);
        assert_eq!(queued.body(), Some("nice"));
        assert_eq!(queued.mode(), DeliveryMode::Direct);
    }

    #[test]
    fn self_like_is_suppressed() {
        let mut router = NotificationRouter::new();
        let mut mailboxes = TestMailboxes::with(&[OWNER]);
        let graph = FollowGraph::new();

        let actions = router.route(
            RouteEvent::Like { initiator: OWNER, recipient: OWNER },
            &graph,
            &mut mailboxes,
        );

        assert!(actions.is_empty());
        assert!(mailboxes.of(OWNER).is_empty());
        assert_eq!(router.stats().suppressed, 1);
        assert_eq!(router.stats().direct, 0);
    }

    #[test]
    fn new_post_fans_out_to_followers_silently() {
        let mut router = NotificationRouter::new();
        let mut mailboxes = TestMailboxes::with(&[OWNER, F1, F2]);
        let mut graph = FollowGraph::new();
        graph.follow(F1, OWNER).unwrap();
        graph.follow(F2, OWNER).unwrap();

        let actions = router.route(RouteEvent::NewPost { initiator: OWNER }, &graph, &mut mailboxes);

        assert!(actions.is_empty());
        let expected = Notification::broadcast(OWNER, NotificationKind::NewPost);
        assert_eq!(mailboxes.of(F1), &[expected.clone()]);
        assert_eq!(mailboxes.of(F2), &[expected]);
        assert!(mailboxes.of(OWNER).is_empty());
        assert_eq!(router.stats().broadcast, 2);
    }

    #[test]
    fn new_post_without_followers_queues_nothing() {
        let mut router = NotificationRouter::new();
        let mut mailboxes = TestMailboxes::with(&[OWNER, F1]);
        let graph = FollowGraph::new();

        router.route(RouteEvent::NewPost { initiator: OWNER }, &graph, &mut mailboxes);

        assert!(mailboxes.of(F1).is_empty());
        assert_eq!(router.stats(), RouterStats::default());
    }

    #[test]
    fn missing_mailbox_is_skipped() {
        let mut router = NotificationRouter::new();
        let mut mailboxes = TestMailboxes::with(&[OWNER, F2]);
        let mut graph = FollowGraph::new();
        graph.follow(F1, OWNER).unwrap();
        graph.follow(F2, OWNER).unwrap();

        router.route(RouteEvent::NewPost { initiator: OWNER }, &graph, &mut mailboxes);

        assert_eq!(mailboxes.of(F2).len(), 1);
        assert_eq!(router.stats().broadcast, 1);
        assert_eq!(router.stats().undeliverable, 1);
    }

    #[test]
    fn event_accessors() {
        let event = RouteEvent::Comment { initiator: F1, recipient: OWNER, body: String::new() };
        assert_eq!(event.initiator(), F1);
        assert_eq!(event.kind(), NotificationKind::Comment);
        assert_eq!(RouteEvent::NewPost { initiator: F2 }.kind(), NotificationKind::NewPost);
    }
}
