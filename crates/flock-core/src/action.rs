//! Actions produced by network operations.
//!
//! Operations never print. Everything a user would see as a result of an
//! action (connection changes, new edges, immediate notification signals) is
//! returned as a [`NetworkAction`] for the caller to render.

use crate::{account::AccountId, notification::Notification, post::PostId};

/// Observable outcome of a successful operation.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkAction {
    /// Account logged in.
    Connected {
        /// The account.
        account: AccountId,
    },

    /// Account logged out.
    Disconnected {
        /// The account.
        account: AccountId,
    },

    /// Follow edge added.
    Followed {
        /// Follower side.
        follower: AccountId,
        /// Followee side.
        followee: AccountId,
    },

    /// Follow edge removed.
    Unfollowed {
        /// Former follower.
        follower: AccountId,
        /// Former followee.
        followee: AccountId,
    },

    /// Post published and fanned out to followers.
    Published {
        /// The new post.
        post: PostId,
        /// Number of followers notified.
        notified: usize,
    },

    /// Direct notification queued; signal the recipient now.
    Notified {
        /// Recipient.
        recipient: AccountId,
        /// The queued message.
        notification: Notification,
    },

    /// Listing marked sold.
    Sold {
        /// The listing.
        post: PostId,
    },

    /// Listing price reduced.
    Discounted {
        /// The listing.
        post: PostId,
        /// New price.
        price: f64,
    },
}
