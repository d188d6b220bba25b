//! Flock core.
//!
//! Follower graph and notification fan-out for a single-process social
//! network.
//!
//! # Architecture
//!
//! ```text
//! Network                (registry, gating, entry point for actions)
//!   ├─ AccountStore      (accounts, credentials, connection flag, mailboxes)
//!   ├─ FollowGraph       (follower -> followee edges)
//!   ├─ NotificationRouter(direct and broadcast fan-out)
//!   └─ Post              (text, image, sale listing)
//! ```
//!
//! Every operation runs to completion on the caller's thread and returns the
//! [`NetworkAction`]s it produced. Rendering them is the caller's job.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod account;
mod action;
mod config;
mod error;
pub mod graph;
pub mod network;
pub mod notification;
pub mod post;
pub mod queue;
pub mod router;

pub use account::{Account, AccountId, AccountStore, Credential, require_connected};
pub use action::NetworkAction;
pub use config::NetworkConfig;
pub use error::NetworkError;
pub use graph::{EdgeError, FollowGraph};
pub use network::Network;
pub use notification::{DeliveryMode, Notification, NotificationKind};
pub use post::{Post, PostContent, PostId, PostKind, PostRequest, SaleListing};
pub use queue::{DrainAll, NotificationQueue};
pub use router::{Mailboxes, NotificationRouter, RouteEvent, RouterAction, RouterStats};
