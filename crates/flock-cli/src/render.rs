//! Human-readable phrasing for network actions, posts and notifications.

use flock_core::{Network, NetworkAction, Notification, NotificationKind, Post, PostContent};

/// Phrase used for a notification kind.
pub fn phrase(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Like => "liked your post",
        NotificationKind::Comment => "commented on your post",
        NotificationKind::NewPost => "has a new post",
    }
}

/// Queued notification line, as shown when a mailbox is drained.
///
/// Comment bodies are only shown in the immediate delivery line.
pub fn notification(network: &Network, notification: &Notification) -> String {
    format!("{} {}", network.username(notification.initiator()), phrase(notification.kind()))
}

/// Post summary, one or two lines.
pub fn post(network: &Network, post: &Post) -> String {
    let owner = network.username(post.owner());
    match post.content() {
        PostContent::Text { body } => format!("{owner} published a post:\n\"{body}\""),
        PostContent::Image { .. } => format!("{owner} posted a picture"),
        PostContent::Sale(listing) => format!(
            "{owner} posted a product for sale:\n{}! {}, price: {}, pickup from: {}",
            if listing.is_sold() { "Sold" } else { "For sale" },
            listing.title(),
            listing.price(),
            listing.location(),
        ),
    }
}

/// What `display` shows for a post.
pub fn display(post: &Post) -> String {
    match post.content() {
        PostContent::Text { body } => body.clone(),
        PostContent::Image { path } => format!("Shows picture {path}"),
        PostContent::Sale(listing) => listing.is_sold().to_string(),
    }
}

/// Line for an action, or `None` if the action has no user-facing text.
pub fn action(network: &Network, action: &NetworkAction) -> Option<String> {
    let line = match action {
        NetworkAction::Connected { account } => format!("{} connected", network.username(*account)),
        NetworkAction::Disconnected { account } => {
            format!("{} disconnected", network.username(*account))
        },
        NetworkAction::Followed { follower, followee } => format!(
            "{} started following {}",
            network.username(*follower),
            network.username(*followee)
        ),
        NetworkAction::Unfollowed { follower, followee } => format!(
            "{} unfollowed {}",
            network.username(*follower),
            network.username(*followee)
        ),
        NetworkAction::Published { post: id, .. } => post(network, network.post(*id)?),
        NetworkAction::Notified { recipient, notification } => {
            let mut line = format!(
                "notification to {}: {} {}",
                network.username(*recipient),
                network.username(notification.initiator()),
                phrase(notification.kind())
            );
            if let Some(body) = notification.body() {
                line.push_str(": ");
                line.push_str(body);
            }
            line
        },
        NetworkAction::Sold { post } => {
            format!("{}'s product is sold", network.username(network.post(*post)?.owner()))
        },
        NetworkAction::Discounted { post, price } => format!(
            "Discount on {} product! the new price is: {price}",
            network.username(network.post(*post)?.owner())
        ),
    };

    Some(line)
}
