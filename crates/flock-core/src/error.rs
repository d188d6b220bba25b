//! Network error types.

use thiserror::Error;

use crate::{account::AccountId, post::PostId};

/// Errors from network operations.
///
/// Every failing operation leaves the network untouched: all checks run
/// before the first mutation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    /// Acting account is not connected.
    #[error("{username} is not connected")]
    NotConnected {
        /// Username of the disconnected actor.
        username: String,
    },

    /// Supplied credential does not match the stored one.
    #[error("credential mismatch for {username}")]
    CredentialMismatch {
        /// Account whose credential was checked.
        username: String,
    },

    /// An account tried to follow itself.
    #[error("{username} cannot follow themselves")]
    SelfFollow {
        /// The account that tried.
        username: String,
    },

    /// Follow edge already exists.
    #[error("{follower} already follows {followee}")]
    AlreadyFollowing {
        /// Follower side of the edge.
        follower: String,
        /// Followee side of the edge.
        followee: String,
    },

    /// Follow edge does not exist.
    #[error("{follower} does not follow {followee}")]
    NotFollowing {
        /// Follower side of the missing edge.
        follower: String,
        /// Followee side of the missing edge.
        followee: String,
    },

    /// Sale listing is already sold.
    #[error("listing {post} is already sold")]
    AlreadySold {
        /// The sold listing.
        post: PostId,
    },

    /// Discount percent cannot be applied to the price.
    #[error("cannot apply discount of {percent} to price {price}")]
    InvalidDiscount {
        /// Requested percent.
        percent: f64,
        /// Price at the time of the request.
        price: f64,
    },

    /// Username is already registered.
    #[error("username already taken: {username}")]
    UsernameTaken {
        /// The duplicate username.
        username: String,
    },

    /// Credential length is outside the configured bounds.
    #[error("credential length {len} outside {min}..={max}")]
    InvalidCredentialLength {
        /// Length of the rejected credential, in characters.
        len: usize,
        /// Minimum accepted length.
        min: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// Log-in attempted while already connected.
    #[error("{username} is already connected")]
    AlreadyConnected {
        /// The connected account.
        username: String,
    },

    /// Log-out attempted while already disconnected.
    #[error("{username} is already disconnected")]
    AlreadyDisconnected {
        /// The disconnected account.
        username: String,
    },

    /// No account registered under this username.
    #[error("unknown user: {username}")]
    UnknownUser {
        /// The username that was looked up.
        username: String,
    },

    /// Post kind is outside the closed set.
    #[error("post type {kind} not recognized, must be one of: Text, Image, Sale")]
    UnknownPostKind {
        /// The unrecognized kind.
        kind: String,
    },

    /// A field required by the post kind was not supplied.
    #[error("{kind} post requires {field}")]
    MissingField {
        /// Post kind being built.
        kind: &'static str,
        /// Name of the missing field.
        field: &'static str,
    },

    /// Sale price is negative or not finite.
    #[error("invalid price: {price}")]
    InvalidPrice {
        /// The rejected price.
        price: f64,
    },

    /// Sale operation applied to a post that is not a listing.
    #[error("post {post} is not a sale listing")]
    NotForSale {
        /// The post that was targeted.
        post: PostId,
    },

    /// Account id does not belong to this network.
    #[error("unknown account: {0}")]
    UnknownAccount(AccountId),

    /// Post id does not belong to this network.
    #[error("unknown post: {0}")]
    UnknownPost(PostId),
}

impl NetworkError {
    /// Returns true if this error is a precondition failure.
    ///
    /// Rejections are ordinary business outcomes (wrong credential, duplicate
    /// follow) that a caller may retry or report. Everything else means the
    /// caller passed a value outside the accepted domain.
    pub fn is_rejection(&self) -> bool {
        match self {
            Self::NotConnected { .. }
            | Self::CredentialMismatch { .. }
            | Self::SelfFollow { .. }
            | Self::AlreadyFollowing { .. }
            | Self::NotFollowing { .. }
            | Self::AlreadySold { .. }
            | Self::InvalidDiscount { .. }
            | Self::UsernameTaken { .. }
            | Self::InvalidCredentialLength { .. }
            | Self::AlreadyConnected { .. }
            | Self::AlreadyDisconnected { .. }
            | Self::UnknownUser { .. } => true,

            Self::UnknownPostKind { .. }
            | Self::MissingField { .. }
            | Self::InvalidPrice { .. }
            | Self::NotForSale { .. }
            | Self::UnknownAccount(_)
            | Self::UnknownPost(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_follow_is_rejection() {
        let err = NetworkError::AlreadyFollowing {
            follower: "alice".to_string(),
            followee: "bob".to_string(),
        };
        assert!(err.is_rejection());
    }

    #[test]
    fn unknown_post_kind_is_not_rejection() {
        let err = NetworkError::UnknownPostKind { kind: "Video".to_string() };
        assert!(!err.is_rejection());
    }

    #[test]
    fn error_display() {
        let err = NetworkError::InvalidCredentialLength { len: 2, min: 4, max: 8 };
        assert_eq!(err.to_string(), "credential length 2 outside 4..=8");
    }
}
