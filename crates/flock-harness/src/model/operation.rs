//! Operations for model-based testing.
//!
//! Operations represent all possible user actions. They are generated by
//! proptest, by the seeded simulation, or by the fuzzer, and applied to both
//! the model and the real network.

use arbitrary::Arbitrary;

/// User identifier (0-indexed, registration order).
pub type UserId = u8;

/// Post identifier (0-indexed, publication order).
pub type ModelPostId = u8;

/// Operations that can be applied to the system.
#[derive(Debug, Clone, PartialEq, Eq, Arbitrary)]
pub enum Operation {
    /// User logs in.
    LogIn {
        /// User logging in.
        user: UserId,
        /// Whether the right credential is supplied.
        correct_credential: bool,
    },

    /// User logs out.
    LogOut {
        /// User logging out.
        user: UserId,
    },

    /// `follower` follows `followee`.
    Follow {
        /// Acting user.
        follower: UserId,
        /// Target user.
        followee: UserId,
    },

    /// `follower` unfollows `followee`.
    Unfollow {
        /// Acting user.
        follower: UserId,
        /// Target user.
        followee: UserId,
    },

    /// User publishes a post.
    Publish {
        /// Publishing user.
        user: UserId,
        /// What to publish.
        kind: ModelPostKind,
    },

    /// User likes a post.
    Like {
        /// Acting user.
        user: UserId,
        /// Target post.
        post: ModelPostId,
    },

    /// User comments on a post.
    Comment {
        /// Acting user.
        user: UserId,
        /// Target post.
        post: ModelPostId,
        /// Comment content.
        body: SmallText,
    },

    /// Owner marks a listing sold.
    MarkSold {
        /// Target post.
        post: ModelPostId,
        /// Whether the owner's credential is supplied.
        correct_credential: bool,
    },

    /// Owner discounts a listing.
    Discount {
        /// Target post.
        post: ModelPostId,
        /// Discount divisor.
        percent: u8,
        /// Whether the owner's credential is supplied.
        correct_credential: bool,
    },

    /// User consumes their notifications.
    Drain {
        /// Consuming user.
        user: UserId,
    },
}

/// Post kinds in the model, including one outside the closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum ModelPostKind {
    /// Text post.
    Text,
    /// Image post.
    Image,
    /// Sale listing with a whole-number price.
    Sale {
        /// Asking price.
        price: u16,
    },
    /// A kind name the network does not recognize.
    Unknown,
}

impl ModelPostKind {
    /// Kind name passed to the network.
    pub fn name(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Image => "Image",
            Self::Sale { .. } => "Sale",
            Self::Unknown => "Poll",
        }
    }
}

/// Small text content for testing.
///
/// Compact representation that keeps test cases small. The content is
/// deterministic from the seed.
#[derive(Debug, Clone, PartialEq, Eq, Arbitrary)]
pub struct SmallText {
    /// Text seed.
    pub seed: u8,
    /// Length hint (0-3 maps to empty/short/medium/long).
    pub size_class: u8,
}

impl SmallText {
    /// Expand to the actual text.
    pub fn to_text(&self) -> String {
        let len = match self.size_class % 4 {
            0 => 0,
            1 => 4,
            2 => 16,
            _ => 64,
        };

        (0..len).map(|i| char::from(b'a' + self.seed.wrapping_add(i) % 26)).collect()
    }
}

/// Result of applying an operation.
///
/// Used to compare model and real behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    /// Operation succeeded.
    Ok,

    /// Operation failed with an expected error.
    Error(OperationError),
}

impl OperationResult {
    /// Check if operation succeeded.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Check if operation failed.
    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }
}

/// Expected errors that can occur during operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    /// Actor is offline.
    NotConnected,
    /// Wrong credential.
    CredentialMismatch,
    /// Self-follow attempted.
    SelfFollow,
    /// Edge already exists.
    AlreadyFollowing,
    /// Edge does not exist.
    NotFollowing,
    /// Listing already sold.
    AlreadySold,
    /// Discount cannot be applied.
    InvalidDiscount,
    /// Log-in while connected.
    AlreadyConnected,
    /// Log-out while disconnected.
    AlreadyDisconnected,
    /// Post kind outside the closed set.
    UnknownPostKind,
    /// Post index out of range.
    UnknownPost,
    /// Sale operation on a non-listing.
    NotForSale,
    /// User index out of range.
    InvalidUser,
    /// Any error the model never produces.
    Unexpected(String),
}
