//! Reference model for model-based testing.
//!
//! The model is a deliberately naive rendition of the network: edges in a
//! flat list, mailboxes as plain vectors, no router. It is the oracle against
//! which [`crate::RealWorld`] is verified.
//!
//! # Design Principles
//!
//! - Simplicity: the model should be obviously correct
//! - Same error precedence as the real network
//! - Deterministic: same inputs produce same outputs

pub mod operation;
mod world;

pub use operation::{
    ModelPostId, ModelPostKind, Operation, OperationError, OperationResult, SmallText, UserId,
};
pub use world::{
    ModelNotification, ModelNotificationKind, ModelWorld, ObservableState, PostState, UserState,
    WRONG_CREDENTIAL, credential_for,
};
