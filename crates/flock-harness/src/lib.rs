//! Model-based and seeded simulation harness for Flock.
//!
//! # Model-Based Testing
//!
//! The `model` module provides a reference implementation. Operations are
//! applied to both the model and [`RealWorld`], a thin driver over
//! [`flock_core::Network`], and their observable states are compared.
//!
//! # Scenarios
//!
//! [`Scenario`] derives an operation sequence from a seed, so any failing run
//! can be replayed from its seed alone.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod model;
pub mod real;
pub mod scenario;

pub use model::{
    ModelNotification, ModelNotificationKind, ModelPostId, ModelPostKind, ModelWorld,
    ObservableState, Operation, OperationError, OperationResult, PostState, SmallText, UserId,
    UserState,
};
pub use real::RealWorld;
pub use scenario::{Oracle, Scenario, ScenarioError, ScenarioOutcome};
