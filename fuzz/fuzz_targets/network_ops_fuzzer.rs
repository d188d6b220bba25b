//! Fuzz target for the [`Network`] against the reference model
//!
//! # Strategy
//!
//! - Operation sequences: arbitrary log-ins, follows, posts, likes, comments,
//!   sales and drains
//! - Out-of-range ids: user and post indices are not clamped
//! - Credential probing: wrong credentials on log-in and listing changes
//!
//! # Invariants
//!
//! - Every result matches the model, error kind included
//! - Observable state matches the model after every step
//! - No self edges, no self notifications
//! - Listing prices never go negative
//! - NEVER panic
//!
//! [`Network`]: flock_core::Network

#![no_main]

use arbitrary::Arbitrary;
use flock_harness::{ModelWorld, Operation, RealWorld};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
struct FuzzInput {
    /// Registered users (taken modulo 8, at least one).
    users: u8,
    /// Operation sequence to apply.
    ops: Vec<Operation>,
}

fuzz_target!(|input: FuzzInput| {
    let users = input.users % 8 + 1;
    let mut model = ModelWorld::new(users);
    let Ok(mut real) = RealWorld::new(users) else {
        panic!("harness users must register");
    };

    for (step, op) in input.ops.iter().enumerate() {
        let expected = model.apply(op);
        let actual = real.apply(op);
        assert_eq!(expected, actual, "step {step}: {op:?}");

        let state = real.observable_state();
        assert_eq!(model.observable_state(), state, "state diverged at step {step}: {op:?}");

        for (index, user) in state.users.iter().enumerate() {
            assert!(!user.followers.iter().any(|f| usize::from(*f) == index));
            assert!(!user.mailbox.iter().any(|n| usize::from(n.from) == index));
        }
        for post in &state.posts {
            if let Some((price, _)) = post.listing {
                assert!(price >= 0.0 && price.is_finite());
            }
        }
    }
});
