//! Fuzz target for post construction and listing arithmetic
//!
//! # Strategy
//!
//! - Kind names: arbitrary strings, including case variants of real kinds
//! - Requests: arbitrary bodies, prices (NaN and infinities included) and
//!   optional locations
//! - Discounts: arbitrary percent sequences on whatever listing resulted
//!
//! # Invariants
//!
//! - A rejected publish leaves no post and no notification behind
//! - Accepted listings always have a finite, non-negative price
//! - A rejected discount leaves the price unchanged
//! - NEVER panic

#![no_main]

use arbitrary::Arbitrary;
use flock_core::{Network, PostRequest, SaleListing};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
struct FuzzInput {
    kind: String,
    body: String,
    price: Option<f64>,
    location: Option<String>,
    percents: Vec<f64>,
}

fuzz_target!(|input: FuzzInput| {
    let mut network = Network::default();
    let (Ok(owner), Ok(follower)) =
        (network.sign_up("owner", "pass1"), network.sign_up("follower", "pass2"))
    else {
        panic!("fixed users must register");
    };
    assert!(network.follow(follower, owner).is_ok());

    let request = PostRequest { body: input.body, price: input.price, location: input.location };
    let Ok((post, _)) = network.publish(owner, &input.kind, request) else {
        assert!(network.account(owner).is_some_and(|a| a.posts().is_empty()));
        assert!(network.pending(follower).is_ok_and(|q| q.is_empty()));
        return;
    };

    assert_eq!(network.pending(follower).map(|q| q.len()).ok(), Some(1));

    for percent in input.percents {
        let before = network.post(post).and_then(|p| p.listing()).map(SaleListing::price);
        let result = network.discount(post, percent, "pass1");
        let after = network.post(post).and_then(|p| p.listing()).map(SaleListing::price);

        match (result, after) {
            (Ok(_), Some(price)) => assert!(price.is_finite() && price >= 0.0),
            (Err(_), _) => assert_eq!(before.map(f64::to_bits), after.map(f64::to_bits)),
            (Ok(_), None) => panic!("discount succeeded on a non-listing"),
        }
    }
});
