//! Follow graph.
//!
//! Directed edges follower -> followee, stored as follower sets keyed by
//! followee plus the reverse index. Sets are ordered by [`AccountId`], which
//! is registration order, so fan-out iterates deterministically.
//!
//! # Invariants
//!
//! - No self-edges
//! - `followers[b]` contains `a` iff `following[a]` contains `b`
//! - Failed mutations leave both indexes untouched

use std::collections::{BTreeSet, HashMap};

use thiserror::Error;

use crate::account::AccountId;

/// Why an edge mutation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EdgeError {
    /// Follower and followee are the same account.
    #[error("self edge on {0}")]
    SelfEdge(AccountId),

    /// Edge already present.
    #[error("edge {follower} -> {followee} already exists")]
    Exists {
        /// Follower side.
        follower: AccountId,
        /// Followee side.
        followee: AccountId,
    },

    /// Edge not present.
    #[error("edge {follower} -> {followee} does not exist")]
    Missing {
        /// Follower side.
        follower: AccountId,
        /// Followee side.
        followee: AccountId,
    },
}

/// Directed follower graph.
#[derive(Debug, Clone, Default)]
pub struct FollowGraph {
    /// followee -> accounts following it
    followers: HashMap<AccountId, BTreeSet<AccountId>>,
    /// follower -> accounts it follows
    following: HashMap<AccountId, BTreeSet<AccountId>>,
}

impl FollowGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the edge `follower -> followee`.
    ///
    /// # Errors
    ///
    /// Returns `EdgeError::SelfEdge` for a self-follow and `EdgeError::Exists`
    /// if the edge is already present.
    pub fn follow(&mut self, follower: AccountId, followee: AccountId) -> Result<(), EdgeError> {
        if follower == followee {
            return Err(EdgeError::SelfEdge(follower));
        }
        if self.is_following(follower, followee) {
            return Err(EdgeError::Exists { follower, followee });
        }

        self.followers.entry(followee).or_default().insert(follower);
        self.following.entry(follower).or_default().insert(followee);

        tracing::debug!(%follower, %followee, "edge added");
        Ok(())
    }

    /// Remove the edge `follower -> followee`.
    ///
    /// # Errors
    ///
    /// Returns `EdgeError::Missing` if the edge is not present.
    pub fn unfollow(&mut self, follower: AccountId, followee: AccountId) -> Result<(), EdgeError> {
        let removed =
            self.followers.get_mut(&followee).is_some_and(|set| set.remove(&follower));
        if !removed {
            return Err(EdgeError::Missing { follower, followee });
        }

        if let Some(set) = self.following.get_mut(&follower) {
            set.remove(&followee);
        }

        tracing::debug!(%follower, %followee, "edge removed");
        Ok(())
    }

    /// Whether `follower` follows `followee`.
    pub fn is_following(&self, follower: AccountId, followee: AccountId) -> bool {
        self.followers.get(&followee).is_some_and(|set| set.contains(&follower))
    }

    /// Snapshot of the accounts following `account`, in id order.
    pub fn followers_of(&self, account: AccountId) -> Vec<AccountId> {
        self.followers.get(&account).map(|set| set.iter().copied().collect()).unwrap_or_default()
    }

    /// Snapshot of the accounts `account` follows, in id order.
    pub fn following_of(&self, account: AccountId) -> Vec<AccountId> {
        self.following.get(&account).map(|set| set.iter().copied().collect()).unwrap_or_default()
    }

    /// Number of followers of `account`.
    pub fn follower_count(&self, account: AccountId) -> usize {
        self.followers.get(&account).map_or(0, BTreeSet::len)
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.followers.values().map(BTreeSet::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const A: AccountId = AccountId::new(0);
    const B: AccountId = AccountId::new(1);
    const C: AccountId = AccountId::new(2);

    #[test]
    fn follow_adds_edge() {
        let mut graph = FollowGraph::new();
        assert!(graph.follow(A, B).is_ok());
        assert!(graph.is_following(A, B));
        assert!(!graph.is_following(B, A));
        assert_eq!(graph.followers_of(B), vec![A]);
        assert_eq!(graph.following_of(A), vec![B]);
    }

    #[test]
    fn second_follow_fails() {
        let mut graph = FollowGraph::new();
        graph.follow(A, B).unwrap();
        assert_eq!(graph.follow(A, B), Err(EdgeError::Exists { follower: A, followee: B }));
        assert_eq!(graph.follower_count(B), 1);
    }

    #[test]
    fn self_follow_fails() {
        let mut graph = FollowGraph::new();
        assert_eq!(graph.follow(A, A), Err(EdgeError::SelfEdge(A)));
        assert!(graph.followers_of(A).is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn unfollow_missing_edge_fails() {
        let mut graph = FollowGraph::new();
        assert_eq!(graph.unfollow(A, B), Err(EdgeError::Missing { follower: A, followee: B }));

        graph.follow(B, A).unwrap();
        assert!(graph.unfollow(A, B).is_err());
        assert!(graph.is_following(B, A));
    }

    #[test]
    fn unfollow_removes_both_directions() {
        let mut graph = FollowGraph::new();
        graph.follow(A, B).unwrap();
        graph.unfollow(A, B).unwrap();

        assert!(!graph.is_following(A, B));
        assert!(graph.followers_of(B).is_empty());
        assert!(graph.following_of(A).is_empty());

        assert!(graph.follow(A, B).is_ok());
    }

    #[test]
    fn followers_are_ordered_by_id() {
        let mut graph = FollowGraph::new();
        graph.follow(C, B).unwrap();
        graph.follow(A, B).unwrap();
        assert_eq!(graph.followers_of(B), vec![A, C]);
    }

    proptest! {
        #[test]
        fn prop_indexes_stay_consistent(
            ops in prop::collection::vec((any::<bool>(), 0..5usize, 0..5usize), 0..64)
        ) {
            let mut graph = FollowGraph::new();
            for (add, a, b) in ops {
                let (a, b) = (AccountId::new(a), AccountId::new(b));
                let _ = if add { graph.follow(a, b) } else { graph.unfollow(a, b) };
            }

            for i in 0..5 {
                let account = AccountId::new(i);
                prop_assert!(!graph.is_following(account, account));
                for followee in graph.following_of(account) {
                    prop_assert!(graph.followers_of(followee).contains(&account));
                }
                for follower in graph.followers_of(account) {
                    prop_assert!(graph.following_of(follower).contains(&account));
                }
            }
        }
    }
}
