//! Model world.
//!
//! The reference implementation: plain vectors, linear scans, no router, no
//! arena. It is the oracle against which the real network is verified.
//!
//! Users are registered up front, all connected. User `i` has the
//! credential returned by [`credential_for`].

use super::operation::{
    ModelPostId, ModelPostKind, Operation, OperationError, OperationResult, UserId,
};

/// Credential the harness registers user `user` with.
pub fn credential_for(user: UserId) -> String {
    format!("pass{user}")
}

/// Credential guaranteed not to match any user.
pub const WRONG_CREDENTIAL: &str = "wrong";

/// Notification kinds in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelNotificationKind {
    /// Like on one of the user's posts.
    Like,
    /// Comment on one of the user's posts.
    Comment,
    /// New post from a followed user.
    NewPost,
}

/// Queued notification in the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelNotification {
    /// Initiating user.
    pub from: UserId,
    /// Notification kind.
    pub kind: ModelNotificationKind,
    /// Comment text.
    pub body: Option<String>,
    /// Direct (true) or broadcast (false).
    pub direct: bool,
}

/// Observable state of one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserState {
    /// Connection flag.
    pub connected: bool,
    /// Followers, ascending.
    pub followers: Vec<UserId>,
    /// Followees, ascending.
    pub following: Vec<UserId>,
    /// Pending notifications, oldest first.
    pub mailbox: Vec<ModelNotification>,
    /// Published posts, oldest first.
    pub posts: Vec<ModelPostId>,
}

/// Observable state of one post.
#[derive(Debug, Clone, PartialEq)]
pub struct PostState {
    /// Publishing user.
    pub owner: UserId,
    /// `(price, sold)` for sale listings.
    pub listing: Option<(f64, bool)>,
}

/// Observable state for oracle comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservableState {
    /// Per-user state, by user id.
    pub users: Vec<UserState>,
    /// Per-post state, by post id.
    pub posts: Vec<PostState>,
    /// Immediate delivery signals emitted so far.
    pub signals: u64,
}

#[derive(Debug, Clone)]
struct ModelUser {
    connected: bool,
    mailbox: Vec<ModelNotification>,
    posts: Vec<ModelPostId>,
}

#[derive(Debug, Clone)]
struct ModelPost {
    owner: UserId,
    listing: Option<(f64, bool)>,
}

/// Model world - the reference implementation.
#[derive(Debug, Clone)]
pub struct ModelWorld {
    users: Vec<ModelUser>,
    /// (follower, followee) pairs, unordered.
    edges: Vec<(UserId, UserId)>,
    posts: Vec<ModelPost>,
    signals: u64,
}

impl ModelWorld {
    /// Create a world with `num_users` connected users.
    pub fn new(num_users: u8) -> Self {
        let users = (0..num_users)
            .map(|_| ModelUser { connected: true, mailbox: Vec::new(), posts: Vec::new() })
            .collect();

        Self { users, edges: Vec::new(), posts: Vec::new(), signals: 0 }
    }

    /// Number of users.
    pub fn num_users(&self) -> usize {
        self.users.len()
    }

    /// Number of posts.
    pub fn num_posts(&self) -> usize {
        self.posts.len()
    }

    /// Apply an operation and return the result.
    pub fn apply(&mut self, op: &Operation) -> OperationResult {
        let result = match op {
            Operation::LogIn { user, correct_credential } => {
                self.apply_log_in(*user, *correct_credential)
            },
            Operation::LogOut { user } => self.apply_log_out(*user),
            Operation::Follow { follower, followee } => self.apply_follow(*follower, *followee),
            Operation::Unfollow { follower, followee } => {
                self.apply_unfollow(*follower, *followee)
            },
            Operation::Publish { user, kind } => self.apply_publish(*user, *kind),
            Operation::Like { user, post } => self.apply_direct(*user, *post, None),
            Operation::Comment { user, post, body } => {
                self.apply_direct(*user, *post, Some(body.to_text()))
            },
            Operation::MarkSold { post, correct_credential } => {
                self.apply_mark_sold(*post, *correct_credential)
            },
            Operation::Discount { post, percent, correct_credential } => {
                self.apply_discount(*post, f64::from(*percent), *correct_credential)
            },
            Operation::Drain { user } => self.apply_drain(*user),
        };

        match result {
            Ok(()) => OperationResult::Ok,
            Err(e) => OperationResult::Error(e),
        }
    }

    /// Extract observable state for comparison.
    pub fn observable_state(&self) -> ObservableState {
        let users = (0..self.users.len())
            .map(|i| {
                let id = user_id(i);
                let user = &self.users[i];

                let mut followers: Vec<_> =
                    self.edges.iter().filter(|(_, b)| *b == id).map(|(a, _)| *a).collect();
                followers.sort_unstable();
                let mut following: Vec<_> =
                    self.edges.iter().filter(|(a, _)| *a == id).map(|(_, b)| *b).collect();
                following.sort_unstable();

                UserState {
                    connected: user.connected,
                    followers,
                    following,
                    mailbox: user.mailbox.clone(),
                    posts: user.posts.clone(),
                }
            })
            .collect();

        let posts = self
            .posts
            .iter()
            .map(|post| PostState { owner: post.owner, listing: post.listing })
            .collect();

        ObservableState { users, posts, signals: self.signals }
    }

    fn user(&self, user: UserId) -> Result<&ModelUser, OperationError> {
        self.users.get(usize::from(user)).ok_or(OperationError::InvalidUser)
    }

    fn user_mut(&mut self, user: UserId) -> Result<&mut ModelUser, OperationError> {
        self.users.get_mut(usize::from(user)).ok_or(OperationError::InvalidUser)
    }

    fn post(&self, post: ModelPostId) -> Result<&ModelPost, OperationError> {
        self.posts.get(usize::from(post)).ok_or(OperationError::UnknownPost)
    }

    fn require_connected(&self, user: UserId) -> Result<(), OperationError> {
        if self.user(user)?.connected { Ok(()) } else { Err(OperationError::NotConnected) }
    }

    fn apply_log_in(&mut self, user: UserId, correct: bool) -> Result<(), OperationError> {
        let state = self.user_mut(user)?;
        if !correct {
            return Err(OperationError::CredentialMismatch);
        }
        if state.connected {
            return Err(OperationError::AlreadyConnected);
        }
        state.connected = true;
        Ok(())
    }

    fn apply_log_out(&mut self, user: UserId) -> Result<(), OperationError> {
        let state = self.user_mut(user)?;
        if !state.connected {
            return Err(OperationError::AlreadyDisconnected);
        }
        state.connected = false;
        Ok(())
    }

    fn apply_follow(&mut self, follower: UserId, followee: UserId) -> Result<(), OperationError> {
        self.require_connected(follower)?;
        self.user(followee)?;

        if follower == followee {
            return Err(OperationError::SelfFollow);
        }
        if self.edges.contains(&(follower, followee)) {
            return Err(OperationError::AlreadyFollowing);
        }

        self.edges.push((follower, followee));
        Ok(())
    }

    fn apply_unfollow(&mut self, follower: UserId, followee: UserId) -> Result<(), OperationError> {
        self.require_connected(follower)?;
        self.user(followee)?;

        let position = self
            .edges
            .iter()
            .position(|edge| *edge == (follower, followee))
            .ok_or(OperationError::NotFollowing)?;
        self.edges.swap_remove(position);
        Ok(())
    }

    fn apply_publish(&mut self, user: UserId, kind: ModelPostKind) -> Result<(), OperationError> {
        self.require_connected(user)?;

        let listing = match kind {
            ModelPostKind::Text | ModelPostKind::Image => None,
            ModelPostKind::Sale { price } => Some((f64::from(price), false)),
            ModelPostKind::Unknown => return Err(OperationError::UnknownPostKind),
        };

        let mut followers: Vec<_> =
            self.edges.iter().filter(|(_, b)| *b == user).map(|(a, _)| *a).collect();
        followers.sort_unstable();

        for follower in followers {
            self.users[usize::from(follower)].mailbox.push(ModelNotification {
                from: user,
                kind: ModelNotificationKind::NewPost,
                body: None,
                direct: false,
            });
        }

        // Model ids are u8; posts beyond that are not addressable but still exist
        let id = ModelPostId::try_from(self.posts.len()).unwrap_or(ModelPostId::MAX);
        self.posts.push(ModelPost { owner: user, listing });
        self.users[usize::from(user)].posts.push(id);
        Ok(())
    }

    fn apply_direct(
        &mut self,
        user: UserId,
        post: ModelPostId,
        body: Option<String>,
    ) -> Result<(), OperationError> {
        self.user(user)?;
        let owner = self.post(post)?.owner;

        if owner == user {
            return Ok(());
        }

        let kind =
            if body.is_some() { ModelNotificationKind::Comment } else { ModelNotificationKind::Like };
        self.users[usize::from(owner)].mailbox.push(ModelNotification {
            from: user,
            kind,
            body,
            direct: true,
        });
        self.signals += 1;
        Ok(())
    }

    fn apply_mark_sold(&mut self, post: ModelPostId, correct: bool) -> Result<(), OperationError> {
        let target = self.post(post)?;
        if target.listing.is_none() {
            return Err(OperationError::NotForSale);
        }
        if !correct {
            return Err(OperationError::CredentialMismatch);
        }

        if let Some((_, sold)) = &mut self.posts[usize::from(post)].listing {
            *sold = true;
        }
        Ok(())
    }

    fn apply_discount(
        &mut self,
        post: ModelPostId,
        percent: f64,
        correct: bool,
    ) -> Result<(), OperationError> {
        let (price, sold) = self.post(post)?.listing.ok_or(OperationError::NotForSale)?;
        if !correct {
            return Err(OperationError::CredentialMismatch);
        }
        if sold {
            return Err(OperationError::AlreadySold);
        }
        if percent <= 0.0 {
            return Err(OperationError::InvalidDiscount);
        }

        let next = price - price / percent;
        if next < 0.0 {
            return Err(OperationError::InvalidDiscount);
        }

        self.posts[usize::from(post)].listing = Some((next, false));
        Ok(())
    }

    fn apply_drain(&mut self, user: UserId) -> Result<(), OperationError> {
        self.user_mut(user)?.mailbox.clear();
        Ok(())
    }
}

fn user_id(index: usize) -> UserId {
    UserId::try_from(index).unwrap_or(UserId::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::operation::SmallText;

    #[test]
    fn publish_reaches_followers_only() {
        let mut world = ModelWorld::new(3);
        assert!(world.apply(&Operation::Follow { follower: 1, followee: 0 }).is_ok());
        assert!(world.apply(&Operation::Publish { user: 0, kind: ModelPostKind::Text }).is_ok());

        let state = world.observable_state();
        assert!(state.users[0].mailbox.is_empty());
        assert_eq!(state.users[1].mailbox.len(), 1);
        assert!(state.users[2].mailbox.is_empty());
        assert_eq!(state.users[0].posts, vec![0]);
    }

    #[test]
    fn self_comment_is_silent() {
        let mut world = ModelWorld::new(1);
        world.apply(&Operation::Publish { user: 0, kind: ModelPostKind::Image });
        let result = world.apply(&Operation::Comment {
            user: 0,
            post: 0,
            body: SmallText { seed: 0, size_class: 1 },
        });

        assert!(result.is_ok());
        assert!(world.observable_state().users[0].mailbox.is_empty());
        assert_eq!(world.observable_state().signals, 0);
    }

    #[test]
    fn discount_matches_reciprocal_formula() {
        let mut world = ModelWorld::new(1);
        world.apply(&Operation::Publish { user: 0, kind: ModelPostKind::Sale { price: 100 } });
        world.apply(&Operation::Discount { post: 0, percent: 25, correct_credential: true });

        assert_eq!(world.observable_state().posts[0].listing, Some((96.0, false)));
    }

    #[test]
    fn out_of_range_user_is_invalid() {
        let mut world = ModelWorld::new(2);
        assert_eq!(
            world.apply(&Operation::LogOut { user: 5 }),
            OperationResult::Error(OperationError::InvalidUser)
        );
    }
}
