//! Real system wrapper that mirrors [`ModelWorld`]'s interface.
//!
//! [`ModelWorld`]: crate::ModelWorld

use flock_core::{
    AccountId, DeliveryMode, Network, NetworkAction, NetworkConfig, NetworkError, Notification,
    NotificationKind, PostId, PostRequest,
};

use crate::model::{
    ModelNotification, ModelNotificationKind, ModelPostId, ModelPostKind, ObservableState,
    Operation, OperationError, OperationResult, PostState, UserId, UserState, WRONG_CREDENTIAL,
    credential_for,
};

/// Username the harness registers user `user` under.
pub fn username_for(user: UserId) -> String {
    format!("user{user}")
}

/// [`Network`] driven by model operations.
#[derive(Debug)]
pub struct RealWorld {
    network: Network,
    /// Model user index to account.
    users: Vec<AccountId>,
    /// Model post index to post.
    posts: Vec<PostId>,
    signals: u64,
}

impl RealWorld {
    /// Create a network with `num_users` registered (and connected) users.
    ///
    /// # Errors
    ///
    /// Propagates registration failures, which only happen if the harness
    /// credentials fall outside the default bounds.
    pub fn new(num_users: u8) -> Result<Self, NetworkError> {
        let mut network = Network::new(NetworkConfig::named("Harness"));
        let users = (0..num_users)
            .map(|user| network.sign_up(&username_for(user), &credential_for(user)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { network, users, posts: Vec::new(), signals: 0 })
    }

    /// Underlying network.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Apply an operation and return the result.
    pub fn apply(&mut self, op: &Operation) -> OperationResult {
        let result = match op {
            Operation::LogIn { user, correct_credential } => {
                self.apply_log_in(*user, *correct_credential)
            },
            Operation::LogOut { user } => self.apply_log_out(*user),
            Operation::Follow { follower, followee } => {
                self.apply_edge(*follower, *followee, true)
            },
            Operation::Unfollow { follower, followee } => {
                self.apply_edge(*follower, *followee, false)
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
        let users = self
            .users
            .iter()
            .filter_map(|id| self.network.account(*id))
            .map(|account| {
                let id = account.id();
                UserState {
                    connected: account.is_connected(),
                    followers: self.network.followers_of(id).into_iter().map(user_index).collect(),
                    following: self.network.following_of(id).into_iter().map(user_index).collect(),
                    mailbox: account.mailbox().iter().map(model_notification).collect(),
                    posts: account.posts().iter().map(|post| post_index(*post)).collect(),
                }
            })
            .collect();

        let posts = self
            .posts
            .iter()
            .filter_map(|id| self.network.post(*id))
            .map(|post| PostState {
                owner: user_index(post.owner()),
                listing: post.listing().map(|listing| (listing.price(), listing.is_sold())),
            })
            .collect();

        ObservableState { users, posts, signals: self.signals }
    }

    fn account(&self, user: UserId) -> Result<AccountId, OperationError> {
        self.users.get(usize::from(user)).copied().ok_or(OperationError::InvalidUser)
    }

    fn post(&self, post: ModelPostId) -> Result<PostId, OperationError> {
        self.posts.get(usize::from(post)).copied().ok_or(OperationError::UnknownPost)
    }

    /// Credential to present for an action on `post`.
    fn owner_credential(&self, post: PostId, correct: bool) -> String {
        match self.network.post(post) {
            Some(target) if correct => credential_for(user_index(target.owner())),
            _ => WRONG_CREDENTIAL.to_string(),
        }
    }

    fn apply_log_in(&mut self, user: UserId, correct: bool) -> Result<(), OperationError> {
        self.account(user)?;
        let credential = if correct { credential_for(user) } else { WRONG_CREDENTIAL.to_string() };

        self.network.log_in(&username_for(user), &credential).map_err(map_error)?;
        Ok(())
    }

    fn apply_log_out(&mut self, user: UserId) -> Result<(), OperationError> {
        self.account(user)?;
        self.network.log_out(&username_for(user)).map_err(map_error)?;
        Ok(())
    }

    fn apply_edge(
        &mut self,
        follower: UserId,
        followee: UserId,
        follow: bool,
    ) -> Result<(), OperationError> {
        let follower = self.account(follower)?;
        if !self.network.account(follower).is_some_and(flock_core::Account::is_connected) {
            return Err(OperationError::NotConnected);
        }
        let followee = self.account(followee)?;

        let result = if follow {
            self.network.follow(follower, followee)
        } else {
            self.network.unfollow(follower, followee)
        };
        result.map_err(map_error)?;
        Ok(())
    }

    fn apply_publish(&mut self, user: UserId, kind: ModelPostKind) -> Result<(), OperationError> {
        let owner = self.account(user)?;
        let request = match kind {
            ModelPostKind::Text => PostRequest::body(format!("hello from {}", username_for(user))),
            ModelPostKind::Image => PostRequest::body("photo.png"),
            ModelPostKind::Sale { price } => PostRequest::sale("item", f64::from(price), "lobby"),
            ModelPostKind::Unknown => PostRequest::body("?"),
        };

        let (post, _) = self.network.publish(owner, kind.name(), request).map_err(map_error)?;
        self.posts.push(post);
        Ok(())
    }

    fn apply_direct(
        &mut self,
        user: UserId,
        post: ModelPostId,
        body: Option<String>,
    ) -> Result<(), OperationError> {
        let actor = self.account(user)?;
        let post = self.post(post)?;

        let actions = match body {
            Some(body) => self.network.comment(actor, post, body),
            None => self.network.like(actor, post),
        }
        .map_err(map_error)?;

        self.signals += count_signals(&actions);
        Ok(())
    }

    fn apply_mark_sold(&mut self, post: ModelPostId, correct: bool) -> Result<(), OperationError> {
        let post = self.post(post)?;
        let credential = self.owner_credential(post, correct);

        self.network.mark_sold(post, &credential).map_err(map_error)?;
        Ok(())
    }

    fn apply_discount(
        &mut self,
        post: ModelPostId,
        percent: f64,
        correct: bool,
    ) -> Result<(), OperationError> {
        let post = self.post(post)?;
        let credential = self.owner_credential(post, correct);

        self.network.discount(post, percent, &credential).map_err(map_error)?;
        Ok(())
    }

    fn apply_drain(&mut self, user: UserId) -> Result<(), OperationError> {
        let account = self.account(user)?;
        self.network.drain_notifications(account).map_err(map_error)?;
        Ok(())
    }
}

fn count_signals(actions: &[NetworkAction]) -> u64 {
    let count = actions.iter().filter(|a| matches!(a, NetworkAction::Notified { .. })).count();
    u64::try_from(count).unwrap_or(u64::MAX)
}

fn user_index(id: AccountId) -> UserId {
    UserId::try_from(id.index()).unwrap_or(UserId::MAX)
}

fn post_index(id: PostId) -> ModelPostId {
    ModelPostId::try_from(id.index()).unwrap_or(ModelPostId::MAX)
}

fn model_notification(notification: &Notification) -> ModelNotification {
    let kind = match notification.kind() {
        NotificationKind::Like => ModelNotificationKind::Like,
        NotificationKind::Comment => ModelNotificationKind::Comment,
        NotificationKind::NewPost => ModelNotificationKind::NewPost,
    };

    ModelNotification {
        from: user_index(notification.initiator()),
        kind,
        body: notification.body().map(str::to_string),
        direct: notification.mode() == DeliveryMode::Direct,
    }
}

/// Map a network error onto the model's error vocabulary.
pub fn map_error(err: NetworkError) -> OperationError {
    match err {
        NetworkError::NotConnected { .. } => OperationError::NotConnected,
        NetworkError::CredentialMismatch { .. } => OperationError::CredentialMismatch,
        NetworkError::SelfFollow { .. } => OperationError::SelfFollow,
        NetworkError::AlreadyFollowing { .. } => OperationError::AlreadyFollowing,
        NetworkError::NotFollowing { .. } => OperationError::NotFollowing,
        NetworkError::AlreadySold { .. } => OperationError::AlreadySold,
        NetworkError::InvalidDiscount { .. } => OperationError::InvalidDiscount,
        NetworkError::AlreadyConnected { .. } => OperationError::AlreadyConnected,
        NetworkError::AlreadyDisconnected { .. } => OperationError::AlreadyDisconnected,
        NetworkError::UnknownPostKind { .. } => OperationError::UnknownPostKind,
        NetworkError::UnknownPost(_) => OperationError::UnknownPost,
        NetworkError::NotForSale { .. } => OperationError::NotForSale,
        NetworkError::UnknownAccount(_) | NetworkError::UnknownUser { .. } => {
            OperationError::InvalidUser
        },
        other => OperationError::Unexpected(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn users_start_connected_with_harness_credentials() {
        let world = RealWorld::new(3).unwrap();
        let network = world.network();

        assert_eq!(network.accounts().count(), 3);
        assert!(network.accounts().all(flock_core::Account::is_connected));
        assert!(network.account(world.users[2]).unwrap().check_credential("pass2"));
    }

    #[test]
    fn wrong_credential_is_mapped() {
        let mut world = RealWorld::new(1).unwrap();
        world.apply(&Operation::LogOut { user: 0 });

        let result = world.apply(&Operation::LogIn { user: 0, correct_credential: false });
        assert_eq!(result, OperationResult::Error(OperationError::CredentialMismatch));
    }

    #[test]
    fn signals_count_direct_deliveries_only() {
        let mut world = RealWorld::new(2).unwrap();
        world.apply(&Operation::Follow { follower: 1, followee: 0 });
        world.apply(&Operation::Publish { user: 0, kind: ModelPostKind::Text });
        world.apply(&Operation::Like { user: 1, post: 0 });

        let state = world.observable_state();
        assert_eq!(state.signals, 1);
        assert_eq!(state.users[1].mailbox.len(), 1);
        assert!(!state.users[1].mailbox[0].direct);
        assert!(state.users[0].mailbox[0].direct);
    }
}
