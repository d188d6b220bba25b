//! Network
//!
//! The registry that owns every account, post and follow edge, and the entry
//! point for every user action.
//!
//! ## Responsibilities
//!
//! - Registration: unique usernames, credential length bounds
//! - Sessions: log-in and log-out with transition checks
//! - Gating: follow, unfollow and publish require a connected actor
//! - Routing: hands like, comment and new-post events to the router
//!
//! ## Design
//!
//! - Explicitly constructed and passed by reference. There is no global
//!   instance.
//! - Action-based: operations return [`NetworkAction`]s, no direct I/O
//! - All checks run before the first mutation, so a failed operation leaves
//!   the network exactly as it was

use std::fmt;

use crate::{
    account::{Account, AccountId, AccountStore, Credential, require_connected},
    action::NetworkAction,
    config::NetworkConfig,
    error::NetworkError,
    graph::{EdgeError, FollowGraph},
    notification::Notification,
    post::{Post, PostContent, PostId, PostKind, PostRequest},
    queue::NotificationQueue,
    router::{NotificationRouter, RouteEvent, RouterAction, RouterStats},
};

/// In-memory social network.
#[derive(Debug, Clone)]
pub struct Network {
    config: NetworkConfig,
    accounts: AccountStore,
    graph: FollowGraph,
    posts: Vec<Post>,
    router: NotificationRouter,
}

impl Network {
    /// Create an empty network.
    pub fn new(config: NetworkConfig) -> Self {
        tracing::info!(name = %config.name, "network created");

        Self {
            config,
            accounts: AccountStore::new(),
            graph: FollowGraph::new(),
            posts: Vec::new(),
            router: NotificationRouter::new(),
        }
    }

    /// Network name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Active configuration.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Register an account. New accounts start connected.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::UsernameTaken` or
    /// `NetworkError::InvalidCredentialLength`.
    pub fn sign_up(&mut self, username: &str, credential: &str) -> Result<AccountId, NetworkError> {
        let credential = Credential::new(credential);
        let len = credential.char_len();
        if !self.config.accepts_credential_len(len) {
            return Err(NetworkError::InvalidCredentialLength {
                len,
                min: self.config.min_credential_len,
                max: self.config.max_credential_len,
            });
        }

        let id = self.accounts.insert(username, credential)?;
        tracing::info!(%id, username, "account registered");

        Ok(id)
    }

    /// Log an account in.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::UnknownUser`, `NetworkError::CredentialMismatch`,
    /// or `NetworkError::AlreadyConnected`.
    pub fn log_in(
        &mut self,
        username: &str,
        credential: &str,
    ) -> Result<Vec<NetworkAction>, NetworkError> {
        let account = self.accounts.by_username(username)?;
        if !account.check_credential(credential) {
            return Err(NetworkError::CredentialMismatch { username: username.to_string() });
        }
        if account.is_connected() {
            return Err(NetworkError::AlreadyConnected { username: username.to_string() });
        }

        let id = account.id();
        self.accounts.require_mut(id)?.set_connected(true);
        tracing::info!(%id, username, "connected");

        Ok(vec![NetworkAction::Connected { account: id }])
    }

    /// Log an account out.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::UnknownUser` or
    /// `NetworkError::AlreadyDisconnected`.
    pub fn log_out(&mut self, username: &str) -> Result<Vec<NetworkAction>, NetworkError> {
        let account = self.accounts.by_username(username)?;
        if !account.is_connected() {
            return Err(NetworkError::AlreadyDisconnected { username: username.to_string() });
        }

        let id = account.id();
        self.accounts.require_mut(id)?.set_connected(false);
        tracing::info!(%id, username, "disconnected");

        Ok(vec![NetworkAction::Disconnected { account: id }])
    }

    /// Find an account by username.
    pub fn lookup(&self, username: &str) -> Option<AccountId> {
        self.accounts.lookup(username)
    }

    /// Account by id.
    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(id)
    }

    /// All accounts in registration order.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    /// Username of `id`, or `"?"` for an id from another network.
    pub fn username(&self, id: AccountId) -> &str {
        self.accounts.get(id).map_or("?", Account::username)
    }

    /// Post by id.
    pub fn post(&self, id: PostId) -> Option<&Post> {
        self.posts.get(id.index())
    }

    /// Router totals.
    pub fn router_stats(&self) -> RouterStats {
        self.router.stats()
    }

    /// `follower` starts following `followee`.
    ///
    /// Only the follower has to be connected.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::NotConnected`, `NetworkError::SelfFollow`, or
    /// `NetworkError::AlreadyFollowing`.
    pub fn follow(
        &mut self,
        follower: AccountId,
        followee: AccountId,
    ) -> Result<Vec<NetworkAction>, NetworkError> {
        require_connected(self.accounts.require(follower)?)?;
        self.accounts.require(followee)?;

        self.graph.follow(follower, followee).map_err(|e| self.edge_error(e))?;
        tracing::info!(
            follower = self.username(follower),
            followee = self.username(followee),
            "started following"
        );

        Ok(vec![NetworkAction::Followed { follower, followee }])
    }

    /// `follower` stops following `followee`.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::NotConnected` or `NetworkError::NotFollowing`.
    pub fn unfollow(
        &mut self,
        follower: AccountId,
        followee: AccountId,
    ) -> Result<Vec<NetworkAction>, NetworkError> {
        require_connected(self.accounts.require(follower)?)?;
        self.accounts.require(followee)?;

        self.graph.unfollow(follower, followee).map_err(|e| self.edge_error(e))?;
        tracing::info!(
            follower = self.username(follower),
            followee = self.username(followee),
            "unfollowed"
        );

        Ok(vec![NetworkAction::Unfollowed { follower, followee }])
    }

    /// Whether `follower` follows `followee`.
    pub fn is_following(&self, follower: AccountId, followee: AccountId) -> bool {
        self.graph.is_following(follower, followee)
    }

    /// Snapshot of `account`'s followers, in registration order.
    pub fn followers_of(&self, account: AccountId) -> Vec<AccountId> {
        self.graph.followers_of(account)
    }

    /// Snapshot of the accounts `account` follows, in registration order.
    pub fn following_of(&self, account: AccountId) -> Vec<AccountId> {
        self.graph.following_of(account)
    }

    /// Publish a post of a named kind.
    ///
    /// `kind` must name one of `Text`, `Image`, `Sale` (any ASCII case).
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::NotConnected` if the owner is offline, and
    /// `NetworkError::UnknownPostKind`, `NetworkError::MissingField` or
    /// `NetworkError::InvalidPrice` for a malformed request.
    pub fn publish(
        &mut self,
        owner: AccountId,
        kind: &str,
        request: PostRequest,
    ) -> Result<(PostId, Vec<NetworkAction>), NetworkError> {
        require_connected(self.accounts.require(owner)?)?;

        let kind: PostKind = kind.parse()?;
        let content = PostContent::build(kind, request)?;

        self.publish_content(owner, content)
    }

    /// Publish already-built content.
    ///
    /// New-post notifications go to the owner's followers at this moment.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::NotConnected` if the owner is offline.
    pub fn publish_content(
        &mut self,
        owner: AccountId,
        content: PostContent,
    ) -> Result<(PostId, Vec<NetworkAction>), NetworkError> {
        require_connected(self.accounts.require(owner)?)?;

        let id = PostId::new(self.posts.len());
        let kind = content.kind();

        let before = self.router.stats().broadcast;
        self.router.route(RouteEvent::NewPost { initiator: owner }, &self.graph, &mut self.accounts);
        let notified = usize::try_from(self.router.stats().broadcast - before).unwrap_or(usize::MAX);

        self.posts.push(Post::new(id, owner, content));
        self.accounts.require_mut(owner)?.push_post(id);

        tracing::info!(%id, owner = self.username(owner), %kind, notified, "post published");

        Ok((id, vec![NetworkAction::Published { post: id, notified }]))
    }

    /// `actor` likes `post`.
    ///
    /// Liking one's own post is allowed and notifies nobody.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::UnknownAccount` or `NetworkError::UnknownPost`.
    pub fn like(
        &mut self,
        actor: AccountId,
        post: PostId,
    ) -> Result<Vec<NetworkAction>, NetworkError> {
        self.accounts.require(actor)?;
        let recipient = self.require_post(post)?.owner();

        Ok(self.route(RouteEvent::Like { initiator: actor, recipient }))
    }

    /// `actor` comments on `post`.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::UnknownAccount` or `NetworkError::UnknownPost`.
    pub fn comment(
        &mut self,
        actor: AccountId,
        post: PostId,
        body: impl Into<String>,
    ) -> Result<Vec<NetworkAction>, NetworkError> {
        self.accounts.require(actor)?;
        let recipient = self.require_post(post)?.owner();

        Ok(self.route(RouteEvent::Comment { initiator: actor, recipient, body: body.into() }))
    }

    /// Mark a sale listing sold. Requires the owner's credential.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::UnknownPost`, `NetworkError::NotForSale`, or
    /// `NetworkError::CredentialMismatch`.
    pub fn mark_sold(
        &mut self,
        post: PostId,
        credential: &str,
    ) -> Result<Vec<NetworkAction>, NetworkError> {
        self.authorize_listing(post, credential)?;

        self.require_post_mut(post)?.mark_sold()?;
        tracing::info!(%post, "listing sold");

        Ok(vec![NetworkAction::Sold { post }])
    }

    /// Discount a sale listing by `price / percent`. Requires the owner's
    /// credential.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::UnknownPost`, `NetworkError::NotForSale`,
    /// `NetworkError::CredentialMismatch`, `NetworkError::AlreadySold`, or
    /// `NetworkError::InvalidDiscount`.
    pub fn discount(
        &mut self,
        post: PostId,
        percent: f64,
        credential: &str,
    ) -> Result<Vec<NetworkAction>, NetworkError> {
        self.authorize_listing(post, credential)?;

        let price = self.require_post_mut(post)?.discount(percent)?;
        tracing::info!(%post, percent, price, "listing discounted");

        Ok(vec![NetworkAction::Discounted { post, price }])
    }

    /// Pending notifications of `account`, without consuming them.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::UnknownAccount`.
    pub fn pending(&self, account: AccountId) -> Result<&NotificationQueue, NetworkError> {
        Ok(self.accounts.require(account)?.mailbox())
    }

    /// Consume all pending notifications of `account` in arrival order.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::UnknownAccount`.
    pub fn drain_notifications(
        &mut self,
        account: AccountId,
    ) -> Result<Vec<Notification>, NetworkError> {
        Ok(self.accounts.require_mut(account)?.mailbox_mut().drain_all().collect())
    }

    fn route(&mut self, event: RouteEvent) -> Vec<NetworkAction> {
        self.router
            .route(event, &self.graph, &mut self.accounts)
            .into_iter()
            .map(|action| match action {
                RouterAction::Delivered { recipient, notification } => {
                    NetworkAction::Notified { recipient, notification }
                },
            })
            .collect()
    }

    fn require_post(&self, id: PostId) -> Result<&Post, NetworkError> {
        self.posts.get(id.index()).ok_or(NetworkError::UnknownPost(id))
    }

    fn require_post_mut(&mut self, id: PostId) -> Result<&mut Post, NetworkError> {
        self.posts.get_mut(id.index()).ok_or(NetworkError::UnknownPost(id))
    }

    /// Check that `post` is a listing and `credential` is its owner's.
    fn authorize_listing(&self, post: PostId, credential: &str) -> Result<(), NetworkError> {
        let target = self.require_post(post)?;
        if target.listing().is_none() {
            return Err(NetworkError::NotForSale { post });
        }

        let owner = self.accounts.require(target.owner())?;
        if !owner.check_credential(credential) {
            return Err(NetworkError::CredentialMismatch { username: owner.username().to_string() });
        }

        Ok(())
    }

    fn edge_error(&self, err: EdgeError) -> NetworkError {
        match err {
            EdgeError::SelfEdge(id) => {
                NetworkError::SelfFollow { username: self.username(id).to_string() }
            },
            EdgeError::Exists { follower, followee } => NetworkError::AlreadyFollowing {
                follower: self.username(follower).to_string(),
                followee: self.username(followee).to_string(),
            },
            EdgeError::Missing { follower, followee } => NetworkError::NotFollowing {
                follower: self.username(follower).to_string(),
                followee: self.username(followee).to_string(),
            },
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new(NetworkConfig::default())
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} social network:", self.config.name)?;
        for account in self.accounts.iter() {
            write!(
                f,
                "\nUser name: {}, Number of posts: {}, Number of followers: {}",
                account.username(),
                account.posts().len(),
                self.graph.follower_count(account.id()),
            )?;
        }
        Ok(())
    }
}
