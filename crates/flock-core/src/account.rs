//! Accounts and the connection gate.
//!
//! An [`Account`] is the identity every action is attributed to. It owns its
//! notification mailbox and the list of posts it published. Follower edges
//! live in [`FollowGraph`](crate::graph::FollowGraph), not here.
//!
//! # Connection gate
//!
//! Mutating actions (follow, unfollow, publish) call [`require_connected`]
//! before touching any state. A disconnected actor gets
//! [`NetworkError::NotConnected`] and nothing else happens.

use std::{collections::HashMap, fmt};

use crate::{
    error::NetworkError, notification::Notification, post::PostId, queue::NotificationQueue,
    router::Mailboxes,
};

/// Dense account identifier, assigned in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(usize);

impl AccountId {
    /// Create an id from its raw index.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Raw index of this id.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "account#{}", self.0)
    }
}

/// Opaque credential token.
///
/// Compared for exact equality only. The `Debug` impl never prints the
/// token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Length of the token in characters.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(<redacted {} chars>)", self.char_len())
    }
}

/// A registered identity.
#[derive(Debug, Clone)]
pub struct Account {
    id: AccountId,
    username: String,
    credential: Credential,
    connected: bool,
    mailbox: NotificationQueue,
    posts: Vec<PostId>,
}

impl Account {
    /// Create a connected account with an empty mailbox.
    pub fn new(id: AccountId, username: impl Into<String>, credential: Credential) -> Self {
        Self {
            id,
            username: username.into(),
            credential,
            connected: true,
            mailbox: NotificationQueue::new(),
            posts: Vec::new(),
        }
    }

    /// Account id.
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Unique username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Exact comparison against the stored credential.
    pub fn check_credential(&self, candidate: &str) -> bool {
        self.credential.matches(candidate)
    }

    /// Whether the account is currently connected.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Set the connection flag.
    ///
    /// No transition checks here; the registry validates log-in and log-out.
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    /// Pending notifications.
    pub fn mailbox(&self) -> &NotificationQueue {
        &self.mailbox
    }

    /// Mutable access to pending notifications.
    pub fn mailbox_mut(&mut self) -> &mut NotificationQueue {
        &mut self.mailbox
    }

    /// Posts published by this account, oldest first.
    pub fn posts(&self) -> &[PostId] {
        &self.posts
    }

    pub(crate) fn push_post(&mut self, post: PostId) {
        self.posts.push(post);
    }
}

/// Guard clause for connection-gated operations.
pub fn require_connected(account: &Account) -> Result<(), NetworkError> {
    if account.is_connected() {
        Ok(())
    } else {
        Err(NetworkError::NotConnected { username: account.username.clone() })
    }
}

/// Arena of accounts with a username index.
#[derive(Debug, Clone, Default)]
pub struct AccountStore {
    accounts: Vec<Account>,
    by_username: HashMap<String, AccountId>,
}

impl AccountStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the store has no accounts.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::UsernameTaken` if the username exists.
    pub fn insert(
        &mut self,
        username: &str,
        credential: Credential,
    ) -> Result<AccountId, NetworkError> {
        if self.by_username.contains_key(username) {
            return Err(NetworkError::UsernameTaken { username: username.to_string() });
        }

        let id = AccountId::new(self.accounts.len());

        self.accounts.push(Account::new(id, username, credential));
        self.by_username.insert(username.to_string(), id);

        Ok(id)
    }

    /// Find an account by username.
    pub fn lookup(&self, username: &str) -> Option<AccountId> {
        self.by_username.get(username).copied()
    }

    /// Account by id.
    pub fn get(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(id.index())
    }

    /// Mutable account by id.
    pub fn get_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.get_mut(id.index())
    }

    /// Account by id, or `UnknownAccount`.
    pub fn require(&self, id: AccountId) -> Result<&Account, NetworkError> {
        self.get(id).ok_or(NetworkError::UnknownAccount(id))
    }

    /// Mutable account by id, or `UnknownAccount`.
    pub fn require_mut(&mut self, id: AccountId) -> Result<&mut Account, NetworkError> {
        self.get_mut(id).ok_or(NetworkError::UnknownAccount(id))
    }

    /// Account by username, or `UnknownUser`.
    pub fn by_username(&self, username: &str) -> Result<&Account, NetworkError> {
        self.lookup(username)
            .and_then(|id| self.get(id))
            .ok_or_else(|| NetworkError::UnknownUser { username: username.to_string() })
    }

    /// All accounts in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }
}

impl Mailboxes for AccountStore {
    fn deliver(&mut self, recipient: AccountId, notification: Notification) -> bool {
        match self.get_mut(recipient) {
            Some(account) => {
                account.mailbox_mut().enqueue(notification);
                true
            },
            None => false,
        }
    }
}
