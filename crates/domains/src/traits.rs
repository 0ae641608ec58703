//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be wired into the services.
//! Repositories only gather and store snapshots; no invariant is enforced
//! behind them.

use crate::error::Result;
use crate::models::{Message, Res, Token, Topic, TopicKind, User};
use async_trait::async_trait;
use uuid::Uuid;

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_one(&self, id: Uuid) -> Result<User>;
    /// Every user; used by the periodic reset rules.
    async fn find_all(&self) -> Result<Vec<User>>;
    async fn insert(&self, user: User) -> Result<()>;
    async fn update(&self, user: User) -> Result<()>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ResRepository: Send + Sync {
    async fn find_one(&self, id: Uuid) -> Result<Res>;
    async fn insert(&self, res: Res) -> Result<()>;
    async fn update(&self, res: Res) -> Result<()>;
    /// Number of responses whose `reply` points at `id`.
    async fn count_replies(&self, id: Uuid) -> Result<u64>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait TopicRepository: Send + Sync {
    async fn find_one(&self, id: Uuid) -> Result<Topic>;
    async fn insert(&self, topic: Topic) -> Result<()>;
    async fn update(&self, topic: Topic) -> Result<()>;
    /// Active topics of the given kind.
    async fn find_active(&self, kind: TopicKind) -> Result<Vec<Topic>>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn find_one(&self, id: Uuid) -> Result<Token>;
    async fn insert(&self, token: Token) -> Result<()>;
    async fn update(&self, token: Token) -> Result<()>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn insert(&self, msg: Message) -> Result<()>;
}

/// Source of secrets and challenge keys. Output must be indistinguishable
/// from random to clients.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait KeyGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Source of entity identifiers.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> Uuid;
}
