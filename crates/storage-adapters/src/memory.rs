//! `DashMap`-backed repositories.
//!
//! Each repository stores owned snapshots keyed by id. `update` of an
//! unknown id is a `NotFound`, `insert` of a known id a `Conflict`, mirroring
//! what a document store with a unique primary key reports.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use domains::{
    DomainError, Message, MessageRepository, Res, ResRepository, Result, Token, TokenRepository,
    Topic, TopicKind, TopicRepository, User, UserRepository,
};
use tracing::trace;
use uuid::Uuid;

/// A keyed collection of snapshots.
#[derive(Debug)]
struct Table<T> {
    name: &'static str,
    rows: DashMap<Uuid, T>,
}

impl<T: Clone> Table<T> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            rows: DashMap::new(),
        }
    }

    fn find_one(&self, id: Uuid) -> Result<T> {
        self.rows
            .get(&id)
            .map(|row| row.value().clone())
            .ok_or_else(|| DomainError::not_found(format!("{} {id}", self.name)))
    }

    fn insert(&self, id: Uuid, row: T) -> Result<()> {
        match self.rows.entry(id) {
            Entry::Occupied(_) => Err(DomainError::conflict(format!(
                "{} {id} already exists",
                self.name
            ))),
            Entry::Vacant(slot) => {
                slot.insert(row);
                trace!(table = self.name, %id, "inserted");
                Ok(())
            }
        }
    }

    fn update(&self, id: Uuid, row: T) -> Result<()> {
        match self.rows.get_mut(&id) {
            Some(mut slot) => {
                *slot = row;
                trace!(table = self.name, %id, "updated");
                Ok(())
            }
            None => Err(DomainError::not_found(format!("{} {id}", self.name))),
        }
    }

    fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows
            .iter()
            .filter(|row| pred(row.value()))
            .map(|row| row.value().clone())
            .collect()
    }
}

#[derive(Debug)]
pub struct MemoryUserRepo {
    table: Table<User>,
}

impl Default for MemoryUserRepo {
    fn default() -> Self {
        Self {
            table: Table::new("user"),
        }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepo {
    async fn find_one(&self, id: Uuid) -> Result<User> {
        self.table.find_one(id)
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        Ok(self.table.filter(|_| true))
    }

    async fn insert(&self, user: User) -> Result<()> {
        self.table.insert(user.id, user)
    }

    async fn update(&self, user: User) -> Result<()> {
        self.table.update(user.id, user)
    }
}

#[derive(Debug)]
pub struct MemoryResRepo {
    table: Table<Res>,
}

impl Default for MemoryResRepo {
    fn default() -> Self {
        Self {
            table: Table::new("res"),
        }
    }
}

#[async_trait]
impl ResRepository for MemoryResRepo {
    async fn find_one(&self, id: Uuid) -> Result<Res> {
        self.table.find_one(id)
    }

    async fn insert(&self, res: Res) -> Result<()> {
        self.table.insert(res.id, res)
    }

    async fn update(&self, res: Res) -> Result<()> {
        self.table.update(res.id, res)
    }

    async fn count_replies(&self, id: Uuid) -> Result<u64> {
        Ok(self.table.filter(|r| r.reply == Some(id)).len() as u64)
    }
}

#[derive(Debug)]
pub struct MemoryTopicRepo {
    table: Table<Topic>,
}

impl Default for MemoryTopicRepo {
    fn default() -> Self {
        Self {
            table: Table::new("topic"),
        }
    }
}

#[async_trait]
impl TopicRepository for MemoryTopicRepo {
    async fn find_one(&self, id: Uuid) -> Result<Topic> {
        self.table.find_one(id)
    }

    async fn insert(&self, topic: Topic) -> Result<()> {
        self.table.insert(topic.id, topic)
    }

    async fn update(&self, topic: Topic) -> Result<()> {
        self.table.update(topic.id, topic)
    }

    async fn find_active(&self, kind: TopicKind) -> Result<Vec<Topic>> {
        Ok(self.table.filter(|t| t.active && t.kind == kind))
    }
}

#[derive(Debug)]
pub struct MemoryTokenRepo {
    table: Table<Token>,
}

impl Default for MemoryTokenRepo {
    fn default() -> Self {
        Self {
            table: Table::new("token"),
        }
    }
}

#[async_trait]
impl TokenRepository for MemoryTokenRepo {
    async fn find_one(&self, id: Uuid) -> Result<Token> {
        self.table.find_one(id)
    }

    async fn insert(&self, token: Token) -> Result<()> {
        self.table.insert(token.id, token)
    }

    async fn update(&self, token: Token) -> Result<()> {
        self.table.update(token.id, token)
    }
}

#[derive(Debug)]
pub struct MemoryMessageRepo {
    table: Table<Message>,
}

impl Default for MemoryMessageRepo {
    fn default() -> Self {
        Self {
            table: Table::new("msg"),
        }
    }
}

impl MemoryMessageRepo {
    /// Messages addressed to `receiver`, oldest first.
    pub fn for_receiver(&self, receiver: Uuid) -> Vec<Message> {
        let mut msgs = self.table.filter(|m| m.receiver == receiver);
        msgs.sort_by_key(|m| m.date);
        msgs
    }
}

#[async_trait]
impl MessageRepository for MemoryMessageRepo {
    async fn insert(&self, msg: Message) -> Result<()> {
        self.table.insert(msg.id, msg)
    }
}
