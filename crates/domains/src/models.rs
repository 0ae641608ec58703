//! # Domain Models
//!
//! These structs represent the core entities of the forum.
//! Entities are plain values: every transition in `services` takes a borrowed
//! snapshot and hands back a new one, so a rejected action never leaves a
//! half-mutated record behind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account with its reputation and posting throttle state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Screen name
    pub sn: String,
    /// Reputation, always within `[1, Policy::level_max]`
    pub level: i64,
    /// Points spent today; the remaining budget is `level - point`
    pub point: i64,
    pub res_wait: ResWait,
    /// Last time a normal topic was created
    pub last_topic: DateTime<Utc>,
    /// Last time a one-shot topic was created
    pub last_one_topic: DateTime<Utc>,
    pub date: DateTime<Utc>,
}

impl User {
    /// A freshly registered user. Every cooldown starts at registration time,
    /// so new accounts are throttled like anyone who just posted.
    pub fn new(id: Uuid, sn: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            sn: sn.into(),
            level: 1,
            point: 0,
            res_wait: ResWait::starting_at(now),
            last_topic: now,
            last_one_topic: now,
            date: now,
        }
    }
}

/// Per-window post counters. Only an external tick ever lowers them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResWait {
    pub m10: u32,
    pub m30: u32,
    pub h1: u32,
    pub h6: u32,
    pub h12: u32,
    pub d1: u32,
    /// Timestamp of the most recent accepted post
    pub last: DateTime<Utc>,
}

impl ResWait {
    pub fn starting_at(last: DateTime<Utc>) -> Self {
        Self {
            m10: 0,
            m30: 0,
            h1: 0,
            h6: 0,
            h12: 0,
            d1: 0,
            last,
        }
    }

    pub fn counter(&self, window: ResWaitWindow) -> u32 {
        match window {
            ResWaitWindow::M10 => self.m10,
            ResWaitWindow::M30 => self.m30,
            ResWaitWindow::H1 => self.h1,
            ResWaitWindow::H6 => self.h6,
            ResWaitWindow::H12 => self.h12,
            ResWaitWindow::D1 => self.d1,
        }
    }

    pub fn counter_mut(&mut self, window: ResWaitWindow) -> &mut u32 {
        match window {
            ResWaitWindow::M10 => &mut self.m10,
            ResWaitWindow::M30 => &mut self.m30,
            ResWaitWindow::H1 => &mut self.h1,
            ResWaitWindow::H6 => &mut self.h6,
            ResWaitWindow::H12 => &mut self.h12,
            ResWaitWindow::D1 => &mut self.d1,
        }
    }
}

/// The six throttle horizons, longest last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResWaitWindow {
    M10,
    M30,
    H1,
    H6,
    H12,
    D1,
}

impl ResWaitWindow {
    pub const ALL: [ResWaitWindow; 6] = [
        ResWaitWindow::M10,
        ResWaitWindow::M30,
        ResWaitWindow::H1,
        ResWaitWindow::H6,
        ResWaitWindow::H12,
        ResWaitWindow::D1,
    ];
}

/// Lifecycle of a response. Leaving `Active` is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteFlag {
    Active,
    /// Deleted by its author
    #[serde(rename = "self")]
    SelfDeleted,
    /// Deleted because downvotes crossed the response's level
    Vote,
    /// Administratively frozen
    Freeze,
}

/// One user's vote on a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub user: Uuid,
    /// Weight counted toward the deletion threshold (negative for downvotes)
    pub value: i64,
    /// Level change applied to the response author when the vote was cast
    pub delta: i64,
}

/// A response posted into a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Res {
    pub id: Uuid,
    pub topic: Uuid,
    pub author: Uuid,
    pub date: DateTime<Utc>,
    pub text: String,
    /// The response this one answers, if any
    pub reply: Option<Uuid>,
    /// Whether this response bumps its topic
    pub age: bool,
    /// At most one entry per voting user
    pub vote: Vec<Vote>,
    /// Vote capacity snapshot: `author.level * 5` at creation
    pub level: i64,
    pub delete_flag: DeleteFlag,
}

impl Res {
    pub fn vote_sum(&self) -> i64 {
        self.vote.iter().map(|v| v.value).sum()
    }

    pub fn vote_of(&self, user: Uuid) -> Option<&Vote> {
        self.vote.iter().find(|v| v.user == user)
    }
}

/// Content of a response as submitted, before it becomes a `Res`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResDraft {
    pub text: String,
    pub reply: Option<Uuid>,
    pub age: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicKind {
    Normal,
    /// Closes itself after a quiet period
    One,
}

/// A thread of responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: Uuid,
    pub title: String,
    pub kind: TopicKind,
    /// One-way true -> false
    pub active: bool,
    pub date: DateTime<Utc>,
    /// Last touch by any response
    pub update: DateTime<Utc>,
    /// Last touch by a bumping response; drives display order
    pub age_update: DateTime<Utc>,
}

impl Topic {
    pub fn new(
        id: Uuid,
        title: impl Into<String>,
        kind: TopicKind,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            kind,
            active: true,
            date: now,
            update: now,
            age_update: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicDraft {
    pub title: String,
    pub kind: TopicKind,
}

/// A client credential owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: Uuid,
    /// Current shared secret
    pub key: String,
    pub user: Uuid,
    /// Pending challenge requests, collected lazily
    pub req: Vec<TokenReq>,
    pub date: DateTime<Utc>,
}

/// A short-lived challenge entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenReq {
    pub key: String,
    pub expire_at: DateTime<Utc>,
    pub active: bool,
}

impl TokenReq {
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.active && now < self.expire_at
    }
}

/// The pair handed to a client to be exchanged out-of-band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: Uuid,
    pub key: String,
}

/// Descriptor of an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub id: Uuid,
    pub key: String,
    pub user: Uuid,
}

/// A notification produced by a transition; the caller persists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub receiver: Uuid,
    /// The response the notification is about
    pub res: Uuid,
    pub text: String,
}

/// A stored notification addressed to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub receiver: Uuid,
    /// Response the message refers to, if any
    pub res: Option<Uuid>,
    pub text: String,
    pub date: DateTime<Utc>,
}
