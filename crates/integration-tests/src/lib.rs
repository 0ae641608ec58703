//! Wiring shared by the integration tests: every service over the in-memory
//! adapters and a real HMAC key generator.

use std::sync::Arc;

use anyhow::Context;
use auth_adapters::HmacKeyGenerator;
use chrono::{DateTime, Utc};
use configs::{telemetry, LogSettings};
use domains::{Policy, User, UserRepository};
use fake::faker::internet::en::Username;
use fake::Fake;
use secrecy::SecretString;
use services::{MaintenanceService, PostingService, TokenService, VoteService};
use storage_adapters::{
    MemoryMessageRepo, MemoryResRepo, MemoryTokenRepo, MemoryTopicRepo, MemoryUserRepo, UuidV7Ids,
};
use uuid::Uuid;

pub struct World {
    pub policy: Arc<Policy>,
    pub users: Arc<MemoryUserRepo>,
    pub topics: Arc<MemoryTopicRepo>,
    pub responses: Arc<MemoryResRepo>,
    pub tokens: Arc<MemoryTokenRepo>,
    pub messages: Arc<MemoryMessageRepo>,
    pub posting: PostingService,
    pub votes: VoteService,
    pub auth: TokenService,
    pub maintenance: MaintenanceService,
}

impl World {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_policy(Policy::default())
    }

    pub fn with_policy(policy: Policy) -> anyhow::Result<Self> {
        telemetry::init_test_tracing(&LogSettings {
            level: "debug".into(),
            json: false,
        });

        let policy = Arc::new(policy);
        let users = Arc::new(MemoryUserRepo::default());
        let topics = Arc::new(MemoryTopicRepo::default());
        let responses = Arc::new(MemoryResRepo::default());
        let tokens = Arc::new(MemoryTokenRepo::default());
        let messages = Arc::new(MemoryMessageRepo::default());
        let ids = Arc::new(UuidV7Ids);
        let keys = Arc::new(
            HmacKeyGenerator::new(&SecretString::from("integration-salt".to_string()))
                .context("building key generator")?,
        );

        Ok(Self {
            posting: PostingService {
                users: users.clone(),
                topics: topics.clone(),
                responses: responses.clone(),
                ids: ids.clone(),
                policy: policy.clone(),
            },
            votes: VoteService {
                users: users.clone(),
                responses: responses.clone(),
                messages: messages.clone(),
                ids: ids.clone(),
                policy: policy.clone(),
            },
            auth: TokenService {
                tokens: tokens.clone(),
                keys,
                ids,
                policy: policy.clone(),
            },
            maintenance: MaintenanceService {
                users: users.clone(),
                topics: topics.clone(),
                policy: policy.clone(),
            },
            policy,
            users,
            topics,
            responses,
            tokens,
            messages,
        })
    }

    /// Stores a user at `level` whose cooldowns all started at `registered`.
    pub async fn register(&self, level: i64, registered: DateTime<Utc>) -> anyhow::Result<User> {
        let sn: String = Username().fake();
        let user = User {
            level,
            ..User::new(Uuid::now_v7(), sn, registered)
        };
        self.users.insert(user.clone()).await?;
        Ok(user)
    }

    pub async fn user(&self, id: Uuid) -> anyhow::Result<User> {
        Ok(self.users.find_one(id).await?)
    }
}
