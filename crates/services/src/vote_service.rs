//! Voting and deletion through the repository ports.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use domains::{
    IdGenerator, Message, MessageRepository, Policy, Res, ResRepository, Result, User,
    UserRepository,
};
use uuid::Uuid;

use crate::voting::{self, VoteOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteKind {
    Up,
    Down,
}

pub struct VoteService {
    pub users: Arc<dyn UserRepository>,
    pub responses: Arc<dyn ResRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub ids: Arc<dyn IdGenerator>,
    pub policy: Arc<Policy>,
}

impl VoteService {
    pub async fn vote(
        &self,
        res_id: Uuid,
        voter_id: Uuid,
        kind: VoteKind,
        now: DateTime<Utc>,
    ) -> Result<Res> {
        let (res, voter, author) = self.load(res_id, voter_id).await?;
        let outcome = match kind {
            VoteKind::Up => voting::upvote(&res, &voter, &author, &self.policy)?,
            VoteKind::Down => voting::downvote(&res, &voter, &author, &self.policy)?,
        };
        self.persist(outcome, now).await
    }

    pub async fn cancel_vote(&self, res_id: Uuid, voter_id: Uuid, now: DateTime<Utc>) -> Result<Res> {
        let (res, voter, author) = self.load(res_id, voter_id).await?;
        let outcome = voting::cancel_vote(&res, &voter, &author, &self.policy)?;
        self.persist(outcome, now).await
    }

    pub async fn delete_res(&self, res_id: Uuid, acting_id: Uuid) -> Result<Res> {
        let res = self.responses.find_one(res_id).await?;
        let acting = self.users.find_one(acting_id).await?;
        let (res, author) = voting::self_delete(&res, &acting, &self.policy)?;

        self.responses.update(res.clone()).await?;
        self.users.update(author).await?;
        Ok(res)
    }

    /// Number of responses answering `res_id`; derived on every call.
    pub async fn reply_count(&self, res_id: Uuid) -> Result<u64> {
        self.responses.count_replies(res_id).await
    }

    async fn load(&self, res_id: Uuid, voter_id: Uuid) -> Result<(Res, User, User)> {
        let res = self.responses.find_one(res_id).await?;
        let voter = self.users.find_one(voter_id).await?;
        let author = if res.author == voter.id {
            voter.clone()
        } else {
            self.users.find_one(res.author).await?
        };
        Ok((res, voter, author))
    }

    async fn persist(&self, outcome: VoteOutcome, now: DateTime<Utc>) -> Result<Res> {
        let VoteOutcome {
            res,
            author,
            notification,
        } = outcome;

        self.responses.update(res.clone()).await?;
        self.users.update(author).await?;
        if let Some(n) = notification {
            self.messages
                .insert(Message {
                    id: self.ids.next_id(),
                    receiver: n.receiver,
                    res: Some(n.res),
                    text: n.text,
                    date: now,
                })
                .await?;
        }
        Ok(res)
    }
}
