//! Submitting responses and topics through the repository ports.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use domains::{
    DomainError, IdGenerator, Policy, Res, ResDraft, ResRepository, Result, Topic, TopicDraft,
    TopicRepository, UserRepository,
};
use tracing::info;
use uuid::Uuid;

use crate::{content, rate_limit, topic_bump};

pub struct PostingService {
    pub users: Arc<dyn UserRepository>,
    pub topics: Arc<dyn TopicRepository>,
    pub responses: Arc<dyn ResRepository>,
    pub ids: Arc<dyn IdGenerator>,
    pub policy: Arc<Policy>,
}

impl PostingService {
    /// Posts a response. The throttle is consulted before anything else, and
    /// nothing is persisted unless every check passes.
    pub async fn post_response(
        &self,
        user_id: Uuid,
        topic_id: Uuid,
        draft: ResDraft,
        now: DateTime<Utc>,
    ) -> Result<Res> {
        content::validate_res_draft(&draft)?;

        let user = self.users.find_one(user_id).await?;
        let user = rate_limit::try_accept_post(&user, now, &self.policy)?;

        let topic = self.topics.find_one(topic_id).await?;
        if let Some(reply) = draft.reply {
            let target = self.responses.find_one(reply).await?;
            if target.topic != topic.id {
                return Err(DomainError::validation("reply target belongs to another topic"));
            }
        }

        let res = content::new_res(self.ids.next_id(), &topic, &user, draft, now);
        let topic = topic_bump::attach(&topic, &res)?;

        self.responses.insert(res.clone()).await?;
        self.topics.update(topic).await?;
        self.users.update(user).await?;

        info!(res_id = %res.id, topic_id = %topic_id, user_id = %user_id, "response posted");
        Ok(res)
    }

    pub async fn create_topic(
        &self,
        user_id: Uuid,
        draft: TopicDraft,
        now: DateTime<Utc>,
    ) -> Result<Topic> {
        content::validate_topic_draft(&draft)?;

        let user = self.users.find_one(user_id).await?;
        let user = rate_limit::try_accept_topic(&user, draft.kind, now, &self.policy)?;
        let topic = Topic::new(self.ids.next_id(), draft.title, draft.kind, now);

        self.topics.insert(topic.clone()).await?;
        self.users.update(user).await?;

        info!(topic_id = %topic.id, user_id = %user_id, kind = ?topic.kind, "topic created");
        Ok(topic)
    }

    pub async fn edit_topic(&self, user_id: Uuid, topic_id: Uuid, title: &str) -> Result<Topic> {
        let user = self.users.find_one(user_id).await?;
        let topic = self.topics.find_one(topic_id).await?;
        let (topic, user) = topic_bump::edit_topic(&topic, &user, title, &self.policy)?;

        self.topics.update(topic.clone()).await?;
        self.users.update(user).await?;
        Ok(topic)
    }
}
