//! Periodic rules invoked by an external scheduler.
//!
//! Each run is idempotent: invoking a tick twice leaves the same state as
//! invoking it once.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use domains::{Policy, ResWaitWindow, Result, TopicKind, TopicRepository, UserRepository};
use tracing::info;
use uuid::Uuid;

use crate::{rate_limit, reputation, topic_bump};

pub struct MaintenanceService {
    pub users: Arc<dyn UserRepository>,
    pub topics: Arc<dyn TopicRepository>,
    pub policy: Arc<Policy>,
}

impl MaintenanceService {
    /// Zeroes one throttle window for every user. Returns how many users
    /// were changed.
    pub async fn reset_window(&self, window: ResWaitWindow) -> Result<usize> {
        let mut changed = 0;
        for user in self.users.find_all().await? {
            if user.res_wait.counter(window) == 0 {
                continue;
            }
            self.users.update(rate_limit::reset_window(&user, window)).await?;
            changed += 1;
        }
        info!(?window, changed, "throttle window reset");
        Ok(changed)
    }

    /// Daily point budget reset.
    pub async fn reset_points(&self) -> Result<usize> {
        let mut changed = 0;
        for user in self.users.find_all().await? {
            if user.point == 0 {
                continue;
            }
            self.users.update(reputation::reset_point(&user)).await?;
            changed += 1;
        }
        info!(changed, "daily points reset");
        Ok(changed)
    }

    /// Closes one-shot topics that have been quiet for too long.
    pub async fn close_one_shot_topics(&self, now: DateTime<Utc>) -> Result<Vec<Uuid>> {
        let mut closed = Vec::new();
        for topic in self.topics.find_active(TopicKind::One).await? {
            if !topic_bump::should_close(&topic, now, &self.policy) {
                continue;
            }
            self.topics.update(topic_bump::close(&topic)).await?;
            closed.push(topic.id);
        }
        info!(closed = closed.len(), "one-shot topics swept");
        Ok(closed)
    }
}
