//! Multi-window posting throttle and topic creation cooldowns.
//!
//! Window counters only ever grow here. Lowering them is the job of the
//! periodic tick, which zeroes one window at a time via [`reset_window`].

use chrono::{DateTime, Utc};
use domains::{DomainError, Policy, Result, ResWaitWindow, TopicKind, User};
use tracing::{debug, warn};

/// Leniency multiplier: 1 at level 0, `max_lv_coefficient` at `level_max`.
pub fn coefficient(level: i64, policy: &Policy) -> f64 {
    (level as f64 / policy.level_max as f64) * (policy.res_wait.max_lv_coefficient - 1.0) + 1.0
}

/// Admits a new response from `user` at `now`, or rejects it without
/// touching any state.
pub fn try_accept_post(user: &User, now: DateTime<Utc>, policy: &Policy) -> Result<User> {
    let coe = coefficient(user.level, policy);
    let limits = &policy.res_wait;

    let within_windows = ResWaitWindow::ALL
        .iter()
        .all(|w| (user.res_wait.counter(*w) as f64) < limits.limit(*w) as f64 * coe);
    let interval_elapsed = user.res_wait.last + limits.min_interval <= now;

    if !(within_windows && interval_elapsed) {
        warn!(user_id = %user.id, within_windows, interval_elapsed, "post throttled");
        return Err(DomainError::forbidden("consecutive posting not allowed"));
    }

    let mut next = user.clone();
    for w in ResWaitWindow::ALL {
        *next.res_wait.counter_mut(w) += 1;
    }
    next.res_wait.last = now;
    debug!(user_id = %user.id, d1 = next.res_wait.d1, "post accepted");
    Ok(next)
}

/// Admits creation of a topic of `kind`, checking the matching cooldown.
pub fn try_accept_topic(
    user: &User,
    kind: TopicKind,
    now: DateTime<Utc>,
    policy: &Policy,
) -> Result<User> {
    let mut next = user.clone();
    match kind {
        TopicKind::Normal => {
            if user.last_topic + policy.topic_create_cooldown > now {
                return Err(DomainError::forbidden("topic creation cooldown has not elapsed"));
            }
            next.last_topic = now;
        }
        TopicKind::One => {
            if user.last_one_topic + policy.one_shot_create_cooldown > now {
                return Err(DomainError::forbidden(
                    "one-shot topic creation cooldown has not elapsed",
                ));
            }
            next.last_one_topic = now;
        }
    }
    Ok(next)
}

/// Zeroes exactly one window counter. Idempotent.
pub fn reset_window(user: &User, window: ResWaitWindow) -> User {
    let mut next = user.clone();
    *next.res_wait.counter_mut(window) = 0;
    next
}
