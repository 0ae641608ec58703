//! Numeric rules of the reputation economy and posting throttle.
//!
//! Loaded by the `configs` crate; the defaults mirror a production deployment.

use chrono::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
    /// Upper bound of `User::level`
    pub level_max: i64,
    pub res_wait: ResWaitLimits,
    /// Lifetime of a token challenge request
    pub token_request_expire: Duration,
    /// Points charged for editing a topic
    pub topic_edit_point_cost: i64,
    /// Quiet period after which a one-shot topic is closed
    pub one_shot_close_after: Duration,
    pub topic_create_cooldown: Duration,
    pub one_shot_create_cooldown: Duration,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            level_max: 1000,
            res_wait: ResWaitLimits::default(),
            token_request_expire: Duration::minutes(5),
            topic_edit_point_cost: 10,
            one_shot_close_after: Duration::hours(24),
            topic_create_cooldown: Duration::minutes(30),
            one_shot_create_cooldown: Duration::hours(24),
        }
    }
}

/// Base per-window post limits, scaled by the level coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct ResWaitLimits {
    /// Multiplier reached at `level_max`
    pub max_lv_coefficient: f64,
    /// Minimum gap between two accepted posts
    pub min_interval: Duration,
    pub m10: u32,
    pub m30: u32,
    pub h1: u32,
    pub h6: u32,
    pub h12: u32,
    pub d1: u32,
}

impl ResWaitLimits {
    pub fn limit(&self, window: crate::ResWaitWindow) -> u32 {
        use crate::ResWaitWindow::*;
        match window {
            M10 => self.m10,
            M30 => self.m30,
            H1 => self.h1,
            H6 => self.h6,
            H12 => self.h12,
            D1 => self.d1,
        }
    }
}

impl Default for ResWaitLimits {
    fn default() -> Self {
        Self {
            max_lv_coefficient: 3.0,
            min_interval: Duration::seconds(7),
            m10: 10,
            m30: 15,
            h1: 20,
            h6: 30,
            h12: 40,
            d1: 50,
        }
    }
}
