//! Level and daily point budget of a user.

use domains::{DomainError, Policy, Result, User};
use tracing::debug;

/// Assigns `raw` as the user's level, clamped into `[1, level_max]`.
pub fn change_lv(user: &User, raw: i64, policy: &Policy) -> User {
    let level = raw.min(policy.level_max).max(1);
    User {
        level,
        ..user.clone()
    }
}

/// Spends `cost` points from today's budget (`level - point`).
pub fn use_point(user: &User, cost: i64) -> Result<User> {
    if cost < 0 {
        return Err(DomainError::validation("point cost must not be negative"));
    }
    if user.level < user.point + cost {
        debug!(user_id = %user.id, level = user.level, point = user.point, cost, "point budget exhausted");
        return Err(DomainError::forbidden("insufficient points"));
    }
    Ok(User {
        point: user.point + cost,
        ..user.clone()
    })
}

/// Daily reset of the spent budget.
pub fn reset_point(user: &User) -> User {
    User {
        point: 0,
        ..user.clone()
    }
}
