//! Field checks for submitted content and construction of new responses.
//!
//! Validation runs before any transition, so a malformed submission never
//! consumes rate-limit budget.

use chrono::{DateTime, Utc};
use domains::{DeleteFlag, DomainError, Res, ResDraft, Result, Topic, TopicDraft, User};
use uuid::Uuid;

pub const TITLE_MAX_CHARS: usize = 100;
pub const TEXT_MAX_CHARS: usize = 5000;

pub fn validate_title(title: &str) -> Result<()> {
    check_len("title", title, TITLE_MAX_CHARS)
}

pub fn validate_res_draft(draft: &ResDraft) -> Result<()> {
    check_len("text", &draft.text, TEXT_MAX_CHARS)
}

pub fn validate_topic_draft(draft: &TopicDraft) -> Result<()> {
    validate_title(&draft.title)
}

fn check_len(field: &str, value: &str, max: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} must not be blank")));
    }
    if value.chars().count() > max {
        return Err(DomainError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// A new active response in `topic`; its vote capacity is a snapshot of
/// the author's level.
pub fn new_res(id: Uuid, topic: &Topic, author: &User, draft: ResDraft, now: DateTime<Utc>) -> Res {
    Res {
        id,
        topic: topic.id,
        author: author.id,
        date: now,
        text: draft.text,
        reply: draft.reply,
        age: draft.age,
        vote: Vec::new(),
        level: author.level * 5,
        delete_flag: DeleteFlag::Active,
    }
}
