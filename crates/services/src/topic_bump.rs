//! Topic touch timestamps, bumping, closing and paid edits.

use chrono::{DateTime, Utc};
use domains::{DomainError, Policy, Res, Result, Topic, TopicKind, User};

use crate::content::validate_title;
use crate::reputation::use_point;

/// Attaches `res` to `topic`. Every response touches `update`; only a
/// bumping one (`age`) touches `age_update`.
pub fn attach(topic: &Topic, res: &Res) -> Result<Topic> {
    if !topic.active {
        return Err(DomainError::forbidden("topic already closed, cannot post"));
    }
    let mut next = topic.clone();
    next.update = res.date;
    if res.age {
        next.age_update = res.date;
    }
    Ok(next)
}

/// Whether a periodic sweep should close this topic.
pub fn should_close(topic: &Topic, now: DateTime<Utc>, policy: &Policy) -> bool {
    topic.kind == TopicKind::One && now - topic.update > policy.one_shot_close_after
}

pub fn close(topic: &Topic) -> Topic {
    Topic {
        active: false,
        ..topic.clone()
    }
}

/// Retitles a normal topic, charging the editor's daily points.
pub fn edit_topic(
    topic: &Topic,
    editor: &User,
    title: &str,
    policy: &Policy,
) -> Result<(Topic, User)> {
    validate_title(title)?;
    if topic.kind != TopicKind::Normal {
        return Err(DomainError::forbidden("only normal topics can be edited"));
    }
    let editor = use_point(editor, policy.topic_edit_point_cost)?;
    let next = Topic {
        title: title.to_string(),
        ..topic.clone()
    };
    Ok((next, editor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use domains::DeleteFlag;
    use uuid::Uuid;

    fn res_at(topic: &Topic, date: DateTime<Utc>, age: bool) -> Res {
        Res {
            id: Uuid::now_v7(),
            topic: topic.id,
            author: Uuid::now_v7(),
            date,
            text: "reply".into(),
            reply: None,
            age,
            vote: vec![],
            level: 5,
            delete_flag: DeleteFlag::Active,
        }
    }

    #[test]
    fn sage_response_does_not_bump() {
        let start = Utc::now();
        let topic = Topic::new(Uuid::now_v7(), "t", TopicKind::Normal, start);
        let later = start + Duration::minutes(5);

        let touched = attach(&topic, &res_at(&topic, later, false)).unwrap();
        assert_eq!(touched.update, later);
        assert_eq!(touched.age_update, start);

        let bumped = attach(&touched, &res_at(&topic, later + Duration::minutes(1), true)).unwrap();
        assert_eq!(bumped.age_update, later + Duration::minutes(1));
    }

    #[test]
    fn closed_topic_rejects_responses() {
        let now = Utc::now();
        let topic = close(&Topic::new(Uuid::now_v7(), "t", TopicKind::One, now));
        let err = attach(&topic, &res_at(&topic, now, true)).unwrap_err();
        assert_eq!(err, DomainError::forbidden("topic already closed, cannot post"));
    }

    #[test]
    fn only_quiet_one_shot_topics_close() {
        let policy = Policy::default();
        let now = Utc::now();
        let one = Topic::new(Uuid::now_v7(), "t", TopicKind::One, now);
        let normal = Topic::new(Uuid::now_v7(), "t", TopicKind::Normal, now);

        assert!(!should_close(&one, now + Duration::hours(24), &policy));
        assert!(should_close(&one, now + Duration::hours(24) + Duration::seconds(1), &policy));
        assert!(!should_close(&normal, now + Duration::days(30), &policy));
    }

    #[test]
    fn edit_costs_points_and_needs_normal_topic() {
        let policy = Policy::default();
        let now = Utc::now();
        let topic = Topic::new(Uuid::now_v7(), "old", TopicKind::Normal, now);
        let rich = User {
            level: 15,
            ..User::new(Uuid::now_v7(), "ed", now)
        };

        let (edited, charged) = edit_topic(&topic, &rich, "new", &policy).unwrap();
        assert_eq!(edited.title, "new");
        assert_eq!(charged.point, 10);

        let poor = User { level: 5, ..rich.clone() };
        assert!(matches!(
            edit_topic(&topic, &poor, "new", &policy),
            Err(DomainError::Forbidden(_))
        ));

        let one = Topic { kind: TopicKind::One, ..topic };
        assert!(matches!(
            edit_topic(&one, &rich, "new", &policy),
            Err(DomainError::Forbidden(_))
        ));
    }
}
