use chrono::{Duration, Utc};
use domains::{DomainError, ResDraft, ResRepository, TopicDraft, TopicKind, TopicRepository};
use integration_tests::World;
use tokio_test::assert_err;

fn say(text: &str, age: bool) -> ResDraft {
    ResDraft {
        text: text.into(),
        reply: None,
        age,
    }
}

#[tokio::test]
async fn thread_lifecycle_with_bumps_and_throttle() -> anyhow::Result<()> {
    let world = World::new()?;
    let t0 = Utc::now();
    let op = world.register(20, t0 - Duration::days(3)).await?;

    let topic = world
        .posting
        .create_topic(
            op.id,
            TopicDraft {
                title: "rust questions".into(),
                kind: TopicKind::Normal,
            },
            t0,
        )
        .await?;
    assert_eq!(world.user(op.id).await?.last_topic, t0);

    // a second topic inside the cooldown is refused
    let again = TopicDraft {
        title: "another".into(),
        kind: TopicKind::Normal,
    };
    assert!(matches!(
        world.posting.create_topic(op.id, again, t0 + Duration::minutes(1)).await,
        Err(DomainError::Forbidden(_))
    ));

    let t1 = t0 + Duration::minutes(1);
    let first = world.posting.post_response(op.id, topic.id, say("first", true), t1).await?;
    assert_eq!(first.level, 100);

    // too soon after the first post
    let err = assert_err!(
        world
            .posting
            .post_response(op.id, topic.id, say("second", true), t1 + Duration::seconds(2))
            .await
    );
    assert_eq!(err, DomainError::forbidden("consecutive posting not allowed"));
    assert_eq!(world.user(op.id).await?.res_wait.d1, 1);

    // a sage reply touches update but not age_update
    let t2 = t1 + Duration::minutes(1);
    let reply = ResDraft {
        reply: Some(first.id),
        ..say("sage", false)
    };
    world.posting.post_response(op.id, topic.id, reply, t2).await?;

    let stored = world.topics.find_one(topic.id).await?;
    assert_eq!(stored.update, t2);
    assert_eq!(stored.age_update, t1);
    assert_eq!(world.votes.reply_count(first.id).await?, 1);
    assert_eq!(world.responses.count_replies(first.id).await?, 1);
    Ok(())
}

#[tokio::test]
async fn reply_into_another_topic_is_invalid() -> anyhow::Result<()> {
    let world = World::new()?;
    let now = Utc::now();
    let user = world.register(10, now - Duration::days(3)).await?;

    let a = world
        .posting
        .create_topic(user.id, TopicDraft { title: "a".into(), kind: TopicKind::Normal }, now)
        .await?;
    let b = world
        .posting
        .create_topic(user.id, TopicDraft { title: "b".into(), kind: TopicKind::One }, now)
        .await?;
    let in_a = world.posting.post_response(user.id, a.id, say("x", true), now).await?;

    let cross = ResDraft {
        reply: Some(in_a.id),
        ..say("y", true)
    };
    let err = world
        .posting
        .post_response(user.id, b.id, cross, now + Duration::minutes(5))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
    Ok(())
}

#[tokio::test]
async fn closed_one_shot_topic_rejects_posts() -> anyhow::Result<()> {
    let world = World::new()?;
    let t0 = Utc::now();
    let user = world.register(10, t0 - Duration::days(3)).await?;
    let topic = world
        .posting
        .create_topic(user.id, TopicDraft { title: "one".into(), kind: TopicKind::One }, t0)
        .await?;

    let later = t0 + Duration::hours(25);
    let closed = world.maintenance.close_one_shot_topics(later).await?;
    assert_eq!(closed, vec![topic.id]);

    let err = world
        .posting
        .post_response(user.id, topic.id, say("late", true), later)
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::forbidden("topic already closed, cannot post"));
    // the rejected post was never persisted, counters included
    assert_eq!(world.user(user.id).await?.res_wait.d1, 0);
    Ok(())
}

#[tokio::test]
async fn editing_a_topic_spends_points() -> anyhow::Result<()> {
    let world = World::new()?;
    let now = Utc::now();
    let rich = world.register(15, now - Duration::days(3)).await?;
    let poor = world.register(5, now - Duration::days(3)).await?;
    let topic = world
        .posting
        .create_topic(rich.id, TopicDraft { title: "old".into(), kind: TopicKind::Normal }, now)
        .await?;

    assert!(matches!(
        world.posting.edit_topic(poor.id, topic.id, "hijack").await,
        Err(DomainError::Forbidden(_))
    ));

    let edited = world.posting.edit_topic(rich.id, topic.id, "new").await?;
    assert_eq!(edited.title, "new");
    assert_eq!(world.user(rich.id).await?.point, 10);
    Ok(())
}
