//! Votes on responses and the deletion state they drive.
//!
//! Every function takes the response, the acting user and the response
//! author as snapshots and returns new snapshots; the voter never changes.

use domains::{DeleteFlag, DomainError, Notification, Policy, Res, Result, User, Vote};
use tracing::{debug, info};

use crate::reputation::change_lv;

const VOTE_DELETE_NOTICE: &str = "Your response was deleted because of downvotes.";

/// Result of a vote transition.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteOutcome {
    pub res: Res,
    pub author: User,
    /// Present when this vote pushed the response over its deletion threshold.
    pub notification: Option<Notification>,
}

fn ensure_author(res: &Res, author: &User) -> Result<()> {
    if res.author != author.id {
        return Err(DomainError::validation("author does not match response"));
    }
    Ok(())
}

fn ensure_votable(res: &Res, voter: &User) -> Result<()> {
    if voter.id == res.author {
        return Err(DomainError::forbidden("cannot vote for your own response"));
    }
    if res.vote_of(voter.id).is_some() {
        return Err(DomainError::forbidden("already voted"));
    }
    Ok(())
}

/// Level change a vote from `voter` applies to the author (before sign).
fn vote_weight(voter: &User) -> i64 {
    voter.level.div_euclid(100) + 1
}

pub fn upvote(res: &Res, voter: &User, author: &User, policy: &Policy) -> Result<VoteOutcome> {
    ensure_author(res, author)?;
    ensure_votable(res, voter)?;

    let delta = vote_weight(voter);
    let mut next = res.clone();
    next.vote.push(Vote {
        user: voter.id,
        value: voter.level,
        delta,
    });

    debug!(res_id = %res.id, voter_id = %voter.id, delta, "upvote");
    Ok(VoteOutcome {
        res: next,
        author: change_lv(author, author.level + delta, policy),
        notification: None,
    })
}

pub fn downvote(res: &Res, voter: &User, author: &User, policy: &Policy) -> Result<VoteOutcome> {
    ensure_author(res, author)?;
    ensure_votable(res, voter)?;

    let delta = -vote_weight(voter);
    // the weight toward deletion is capped separately from the level change
    let value = -voter.level.min((res.level + 2).div_euclid(3));

    let mut next = res.clone();
    next.vote.push(Vote {
        user: voter.id,
        value,
        delta,
    });

    let crossed = next.vote_sum() < -next.level;
    let notification = if crossed
        && matches!(next.delete_flag, DeleteFlag::Active | DeleteFlag::SelfDeleted)
    {
        next.delete_flag = DeleteFlag::Vote;
        info!(res_id = %res.id, author_id = %res.author, "response deleted by votes");
        Some(Notification {
            receiver: res.author,
            res: res.id,
            text: VOTE_DELETE_NOTICE.to_string(),
        })
    } else {
        None
    };

    debug!(res_id = %res.id, voter_id = %voter.id, value, delta, "downvote");
    Ok(VoteOutcome {
        res: next,
        author: change_lv(author, author.level + delta, policy),
        notification,
    })
}

/// Withdraws `voter`'s vote, reversing the level change recorded with it.
/// The deletion flag is not restored.
pub fn cancel_vote(res: &Res, voter: &User, author: &User, policy: &Policy) -> Result<VoteOutcome> {
    ensure_author(res, author)?;
    let Some(vote) = res.vote_of(voter.id) else {
        return Err(DomainError::forbidden("no vote to cancel"));
    };

    let delta = vote.delta;
    let mut next = res.clone();
    next.vote.retain(|v| v.user != voter.id);

    debug!(res_id = %res.id, voter_id = %voter.id, reversed = delta, "vote cancelled");
    Ok(VoteOutcome {
        res: next,
        author: change_lv(author, author.level - delta, policy),
        notification: None,
    })
}

/// Deletion by the author; costs the author one level.
pub fn self_delete(res: &Res, acting: &User, policy: &Policy) -> Result<(Res, User)> {
    if acting.id != res.author {
        return Err(DomainError::forbidden("only the author can delete this response"));
    }
    if res.delete_flag != DeleteFlag::Active {
        return Err(DomainError::conflict("response already deleted"));
    }

    let mut next = res.clone();
    next.delete_flag = DeleteFlag::SelfDeleted;
    Ok((next, change_lv(acting, acting.level - 1, policy)))
}
