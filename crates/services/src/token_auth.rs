//! Challenge-response authentication over client tokens.
//!
//! A token carries one long-lived secret (`key`) and any number of
//! short-lived challenge requests. A request key only proves possession; the
//! session descriptor handed out is always built from the token's secret.

use chrono::{DateTime, Utc};
use domains::{AuthToken, Challenge, DomainError, KeyGenerator, Policy, Result, Token, TokenReq};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};
use uuid::Uuid;

/// Mints a token for `user` with a fresh secret.
pub fn create_token(id: Uuid, user: Uuid, now: DateTime<Utc>, keys: &dyn KeyGenerator) -> Token {
    Token {
        id,
        key: keys.generate(),
        user,
        req: Vec::new(),
        date: now,
    }
}

/// Drops dead requests and appends a new one. The new key never collides
/// with a surviving request or the token's own secret.
pub fn issue_request(
    token: &Token,
    now: DateTime<Utc>,
    policy: &Policy,
    keys: &dyn KeyGenerator,
) -> (Token, Challenge) {
    let mut next = token.clone();
    next.req.retain(|r| r.is_live(now));

    // collisions are negligible; each retry draws fresh randomness
    let key = loop {
        let candidate = keys.generate();
        if candidate != next.key && next.req.iter().all(|r| r.key != candidate) {
            break candidate;
        }
        warn!(token_id = %token.id, "request key collision, retrying");
    };

    next.req.push(TokenReq {
        key: key.clone(),
        expire_at: now + policy.token_request_expire,
        active: true,
    });
    debug!(token_id = %token.id, pending = next.req.len(), "token request issued");

    (next, Challenge { id: token.id, key })
}

/// Exchanges a live request key for a session descriptor.
pub fn authenticate_by_request(token: &Token, key: &str, now: DateTime<Utc>) -> Result<AuthToken> {
    let found = token
        .req
        .iter()
        .any(|r| r.is_live(now) && constant_time_eq(r.key.as_bytes(), key.as_bytes()));
    if !found {
        return Err(DomainError::not_found("token request not found"));
    }
    Ok(auth_token(token))
}

pub fn authenticate_by_key(token: &Token, presented: &str) -> Result<AuthToken> {
    if !constant_time_eq(token.key.as_bytes(), presented.as_bytes()) {
        warn!(token_id = %token.id, "token key mismatch");
        return Err(DomainError::unauthorized("token key mismatch"));
    }
    Ok(auth_token(token))
}

/// Replaces the secret and invalidates every pending request. Owner only.
pub fn rotate_key(token: &Token, acting_user: Uuid, keys: &dyn KeyGenerator) -> Result<Token> {
    if token.user != acting_user {
        return Err(DomainError::forbidden("only the owner can rotate this token"));
    }
    let key = loop {
        let candidate = keys.generate();
        if candidate != token.key {
            break candidate;
        }
    };
    debug!(token_id = %token.id, "token key rotated");
    Ok(Token {
        key,
        req: Vec::new(),
        ..token.clone()
    })
}

fn auth_token(token: &Token) -> AuthToken {
    AuthToken {
        id: token.id,
        key: token.key.clone(),
        user: token.user,
    }
}

/// Compares without short-circuiting on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use domains::MockKeyGenerator;

    /// Generator yielding "k1", "k2", ... in order.
    fn counting_keys() -> MockKeyGenerator {
        let mut keys = MockKeyGenerator::new();
        let mut n = 0;
        keys.expect_generate().returning(move || {
            n += 1;
            format!("k{n}")
        });
        keys
    }

    fn token(keys: &dyn KeyGenerator, now: DateTime<Utc>) -> Token {
        create_token(Uuid::now_v7(), Uuid::now_v7(), now, keys)
    }

    #[test]
    fn issued_request_authenticates_until_expiry() {
        let policy = Policy::default();
        let keys = counting_keys();
        let now = Utc::now();
        let tok = token(&keys, now);

        let (tok, challenge) = issue_request(&tok, now, &policy, &keys);
        assert_eq!(challenge.id, tok.id);

        let auth = authenticate_by_request(&tok, &challenge.key, now).unwrap();
        assert_eq!(auth.key, tok.key);
        assert_ne!(auth.key, challenge.key);
        assert_eq!(auth.user, tok.user);

        let expiry = now + policy.token_request_expire;
        assert!(authenticate_by_request(&tok, &challenge.key, expiry - Duration::seconds(1)).is_ok());
        assert_eq!(
            authenticate_by_request(&tok, &challenge.key, expiry).unwrap_err(),
            DomainError::not_found("token request not found")
        );
    }

    #[test]
    fn unknown_request_key_is_not_found() {
        let policy = Policy::default();
        let keys = counting_keys();
        let now = Utc::now();
        let (tok, _) = issue_request(&token(&keys, now), now, &policy, &keys);
        assert!(matches!(
            authenticate_by_request(&tok, "nope", now),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn issue_collects_dead_requests() {
        let policy = Policy::default();
        let keys = counting_keys();
        let now = Utc::now();
        let mut tok = token(&keys, now);
        tok.req = vec![
            TokenReq {
                key: "expired".into(),
                expire_at: now,
                active: true,
            },
            TokenReq {
                key: "inactive".into(),
                expire_at: now + Duration::minutes(1),
                active: false,
            },
            TokenReq {
                key: "live".into(),
                expire_at: now + Duration::minutes(1),
                active: true,
            },
        ];

        let (tok, challenge) = issue_request(&tok, now, &policy, &keys);
        let pending: Vec<&str> = tok.req.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(pending, vec!["live", challenge.key.as_str()]);
    }

    #[test]
    fn colliding_keys_are_redrawn() {
        let policy = Policy::default();
        let now = Utc::now();
        let tok = Token {
            id: Uuid::now_v7(),
            key: "secret".into(),
            user: Uuid::now_v7(),
            req: vec![TokenReq {
                key: "taken".into(),
                expire_at: now + Duration::minutes(1),
                active: true,
            }],
            date: now,
        };

        let mut keys = MockKeyGenerator::new();
        let mut script = vec!["fresh", "secret", "taken"];
        keys.expect_generate()
            .times(3)
            .returning(move || script.pop().unwrap_or_default().to_string());

        let (next, challenge) = issue_request(&tok, now, &policy, &keys);
        assert_eq!(challenge.key, "fresh");
        assert_eq!(next.req.len(), 2);
    }

    #[test]
    fn key_authentication() {
        let keys = counting_keys();
        let tok = token(&keys, Utc::now());

        let auth = authenticate_by_key(&tok, &tok.key).unwrap();
        assert_eq!(auth.id, tok.id);
        assert!(matches!(
            authenticate_by_key(&tok, "wrong"),
            Err(DomainError::Unauthorized(_))
        ));
        assert!(authenticate_by_key(&tok, "").is_err());
    }

    #[test]
    fn rotation_is_owner_only_and_clears_requests() {
        let policy = Policy::default();
        let keys = counting_keys();
        let now = Utc::now();
        let (tok, challenge) = issue_request(&token(&keys, now), now, &policy, &keys);

        assert!(matches!(
            rotate_key(&tok, Uuid::now_v7(), &keys),
            Err(DomainError::Forbidden(_))
        ));

        let rotated = rotate_key(&tok, tok.user, &keys).unwrap();
        assert_ne!(rotated.key, tok.key);
        assert!(rotated.req.is_empty());
        assert!(authenticate_by_request(&rotated, &challenge.key, now).is_err());
        assert!(authenticate_by_key(&rotated, &tok.key).is_err());
    }

    #[test]
    fn constant_time_eq_matches_plain_equality() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
        assert!(constant_time_eq(b"", b""));
    }
}
