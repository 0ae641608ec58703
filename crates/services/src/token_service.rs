//! Token issue, challenge and rotation through the repository port.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use domains::{
    AuthToken, Challenge, IdGenerator, KeyGenerator, Policy, Result, Token, TokenRepository,
};
use tracing::info;
use uuid::Uuid;

use crate::token_auth;

pub struct TokenService {
    pub tokens: Arc<dyn TokenRepository>,
    pub keys: Arc<dyn KeyGenerator>,
    pub ids: Arc<dyn IdGenerator>,
    pub policy: Arc<Policy>,
}

impl TokenService {
    pub async fn create(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<Token> {
        let token = token_auth::create_token(self.ids.next_id(), user_id, now, self.keys.as_ref());
        self.tokens.insert(token.clone()).await?;
        info!(token_id = %token.id, user_id = %user_id, "token created");
        Ok(token)
    }

    pub async fn issue_request(&self, token_id: Uuid, now: DateTime<Utc>) -> Result<Challenge> {
        let token = self.tokens.find_one(token_id).await?;
        let (token, challenge) =
            token_auth::issue_request(&token, now, &self.policy, self.keys.as_ref());
        self.tokens.update(token).await?;
        Ok(challenge)
    }

    pub async fn authenticate_by_request(
        &self,
        token_id: Uuid,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthToken> {
        let token = self.tokens.find_one(token_id).await?;
        token_auth::authenticate_by_request(&token, key, now)
    }

    pub async fn authenticate_by_key(&self, token_id: Uuid, key: &str) -> Result<AuthToken> {
        let token = self.tokens.find_one(token_id).await?;
        token_auth::authenticate_by_key(&token, key)
    }

    pub async fn rotate_key(&self, token_id: Uuid, acting_user: Uuid) -> Result<Token> {
        let token = self.tokens.find_one(token_id).await?;
        let token = token_auth::rotate_key(&token, acting_user, self.keys.as_ref())?;
        self.tokens.update(token.clone()).await?;
        info!(token_id = %token.id, "token key rotated");
        Ok(token)
    }
}
