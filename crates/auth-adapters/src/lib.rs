//! # auth-adapters
//!
//! HMAC-SHA256 implementation of `KeyGenerator`.
//! Secrets and challenge keys are 32 CSPRNG bytes keyed through a
//! server-side salt, so a leaked key reveals nothing about the generator
//! state and two deployments never share a key space.

use domains::KeyGenerator;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

#[derive(Error, Debug)]
pub enum KeyGenError {
    #[error("token salt must not be empty")]
    EmptySalt,

    #[error("invalid hmac key: {0}")]
    InvalidKey(String),
}

pub struct HmacKeyGenerator {
    /// MAC pre-keyed with the server salt; cloned per key.
    mac: HmacSha256,
}

impl HmacKeyGenerator {
    pub fn new(salt: &SecretString) -> Result<Self, KeyGenError> {
        let salt = salt.expose_secret();
        if salt.is_empty() {
            return Err(KeyGenError::EmptySalt);
        }
        let mac = HmacSha256::new_from_slice(salt.as_bytes())
            .map_err(|e| KeyGenError::InvalidKey(e.to_string()))?;
        debug!("hmac key generator ready");
        Ok(Self { mac })
    }
}

impl KeyGenerator for HmacKeyGenerator {
    /// 64 lowercase hex characters.
    fn generate(&self) -> String {
        let nonce: [u8; 32] = rand::random();
        let mut mac = self.mac.clone();
        mac.update(&nonce);
        hex::encode(mac.finalize().into_bytes())
    }
}
