//! # configs
//!
//! Layered settings: `.env` (via dotenvy) → optional `config/bbs.toml` →
//! `BBS__SECTION__KEY` environment variables.
//!
//! ```text
//! BBS__TOKEN__SALT=change-me
//! BBS__RULES__LEVEL_MAX=1000
//! BBS__LOG__JSON=true
//! ```

pub mod telemetry;

use chrono::Duration;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use domains::{Policy, ResWaitLimits};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "config/bbs";
pub const ENV_PREFIX: &str = "BBS";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to install tracing subscriber: {0}")]
    Telemetry(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log: LogSettings,
    pub rules: RuleSettings,
    pub token: TokenSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuleSettings {
    pub level_max: i64,
    pub max_lv_coefficient: f64,
    pub min_post_interval_secs: i64,
    pub m10_limit: u32,
    pub m30_limit: u32,
    pub h1_limit: u32,
    pub h6_limit: u32,
    pub h12_limit: u32,
    pub d1_limit: u32,
    pub topic_edit_point_cost: i64,
    pub one_shot_close_after_hours: i64,
    pub topic_create_cooldown_mins: i64,
    pub one_shot_create_cooldown_hours: i64,
}

impl Default for RuleSettings {
    fn default() -> Self {
        let policy = Policy::default();
        let wait = &policy.res_wait;
        Self {
            level_max: policy.level_max,
            max_lv_coefficient: wait.max_lv_coefficient,
            min_post_interval_secs: wait.min_interval.num_seconds(),
            m10_limit: wait.m10,
            m30_limit: wait.m30,
            h1_limit: wait.h1,
            h6_limit: wait.h6,
            h12_limit: wait.h12,
            d1_limit: wait.d1,
            topic_edit_point_cost: policy.topic_edit_point_cost,
            one_shot_close_after_hours: policy.one_shot_close_after.num_hours(),
            topic_create_cooldown_mins: policy.topic_create_cooldown.num_minutes(),
            one_shot_create_cooldown_hours: policy.one_shot_create_cooldown.num_hours(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TokenSettings {
    /// Server-side salt mixed into every generated key. Required.
    #[serde(deserialize_with = "secret_string")]
    pub salt: SecretString,
    pub request_expire_minutes: i64,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            salt: SecretString::from(String::new()),
            request_expire_minutes: Policy::default().token_request_expire.num_minutes(),
        }
    }
}

fn secret_string<'de, D: Deserializer<'de>>(d: D) -> Result<SecretString, D::Error> {
    String::deserialize(d).map(SecretString::from)
}

impl Settings {
    /// Loads settings from the process environment and the default file.
    pub fn load() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();
        let settings = Self::build(
            Config::builder()
                .add_source(File::with_name(DEFAULT_CONFIG_PATH).required(false))
                .add_source(
                    Environment::with_prefix(ENV_PREFIX)
                        .separator("__")
                        .try_parsing(true),
                ),
        )?;
        info!(level_max = settings.rules.level_max, "configuration loaded");
        Ok(settings)
    }

    /// Settings from a TOML document only; no environment lookup.
    pub fn from_toml(toml: &str) -> Result<Self, SettingsError> {
        Self::build(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, SettingsError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        let r = &self.rules;
        if r.level_max < 1 {
            return Err(SettingsError::Invalid("rules.level_max must be at least 1".into()));
        }
        if r.max_lv_coefficient < 1.0 {
            return Err(SettingsError::Invalid(
                "rules.max_lv_coefficient must be at least 1".into(),
            ));
        }
        let non_negative = [
            ("rules.min_post_interval_secs", r.min_post_interval_secs),
            ("rules.topic_edit_point_cost", r.topic_edit_point_cost),
            ("rules.one_shot_close_after_hours", r.one_shot_close_after_hours),
            ("rules.topic_create_cooldown_mins", r.topic_create_cooldown_mins),
            ("rules.one_shot_create_cooldown_hours", r.one_shot_create_cooldown_hours),
        ];
        if let Some((name, _)) = non_negative.iter().find(|(_, v)| *v < 0) {
            return Err(SettingsError::Invalid(format!("{name} must not be negative")));
        }
        if self.token.request_expire_minutes <= 0 {
            return Err(SettingsError::Invalid(
                "token.request_expire_minutes must be positive".into(),
            ));
        }
        if self.token.salt.expose_secret().is_empty() {
            return Err(SettingsError::Invalid("token.salt is required".into()));
        }
        Ok(())
    }

    /// The domain rules these settings describe.
    pub fn policy(&self) -> Policy {
        let r = &self.rules;
        Policy {
            level_max: r.level_max,
            res_wait: ResWaitLimits {
                max_lv_coefficient: r.max_lv_coefficient,
                min_interval: Duration::seconds(r.min_post_interval_secs),
                m10: r.m10_limit,
                m30: r.m30_limit,
                h1: r.h1_limit,
                h6: r.h6_limit,
                h12: r.h12_limit,
                d1: r.d1_limit,
            },
            token_request_expire: Duration::minutes(self.token.request_expire_minutes),
            topic_edit_point_cost: r.topic_edit_point_cost,
            one_shot_close_after: Duration::hours(r.one_shot_close_after_hours),
            topic_create_cooldown: Duration::minutes(r.topic_create_cooldown_mins),
            one_shot_create_cooldown: Duration::hours(r.one_shot_create_cooldown_hours),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reproduce_default_policy() {
        let settings = Settings::from_toml(
            r#"
            [token]
            salt = "pepper"
            "#,
        )
        .unwrap();
        assert_eq!(settings.policy(), Policy::default());
        assert_eq!(settings.log.level, "info");
        assert_eq!(settings.token.salt.expose_secret(), "pepper");
    }

    #[test]
    fn overrides_flow_into_policy() {
        let settings = Settings::from_toml(
            r#"
            [rules]
            level_max = 999
            m10_limit = 3
            min_post_interval_secs = 30

            [token]
            salt = "pepper"
            request_expire_minutes = 15
            "#,
        )
        .unwrap();
        let policy = settings.policy();
        assert_eq!(policy.level_max, 999);
        assert_eq!(policy.res_wait.m10, 3);
        assert_eq!(policy.res_wait.m30, ResWaitLimits::default().m30);
        assert_eq!(policy.res_wait.min_interval, Duration::seconds(30));
        assert_eq!(policy.token_request_expire, Duration::minutes(15));
    }

    #[test]
    fn missing_salt_is_rejected() {
        let err = Settings::from_toml("").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(msg) if msg.contains("salt")));
    }

    #[test]
    fn nonsense_rules_are_rejected() {
        let err = Settings::from_toml(
            r#"
            [rules]
            level_max = 0
            [token]
            salt = "pepper"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));

        let err = Settings::from_toml(
            r#"
            [rules]
            topic_create_cooldown_mins = -1
            [token]
            salt = "pepper"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(msg) if msg.contains("cooldown")));
    }
}
