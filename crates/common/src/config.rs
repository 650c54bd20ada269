//! Application configuration.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Redis configuration.
    pub redis: RedisConfig,
    /// Telegram configuration.
    pub telegram: TelegramConfig,
    /// Worker configuration.
    #[serde(default)]
    pub worker: WorkerConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Redis configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL.
    pub url: String,
    /// Key prefix for all Redis keys.
    #[serde(default = "default_redis_prefix")]
    pub prefix: String,
}

/// Telegram configuration.
///
/// Two sessions share the publish work: the primary session posts media
/// bundles, the secondary session edits captions.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot token for the primary (bundle-sending) session.
    pub primary_token: String,
    /// Bot token for the secondary (caption-editing) session.
    pub secondary_token: String,
    /// Target channel chat id.
    pub channel_id: i64,
    /// Public URL of the companion bot, linked from every post.
    #[serde(default = "default_bot_url")]
    pub bot_url: String,
    /// Public URL of the channel, linked from every post.
    #[serde(default = "default_channel_url")]
    pub channel_url: String,
}

/// Worker configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerConfig {
    /// Broker poll interval when the queue is idle, in seconds.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// How long stored job results stay readable, in seconds.
    #[serde(default = "default_result_ttl_secs")]
    pub result_ttl_secs: u64,
    /// How long a submitter waits for a job result, in seconds.
    #[serde(default = "default_job_timeout_secs")]
    pub job_timeout_secs: u64,
    /// Delay between sending a media bundle and editing its caption,
    /// in milliseconds.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            result_ttl_secs: default_result_ttl_secs(),
            job_timeout_secs: default_job_timeout_secs(),
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

impl WorkerConfig {
    /// Broker poll interval as a [`Duration`].
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Result TTL as a [`Duration`].
    #[must_use]
    pub const fn result_ttl(&self) -> Duration {
        Duration::from_secs(self.result_ttl_secs)
    }

    /// Job wait timeout as a [`Duration`].
    #[must_use]
    pub const fn job_timeout(&self) -> Duration {
        Duration::from_secs(self.job_timeout_secs)
    }

    /// Post-bundle settle delay as a [`Duration`].
    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

fn default_redis_prefix() -> String {
    "nadecast".to_string()
}

fn default_bot_url() -> String {
    "https://t.me/cs2education_bot".to_string()
}

fn default_channel_url() -> String {
    "https://t.me/CS2_education".to_string()
}

const fn default_poll_interval_secs() -> u64 {
    3
}

const fn default_result_ttl_secs() -> u64 {
    30
}

const fn default_job_timeout_secs() -> u64 {
    30
}

const fn default_settle_delay_ms() -> u64 {
    1000
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `NADECAST_ENV`)
    /// 3. Environment variables with `NADECAST_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("NADECAST_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("NADECAST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("NADECAST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
