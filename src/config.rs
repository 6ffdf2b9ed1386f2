use std::env;
use std::fmt::{self, Debug, Formatter};
use std::time::Duration;

use url::Url;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const DEFAULT_COLLECTION: &str = "viagens";
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_RECONCILE_INTERVAL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(2);
pub const DEFAULT_STARTUP_PROBE_DELAY: Duration = Duration::from_secs(1);

/// The static credential sent with every request to the remote collection. Wiped from memory when
/// dropped and redacted from debug output.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for ApiKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

#[derive(Clone, Debug)]
pub struct SyncConfig {
    pub base_url: Url,
    pub api_key: ApiKey,
    pub collection: String,

    /// How long a cached listing is served before a read goes back to the remote.
    pub cache_ttl: Duration,

    /// Period of the background replay of queued records while online.
    pub reconcile_interval: Duration,

    /// Settle time between a connectivity-restored notification and the replay it triggers.
    pub reconnect_delay: Duration,

    pub startup_probe_delay: Duration,
}

impl SyncConfig {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url)?;

        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue("TRIPLOG_BASE_URL", base_url.to_string()));
        }

        Ok(Self {
            base_url,
            api_key: ApiKey::new(api_key),
            collection: DEFAULT_COLLECTION.to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
            reconcile_interval: DEFAULT_RECONCILE_INTERVAL,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            startup_probe_delay: DEFAULT_STARTUP_PROBE_DELAY,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url =
            env::var("TRIPLOG_BASE_URL").map_err(|_| ConfigError::Missing("TRIPLOG_BASE_URL"))?;
        let api_key =
            env::var("TRIPLOG_API_KEY").map_err(|_| ConfigError::Missing("TRIPLOG_API_KEY"))?;

        let mut config = Self::new(&base_url, api_key)?;

        if let Ok(collection) = env::var("TRIPLOG_COLLECTION") {
            config = config.with_collection(collection);
        }

        if let Some(ttl) = duration_from_env("TRIPLOG_CACHE_TTL_SECS")? {
            config = config.with_cache_ttl(ttl);
        }

        if let Some(interval) = duration_from_env("TRIPLOG_RECONCILE_INTERVAL_SECS")? {
            config = config.with_reconcile_interval(interval);
        }

        Ok(config)
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_reconcile_interval(mut self, interval: Duration) -> Self {
        self.reconcile_interval = interval;
        self
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn with_startup_probe_delay(mut self, delay: Duration) -> Self {
        self.startup_probe_delay = delay;
        self
    }
}

fn duration_from_env(name: &'static str) -> Result<Option<Duration>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(None),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required setting {0} is not set")]
    Missing(&'static str),

    #[error("setting {0} has an invalid value: {1}")]
    InvalidValue(&'static str, String),

    #[error("provided URL wasn't valid: {0}")]
    BadUrl(#[from] url::ParseError),
}
