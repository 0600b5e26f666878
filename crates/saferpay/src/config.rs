//! Client configuration.
//!
//! A [`Config`] is normally built once and handed to
//! [`SaferpayClient::with_config`](crate::SaferpayClient::with_config). For
//! hosts that prefer a process-wide default, [`configure`], [`reset`] and
//! [`current`] manage a shared instance that
//! [`SaferpayClient::new`](crate::SaferpayClient::new) starts from. The
//! shared instance is meant to be set once at startup; changing it while
//! clients are being built races with their construction.

use std::env;
use std::sync::{LazyLock, PoisonError, RwLock};

use url::Url;

use crate::constants::{DEFAULT_ENDPOINT, DEFAULT_USER_AGENT, TEST_ACCOUNT_ID};

static GLOBAL: LazyLock<RwLock<Config>> = LazyLock::new(|| RwLock::new(Config::default()));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Gateway base URL, e.g. `https://www.saferpay.com/hosting`
    pub endpoint: Url,
    pub user_agent: String,
    /// Merchant account (`ACCOUNTID`)
    pub account_id: String,
    /// Default `SUCCESSLINK` for payment URLs
    pub success_link: Option<String>,
    /// Default `FAILLINK` for payment URLs
    pub fail_link: Option<String>,
    /// Default `BACKLINK` for payment URLs
    pub back_link: Option<String>,
    /// Default `NOTIFYURL` for payment URLs
    pub notify_url: Option<String>,
}

impl Default for Config {
    /// Built-in values: production hosting endpoint and the public test account.
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            account_id: TEST_ACCOUNT_ID.to_string(),
            success_link: None,
            fail_link: None,
            back_link: None,
            notify_url: None,
        }
    }
}

impl Config {
    /// Load configuration from `SAFERPAY_*` environment variables, falling
    /// back to the built-in defaults for anything unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(endpoint) = env_var("SAFERPAY_ENDPOINT") {
            config.endpoint =
                Url::parse(&endpoint).map_err(|_| ConfigError::InvalidUrl(endpoint.clone()))?;
        }
        if let Some(user_agent) = env_var("SAFERPAY_USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Some(account_id) = env_var("SAFERPAY_ACCOUNT_ID") {
            config.account_id = account_id;
        }
        config.success_link = env_var("SAFERPAY_SUCCESS_LINK");
        config.fail_link = env_var("SAFERPAY_FAIL_LINK");
        config.back_link = env_var("SAFERPAY_BACK_LINK");
        config.notify_url = env_var("SAFERPAY_NOTIFY_URL");

        if config.account_id == TEST_ACCOUNT_ID {
            tracing::warn!("SAFERPAY_ACCOUNT_ID not set, using the Saferpay test account");
        }

        Ok(config)
    }

    /// Apply per-instance overrides. Only `Some` values replace the current
    /// ones. An `endpoint` override is accepted but has no effect: the base
    /// URL a client talks to is the one its transport was built with.
    pub fn merged(mut self, options: ClientOptions) -> Self {
        if let Some(endpoint) = options.endpoint {
            tracing::warn!(
                requested = %endpoint,
                endpoint = %self.endpoint,
                "endpoint override ignored, build the client with_config to change the base URL"
            );
        }
        if let Some(user_agent) = options.user_agent {
            self.user_agent = user_agent;
        }
        if let Some(account_id) = options.account_id {
            self.account_id = account_id;
        }
        if options.success_link.is_some() {
            self.success_link = options.success_link;
        }
        if options.fail_link.is_some() {
            self.fail_link = options.fail_link;
        }
        if options.back_link.is_some() {
            self.back_link = options.back_link;
        }
        if options.notify_url.is_some() {
            self.notify_url = options.notify_url;
        }
        self
    }
}

/// Per-client overrides on top of the process-wide configuration.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub endpoint: Option<Url>,
    pub user_agent: Option<String>,
    pub account_id: Option<String>,
    pub success_link: Option<String>,
    pub fail_link: Option<String>,
    pub back_link: Option<String>,
    pub notify_url: Option<String>,
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn success_link(mut self, link: impl Into<String>) -> Self {
        self.success_link = Some(link.into());
        self
    }

    pub fn fail_link(mut self, link: impl Into<String>) -> Self {
        self.fail_link = Some(link.into());
        self
    }

    pub fn back_link(mut self, link: impl Into<String>) -> Self {
        self.back_link = Some(link.into());
        self
    }

    pub fn notify_url(mut self, url: impl Into<String>) -> Self {
        self.notify_url = Some(url.into());
        self
    }
}

/// Built-in defaults, independent of the process-wide configuration.
pub fn defaults() -> Config {
    Config::default()
}

/// Snapshot of the process-wide configuration.
pub fn current() -> Config {
    GLOBAL
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Mutate the process-wide configuration. Clients built afterwards see
/// the change; existing clients keep their snapshot.
pub fn configure<F>(mutate: F)
where
    F: FnOnce(&mut Config),
{
    let mut guard = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    mutate(&mut *guard);
}

/// Restore the process-wide configuration to the built-in defaults.
pub fn reset() {
    configure(|config| *config = Config::default());
}

fn env_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}
