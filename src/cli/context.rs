//! Command execution context
//!
//! Loads configuration, builds the API client and the session's query cache
//! once so command handlers only deal with their own logic.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};

use crate::cache::{CacheStorage, QueryClient};
use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::client::{ClientConfig, PolarClient};
use crate::config::Config;
use crate::error::{ConfigError, Error, Result};

/// Context for command execution containing config, client, and runtime options.
pub struct CommandContext {
    /// Loaded configuration, with environment overrides applied
    pub config: Config,
    /// API client (Arc-wrapped so cached reads can own a handle)
    pub client: Arc<PolarClient>,
    /// Session-wide query cache
    pub queries: QueryClient,
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a context that may run anonymously.
    ///
    /// A missing config file is not an error here: public pages and menus
    /// work without a token.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = match Config::load_at(opts.config_ref()) {
            Ok(config) => config,
            Err(Error::Config(ConfigError::NotFound)) => {
                debug!("No config file, running anonymously");
                Config::default()
            }
            Err(e) => return Err(e),
        }
        .with_env_overrides();

        Self::from_config(config, opts)
    }

    /// Create a context for commands that require an access token.
    pub fn authenticated(opts: &GlobalOptions) -> Result<Self> {
        let ctx = Self::new(opts)?;
        ctx.config.validate_auth()?;
        Ok(ctx)
    }

    fn from_config(config: Config, opts: &GlobalOptions) -> Result<Self> {
        let client = Arc::new(PolarClient::new(&ClientConfig::from(&config))?);
        let stale_time = Duration::from_secs(config.preferences.stale_secs);
        let queries = build_query_client(stale_time, opts.no_cache).refreshing(opts.refresh);
        debug!(
            "Query cache ready (stale after {:?}, persistent: {}, refresh: {})",
            stale_time,
            queries.is_persistent(),
            opts.refresh
        );

        Ok(Self {
            config,
            client,
            queries,
            format: opts.format,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.is_authenticated()
    }
}

/// In-memory cache, backed by the on-disk tier unless disabled.
///
/// An unusable cache directory only costs the persistent tier.
fn build_query_client(stale_time: Duration, no_cache: bool) -> QueryClient {
    if no_cache {
        debug!("Persistent cache disabled");
        return QueryClient::new(stale_time);
    }

    match CacheStorage::open() {
        Ok(storage) => QueryClient::persistent(stale_time, storage),
        Err(e) => {
            warn!("Cache unavailable, continuing in memory: {}", e);
            QueryClient::new(stale_time)
        }
    }
}
