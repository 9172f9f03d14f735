use tracing::{debug, instrument};

use crate::api::{hypixel, mojang};
use crate::config::ApiConfig;
use crate::error::Result;
use crate::model::{RawPlayer, StatsRecord};

/// The main entry point for player statistics.
///
/// `StatsClient` wraps a [`reqwest::Client`] and resolves usernames through
/// the Mojang API before reading Mini Walls stats from the Hypixel API. The
/// two calls of a lookup always run one after the other.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> miniwalls_bot::Result<()> {
/// use miniwalls_bot::{config::ApiConfig, StatsClient};
///
/// let config = ApiConfig {
///     api_key: "your-key".to_string(),
///     ..ApiConfig::default()
/// };
/// let client = StatsClient::new(config).expect("http client");
/// if let Some(stats) = client.get_player_stats("Notch").await? {
///     println!("{} has a K/D of {}", stats.display_name(), stats.kd_ratio());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StatsClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl StatsClient {
    /// Create a client with the configured timeout and user agent.
    pub fn new(config: ApiConfig) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { http, config })
    }

    /// Create a client using the provided [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: ApiConfig) -> Self {
        Self {
            http: client,
            config,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Resolve a username to its UUID. `None` when no such account exists.
    #[instrument(skip(self))]
    pub async fn resolve_identifier(&self, username: &str) -> Result<Option<String>> {
        mojang::resolve_identifier(&self.http, &self.config.mojang_base_url, username).await
    }

    /// Fetch the raw player object for a UUID. `None` when the player has no record.
    #[instrument(skip(self))]
    pub async fn fetch_stats(&self, uuid: &str) -> Result<Option<RawPlayer>> {
        hypixel::fetch_stats(
            &self.http,
            &self.config.hypixel_base_url,
            &self.config.api_key,
            uuid,
        )
        .await
    }

    /// Look up `username` and build its [`StatsRecord`].
    ///
    /// Returns `Ok(None)` when the username does not resolve or the stats
    /// service has no record; every other failure is an error.
    #[instrument(skip(self))]
    pub async fn get_player_stats(&self, username: &str) -> Result<Option<StatsRecord>> {
        let Some(uuid) = self.resolve_identifier(username).await? else {
            debug!("username did not resolve");
            return Ok(None);
        };
        let Some(player) = self.fetch_stats(&uuid).await? else {
            debug!(%uuid, "no stats record");
            return Ok(None);
        };
        hypixel::parse_player(&uuid, player).map(Some)
    }

    /// Current player count of the configured game mode.
    #[instrument(skip(self))]
    pub async fn get_live_player_count(&self) -> Result<u64> {
        self.get_live_player_count_for(&self.config.game_mode_key)
            .await
    }

    /// Current player count of `mode_key`; 0 when the key is absent.
    #[instrument(skip(self))]
    pub async fn get_live_player_count_for(&self, mode_key: &str) -> Result<u64> {
        hypixel::get_live_player_count(
            &self.http,
            &self.config.hypixel_base_url,
            &self.config.api_key,
            mode_key,
        )
        .await
    }
}
