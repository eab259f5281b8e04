//! Leaderboard client
//!
//! A thin wrapper over a hosted score table: put one item per finished run,
//! scan the stored times back, sort them ascending. There is no caching,
//! retrying or offline queue. Every failure is logged and reported as an
//! error (submit) or an empty list (fetch) so gameplay never blocks on it.
//!
//! The table itself sits behind [`LeaderboardBackend`]:
//! - [`MemoryLeaderboard`] keeps items in process
//! - [`FileLeaderboard`] keeps items in a JSON file

pub mod file;
pub mod identity;
pub mod memory;

use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use file::FileLeaderboard;
pub use identity::{GuestIdentityProvider, Identity, IdentityProvider, bootstrap_identity};
pub use memory::MemoryLeaderboard;

use crate::settings::LeaderboardSettings;

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("leaderboard client not initialized")]
    NotInitialized,

    #[error("table '{0}' not found")]
    TableNotFound(String),

    #[error("leaderboard I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("leaderboard data is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("leaderboard backend error: {0}")]
    Backend(String),
}

/// One stored run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    #[serde(rename = "PlayerID")]
    pub player_id: String,
    /// Seconds
    #[serde(rename = "TimeScore")]
    pub time: f32,
    /// Unix seconds
    #[serde(rename = "Timestamp")]
    pub timestamp: i64,
}

impl LeaderboardEntry {
    /// Entry stamped with the current UTC time
    pub fn new(player_id: impl Into<String>, time: f32) -> Self {
        Self {
            player_id: player_id.into(),
            time,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// Table metadata reported by `describe`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub name: String,
    pub status: String,
    pub item_count: usize,
}

/// A hosted score table.
///
/// Methods return boxed futures so the client can hold `Arc<dyn ...>`.
pub trait LeaderboardBackend: Send + Sync {
    fn table_name(&self) -> &str;

    fn describe(&self) -> BoxFuture<'_, Result<TableInfo, LeaderboardError>>;

    fn put_item(&self, entry: LeaderboardEntry) -> BoxFuture<'_, Result<(), LeaderboardError>>;

    /// Every stored time, in storage order
    fn scan_times(&self) -> BoxFuture<'_, Result<Vec<f32>, LeaderboardError>>;
}

/// Score submission and top-N retrieval, guarded by an initialization flag
#[derive(Clone)]
pub struct LeaderboardClient {
    backend: Arc<dyn LeaderboardBackend>,
    identity: Option<Identity>,
    region: String,
    initialized: bool,
}

impl std::fmt::Debug for LeaderboardClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaderboardClient")
            .field("table", &self.backend.table_name())
            .field("identity", &self.identity)
            .field("region", &self.region)
            .field("initialized", &self.initialized)
            .finish()
    }
}

impl LeaderboardClient {
    /// Open the table with the bootstrapped identity.
    ///
    /// Without an identity the client stays uninitialized and every later
    /// call short-circuits. A failed connection test is only logged.
    pub async fn connect(
        backend: Arc<dyn LeaderboardBackend>,
        identity: Option<Identity>,
        settings: &LeaderboardSettings,
    ) -> Self {
        let initialized = identity.is_some();
        let client = Self {
            backend,
            identity,
            region: settings.region.clone(),
            initialized,
        };

        if !initialized {
            log::error!("Failed to initialize leaderboard client: no identity available");
            return client;
        }

        log::info!(
            "Leaderboard client initialized successfully in region {}",
            client.region
        );
        client.test_connection().await;
        client
    }

    async fn test_connection(&self) {
        let table = self.backend.table_name();
        log::info!(
            "Testing connection to table '{}' in region '{}'...",
            table,
            self.region
        );
        match self.backend.describe().await {
            Ok(info) => {
                log::info!("Successfully connected to table: {}", info.name);
                log::info!("Table status: {}", info.status);
                log::info!("Item count: {}", info.item_count);
            }
            Err(LeaderboardError::TableNotFound(name)) => {
                log::error!(
                    "Table '{}' not found in region '{}'. Please create the table first.",
                    name,
                    self.region
                );
            }
            Err(e) => log::error!("Failed to connect to leaderboard: {}", e),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Store one run
    pub async fn submit(&self, player_id: &str, time: f32) -> Result<(), LeaderboardError> {
        if !self.initialized {
            log::error!("Leaderboard client not initialized!");
            return Err(LeaderboardError::NotInitialized);
        }

        let entry = LeaderboardEntry::new(player_id, time);
        match self.backend.put_item(entry).await {
            Ok(()) => {
                log::info!("Successfully saved score: {} ({})", time, player_id);
                Ok(())
            }
            Err(e) => {
                log::error!("Error saving score: {}", e);
                Err(e)
            }
        }
    }

    /// Fastest `n` times, ascending. Empty on any failure.
    pub async fn fetch_top(&self, n: usize) -> Vec<f32> {
        if !self.initialized {
            log::error!("Leaderboard client not initialized!");
            return Vec::new();
        }

        log::debug!("Attempting to fetch top scores...");
        match self.backend.scan_times().await {
            Ok(mut times) => {
                times.retain(|t| t.is_finite());
                times.sort_by(f32::total_cmp);
                times.truncate(n);
                log::info!("Retrieved {} scores", times.len());
                times
            }
            Err(e) => {
                log::error!("Error getting leaderboard: {}", e);
                Vec::new()
            }
        }
    }
}
