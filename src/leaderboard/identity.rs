//! Identity bootstrap
//!
//! The leaderboard is written with an identity that is resolved once at
//! startup and then injected into the client. A failed resolution leaves the
//! game without an identity; the client then stays uninitialized.

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::LeaderboardError;

/// Opaque caller identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// `region:guid`
    pub id: String,
    pub region: String,
}

/// Source of the startup identity
pub trait IdentityProvider: Send + Sync {
    fn resolve(&self) -> BoxFuture<'_, Result<Identity, LeaderboardError>>;
}

/// Unauthenticated guest identity with a generated id
#[derive(Debug, Clone)]
pub struct GuestIdentityProvider {
    region: String,
    seed: u64,
}

impl GuestIdentityProvider {
    pub fn new(region: impl Into<String>, seed: u64) -> Self {
        Self {
            region: region.into(),
            seed,
        }
    }
}

impl IdentityProvider for GuestIdentityProvider {
    fn resolve(&self) -> BoxFuture<'_, Result<Identity, LeaderboardError>> {
        async move {
            if self.region.is_empty() {
                return Err(LeaderboardError::Backend("no region configured".into()));
            }
            let mut rng = Pcg32::seed_from_u64(self.seed);
            let guid: Uuid = uuid::Builder::from_random_bytes(rng.random()).into_uuid();
            Ok(Identity {
                id: format!("{}:{}", self.region, guid),
                region: self.region.clone(),
            })
        }
        .boxed()
    }
}

/// Resolve the identity once; failure is logged and yields `None`
pub async fn bootstrap_identity(provider: &dyn IdentityProvider) -> Option<Identity> {
    match provider.resolve().await {
        Ok(identity) => {
            log::info!("Credentials initialized successfully ({})", identity.id);
            Some(identity)
        }
        Err(e) => {
            log::error!("Error initializing credentials: {}", e);
            None
        }
    }
}
