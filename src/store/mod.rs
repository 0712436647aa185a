pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use crate::entities::heat_cycle;
use crate::fertility::FertilityPrediction;
use crate::state::DogProfile;

pub use postgres::PostgresStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Durable mirror for profiles and heat-cycle history.
///
/// Callers never ask whether the mirror is enabled; the no-op
/// implementation simply stores nothing and reads back nothing. Writes are
/// best-effort from the caller's point of view: a failed mirror write is
/// logged and must never fail the request.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Merge-upsert the profile document keyed by dog name.
    async fn save_profile(&self, profile: &DogProfile) -> Result<(), StoreError>;

    /// Append one immutable heat-cycle event.
    async fn append_cycle(&self, prediction: &FertilityPrediction) -> Result<(), StoreError>;

    async fn fetch_profile(&self, name: &str) -> Result<Option<DogProfile>, StoreError>;

    async fn list_profiles(&self) -> Result<Vec<DogProfile>, StoreError>;

    /// Heat-cycle events for one dog, newest first, at most `limit`.
    async fn query_cycles(
        &self,
        name: &str,
        limit: u64,
    ) -> Result<Vec<heat_cycle::Model>, StoreError>;
}

/// Mirror used when no `DATABASE_URL` is configured.
pub struct NullStore;

#[async_trait]
impl ProfileStore for NullStore {
    async fn save_profile(&self, _profile: &DogProfile) -> Result<(), StoreError> {
        Ok(())
    }

    async fn append_cycle(&self, _prediction: &FertilityPrediction) -> Result<(), StoreError> {
        Ok(())
    }

    async fn fetch_profile(&self, _name: &str) -> Result<Option<DogProfile>, StoreError> {
        Ok(None)
    }

    async fn list_profiles(&self) -> Result<Vec<DogProfile>, StoreError> {
        Ok(Vec::new())
    }

    async fn query_cycles(
        &self,
        _name: &str,
        _limit: u64,
    ) -> Result<Vec<heat_cycle::Model>, StoreError> {
        Ok(Vec::new())
    }
}

/// Select the mirror implementation from configuration. Connection or
/// migration failures degrade to the no-op store rather than aborting
/// startup; the service stays available on local state alone.
pub async fn connect(database_url: Option<&str>) -> Arc<dyn ProfileStore> {
    let Some(url) = database_url else {
        tracing::info!("No DATABASE_URL configured, profile mirror disabled");
        return Arc::new(NullStore);
    };

    match PostgresStore::connect(url).await {
        Ok(store) => {
            tracing::info!("Profile mirror connected");
            Arc::new(store)
        }
        Err(e) => {
            tracing::warn!("Profile mirror unavailable, using local state only: {}", e);
            Arc::new(NullStore)
        }
    }
}
