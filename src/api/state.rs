use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::calculate::{RoundClassifier, Snapshot};
use crate::models::Fingerprint;
use crate::storage::{load_dataset, read_fingerprint, StorageConfig, StorageError};

/// Shared state for the API handlers.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<StorageConfig>,
    pub classifier: RoundClassifier,
    pub snapshot: Arc<RwLock<Snapshot>>,
    pub cors_origin: String,
}

/// What a reload did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReloadStatus {
    Reloaded,
    Unchanged,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReloadOutcome {
    pub status: ReloadStatus,
    pub fingerprint: Fingerprint,
}

impl AppState {
    pub fn new(
        storage: StorageConfig,
        classifier: RoundClassifier,
        snapshot: Snapshot,
        cors_origin: impl Into<String>,
    ) -> Self {
        Self {
            storage: Arc::new(storage),
            classifier,
            snapshot: Arc::new(RwLock::new(snapshot)),
            cors_origin: cors_origin.into(),
        }
    }

    /// Load the exports and build the initial snapshot.
    pub fn load(
        storage: StorageConfig,
        classifier: RoundClassifier,
        cors_origin: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let dataset = load_dataset(&storage)?;
        let snapshot = Snapshot::build(dataset, classifier.clone());
        Ok(Self::new(storage, classifier, snapshot, cors_origin))
    }

    /// Re-read the exports. The snapshot is only rebuilt when the raw
    /// documents changed; a failed load leaves the current snapshot in place.
    pub async fn reload(&self) -> Result<ReloadOutcome, StorageError> {
        let fingerprint = read_fingerprint(&self.storage)?;
        {
            let current = self.snapshot.read().await;
            if current.fingerprint() == &fingerprint {
                info!("Dataset {} unchanged, skipping reload", fingerprint);
                return Ok(ReloadOutcome {
                    status: ReloadStatus::Unchanged,
                    fingerprint,
                });
            }
        }

        let dataset = load_dataset(&self.storage)?;
        let snapshot = Snapshot::build(dataset, self.classifier.clone());
        let fingerprint = snapshot.fingerprint().clone();

        *self.snapshot.write().await = snapshot;
        info!("Reloaded dataset {}", fingerprint);

        Ok(ReloadOutcome {
            status: ReloadStatus::Reloaded,
            fingerprint,
        })
    }
}
