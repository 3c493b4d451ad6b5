//! Filesystem loading of the tournament exports.
//!
//! A dataset is the three JSON documents in the data directory:
//! - match results (array of rounds)
//! - decklists (mapping of player decklists)
//! - precomputed analysis
//!
//! The raw bytes are fingerprinted so unchanged data can be detected on reload.

mod export;

pub use export::*;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use crate::config::{AppConfig, FilesConfig};
use crate::models::{AnalysisData, Decklist, Fingerprint, MatchResult};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub files: FilesConfig,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf, files: FilesConfig) -> Self {
        Self { data_dir, files }
    }

    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(config.data_dir.clone(), config.files.clone())
    }

    pub fn export_path(&self, kind: ExportKind) -> PathBuf {
        self.data_dir.join(kind.filename(&self.files))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"), FilesConfig::default())
    }
}

/// The three exports as loaded from disk.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub results: Vec<MatchResult>,
    pub decklists: Vec<Decklist>,
    pub analysis: AnalysisData,
    pub fingerprint: Fingerprint,
    pub loaded_at: DateTime<Utc>,
}

impl Dataset {
    /// Build an in-memory dataset, fingerprinting the serialized parts.
    pub fn from_parts(
        results: Vec<MatchResult>,
        decklists: Vec<Decklist>,
        analysis: AnalysisData,
    ) -> Self {
        let parts = [
            serde_json::to_vec(&results).unwrap_or_default(),
            serde_json::to_vec(&decklists).unwrap_or_default(),
            serde_json::to_vec(&analysis).unwrap_or_default(),
        ];
        let fingerprint = Fingerprint::of_documents(&[
            parts[0].as_slice(),
            parts[1].as_slice(),
            parts[2].as_slice(),
        ]);
        Self {
            results,
            decklists,
            analysis,
            fingerprint,
            loaded_at: Utc::now(),
        }
    }
}

/// Fingerprint of the exports currently on disk, without parsing them.
pub fn read_fingerprint(config: &StorageConfig) -> Result<Fingerprint, StorageError> {
    let mut documents = Vec::with_capacity(ExportKind::ALL.len());
    for kind in ExportKind::ALL {
        documents.push(ExportReader::<serde_json::Value>::for_export(config, kind).read_bytes()?);
    }
    let parts: Vec<&[u8]> = documents.iter().map(Vec::as_slice).collect();
    Ok(Fingerprint::of_documents(&parts))
}

/// Read and parse all three exports.
pub fn load_dataset(config: &StorageConfig) -> Result<Dataset, StorageError> {
    let results_reader = ExportReader::<Vec<MatchResult>>::for_export(config, ExportKind::Results);
    let decklists_reader =
        ExportReader::<DecklistDocument>::for_export(config, ExportKind::Decklists);
    let analysis_reader = ExportReader::<AnalysisData>::for_export(config, ExportKind::Analysis);

    let results_bytes = results_reader.read_bytes()?;
    let decklists_bytes = decklists_reader.read_bytes()?;
    let analysis_bytes = analysis_reader.read_bytes()?;

    let fingerprint = Fingerprint::of_documents(&[
        results_bytes.as_slice(),
        decklists_bytes.as_slice(),
        analysis_bytes.as_slice(),
    ]);

    let results = results_reader.parse(&results_bytes)?;
    let decklists = decklists_reader.parse(&decklists_bytes)?.into_decklists();
    let analysis = analysis_reader.parse(&analysis_bytes)?;

    info!(
        "Loaded dataset {} from {:?}: {} results, {} decklists, {} archetypes",
        fingerprint,
        config.data_dir,
        results.len(),
        decklists.len(),
        analysis.archetype_counts.len()
    );

    Ok(Dataset {
        results,
        decklists,
        analysis,
        fingerprint,
        loaded_at: Utc::now(),
    })
}
