//! Readers for the three JSON exports.
//!
//! Each export is a single JSON document. Raw bytes are kept available so the
//! loader can fingerprint exactly what was parsed.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::{StorageConfig, StorageError};
use crate::config::FilesConfig;
use crate::models::Decklist;

/// The exports making up a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Results,
    Decklists,
    Analysis,
}

impl ExportKind {
    pub const ALL: [ExportKind; 3] = [
        ExportKind::Results,
        ExportKind::Decklists,
        ExportKind::Analysis,
    ];

    /// File name of this export, as configured.
    pub fn filename<'a>(&self, files: &'a FilesConfig) -> &'a str {
        match self {
            ExportKind::Results => &files.results,
            ExportKind::Decklists => &files.decklists,
            ExportKind::Analysis => &files.analysis,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportKind::Results => "results",
            ExportKind::Decklists => "decklists",
            ExportKind::Analysis => "analysis",
        }
    }
}

/// Reader for one JSON export document.
pub struct ExportReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> ExportReader<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Create a reader for one export inside the data directory.
    pub fn for_export(config: &StorageConfig, kind: ExportKind) -> Self {
        Self::new(config.export_path(kind))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Raw document bytes.
    pub fn read_bytes(&self) -> Result<Vec<u8>, StorageError> {
        if !self.path.exists() {
            return Err(StorageError::PathNotFound(self.path.clone()));
        }
        let bytes = fs::read(&self.path)?;
        debug!("Read {} bytes from {:?}", bytes.len(), self.path);
        Ok(bytes)
    }

    /// Parse bytes previously read from this export.
    pub fn parse(&self, bytes: &[u8]) -> Result<T, StorageError> {
        serde_json::from_slice(bytes).map_err(|source| StorageError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Read and parse the document.
    pub fn read(&self) -> Result<T, StorageError> {
        let bytes = self.read_bytes()?;
        self.parse(&bytes)
    }
}

/// The decklists export: normally a mapping with meaningless keys, an array
/// is accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DecklistDocument {
    Keyed(BTreeMap<String, Decklist>),
    List(Vec<Decklist>),
}

impl DecklistDocument {
    /// Decklists in a deterministic order. Arrays keep document order.
    /// Mappings list integer keys numerically, then any other keys in key
    /// order.
    pub fn into_decklists(self) -> Vec<Decklist> {
        match self {
            DecklistDocument::Keyed(map) => {
                let mut entries: Vec<(Option<u32>, String, Decklist)> = map
                    .into_iter()
                    .map(|(key, deck)| (index_key(&key), key, deck))
                    .collect();
                entries.sort_by(|a, b| match (a.0, b.0) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => a.1.cmp(&b.1),
                });
                entries.into_iter().map(|(_, _, deck)| deck).collect()
            }
            DecklistDocument::List(list) => list,
        }
    }
}

/// A canonical non-negative integer key ("0", "7", "12"; not "07" or "+1").
fn index_key(key: &str) -> Option<u32> {
    let canonical = key == "0" || (!key.starts_with('0') && key.bytes().all(|b| b.is_ascii_digit()));
    if canonical && !key.is_empty() {
        key.parse().ok()
    } else {
        None
    }
}
