//! Statistics calculation engine.
//!
//! Pure functions over the loaded exports:
//! - Player name normalization and the player index
//! - Round classification (draft/constructed, day 1/day 2)
//! - Player and archetype records
//! - The archetype matchup grid
//! - Card inclusion statistics
//! - Day-1 to day-2 metagame conversion
//! - Table sorting, searching and paging

pub mod cards;
pub mod matchups;
pub mod metagame;
pub mod names;
pub mod records;
pub mod rounds;
pub mod table;

pub use cards::{
    card_across_archetypes, card_in_archetype, card_totals, card_usage, cards_in_archetype,
};
pub use matchups::{MatchupGrid, MatchupGridRow, MatchupRow, MatchupView};
pub use metagame::conversion_by_archetype;
pub use names::{normalize_player_name, same_player, DuplicatePlayer, IndexedPlayer, PlayerIndex};
pub use records::{
    aggregate, aggregate_partitioned, archetype_player_records, archetype_records,
    archetype_summaries, player_matches, player_records, Participation, UNKNOWN_ARCHETYPE,
};
pub use rounds::RoundClassifier;

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{ArchetypeMetagameRow, Fingerprint};
use crate::storage::Dataset;

/// Errors raised by calculations given invalid arguments.
#[derive(Debug, Error)]
pub enum CalculateError {
    #[error("Invalid scope: {0}")]
    InvalidScope(String),
}

/// Dashboard totals for a loaded dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetOverview {
    pub total_players: u32,
    pub total_archetypes: u32,
    pub total_matches: u32,
    pub total_decks: u32,
    pub decklists: u32,
    pub results: u32,
    pub fingerprint: Fingerprint,
    pub loaded_at: DateTime<Utc>,
    pub duplicate_players: Vec<DuplicatePlayer>,
}

/// A dataset together with the derived data every view shares.
///
/// The player index and matchup grid depend only on the dataset, so they are
/// built once here. Scoped views (card stats, filtered tables) are computed
/// per call.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub dataset: Dataset,
    pub classifier: RoundClassifier,
    pub index: PlayerIndex,
    pub grid: MatchupGrid,
}

impl Snapshot {
    pub fn build(dataset: Dataset, classifier: RoundClassifier) -> Self {
        let index = PlayerIndex::build(&dataset.decklists);

        let grid = if dataset.results.is_empty() {
            info!("No match results loaded, using precomputed matchups");
            MatchupGrid::from_analysis(&dataset.analysis)
        } else {
            MatchupGrid::build(
                archetype_names(&dataset).iter().map(String::as_str),
                &index,
                &dataset.results,
                &classifier,
            )
        };

        debug!(
            "Built snapshot {}: {} indexed players, {} archetypes, {} matchup rows",
            dataset.fingerprint,
            index.len(),
            grid.archetypes().len(),
            grid.rows().len()
        );

        Self {
            dataset,
            classifier,
            index,
            grid,
        }
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.dataset.fingerprint
    }

    pub fn overview(&self) -> DatasetOverview {
        let analysis = &self.dataset.analysis;
        DatasetOverview {
            total_players: analysis.total_players,
            total_archetypes: analysis.archetype_counts.len() as u32,
            total_matches: analysis.total_matches,
            total_decks: analysis.total_decks(),
            decklists: self.dataset.decklists.len() as u32,
            results: self.dataset.results.len() as u32,
            fingerprint: self.dataset.fingerprint.clone(),
            loaded_at: self.dataset.loaded_at,
            duplicate_players: self.index.duplicates().to_vec(),
        }
    }

    pub fn metagame(&self) -> Vec<ArchetypeMetagameRow> {
        conversion_by_archetype(
            &self.dataset.analysis.archetype_counts,
            &self.index,
            &self.dataset.results,
            &self.classifier,
        )
    }
}

/// Every archetype named by the analysis or a decklist, sorted.
pub fn archetype_names(dataset: &Dataset) -> Vec<String> {
    let mut names: BTreeSet<&str> = dataset
        .analysis
        .archetype_counts
        .keys()
        .map(String::as_str)
        .collect();
    names.extend(dataset.decklists.iter().map(|d| d.archetype.as_str()));
    names.into_iter().map(str::to_string).collect()
}
