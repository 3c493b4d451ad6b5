//! Archetype-vs-archetype matchup grid.
//!
//! Rows are stored once per unordered archetype pair and re-oriented to the
//! caller's perspective on lookup. Mirror matches never appear in the grid.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::{debug, warn};

use super::names::PlayerIndex;
use super::rounds::RoundClassifier;
use crate::models::{ratio, AnalysisData, MatchResult, Outcome, Seat};

/// Unordered archetype pair, stored with the names in sorted order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct PairKey(String, String);

impl PairKey {
    fn new(a: &str, b: &str) -> Self {
        if a <= b {
            PairKey(a.to_string(), b.to_string())
        } else {
            PairKey(b.to_string(), a.to_string())
        }
    }
}

/// Head-to-head totals for one unordered pair. `archetype1`/`archetype2`
/// record which raw side each tally belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchupRow {
    pub archetype1: String,
    pub archetype2: String,
    pub arch1_wins: u32,
    pub arch2_wins: u32,
    pub arch1_games: u32,
    pub arch2_games: u32,
    pub draws: u32,
    pub total_matches: u32,
}

impl MatchupRow {
    fn new(archetype1: &str, archetype2: &str) -> Self {
        Self {
            archetype1: archetype1.to_string(),
            archetype2: archetype2.to_string(),
            ..Default::default()
        }
    }

    /// Matches with a winner.
    pub fn decisive_matches(&self) -> u32 {
        self.arch1_wins + self.arch2_wins
    }

    /// This row seen from `archetype`'s side, `None` if it is not a side.
    pub fn oriented(&self, archetype: &str) -> Option<MatchupView> {
        let (wins, losses, games_won, games_lost, opponent) = if archetype == self.archetype1 {
            (
                self.arch1_wins,
                self.arch2_wins,
                self.arch1_games,
                self.arch2_games,
                &self.archetype2,
            )
        } else if archetype == self.archetype2 {
            (
                self.arch2_wins,
                self.arch1_wins,
                self.arch2_games,
                self.arch1_games,
                &self.archetype1,
            )
        } else {
            return None;
        };

        Some(MatchupView {
            archetype: archetype.to_string(),
            opponent: opponent.clone(),
            wins,
            losses,
            draws: self.draws,
            games_won,
            games_lost,
            total_matches: self.total_matches,
            win_rate: ratio(wins, wins + losses).clamp(0.0, 1.0),
            game_win_rate: ratio(games_won, games_won + games_lost).clamp(0.0, 1.0),
        })
    }

    fn record(&mut self, m: &MatchResult, archetype1_seat: Seat) {
        let archetype2_seat = archetype1_seat.opponent();
        match m.outcome_for(archetype1_seat) {
            Outcome::Win => self.arch1_wins += 1,
            Outcome::Loss => self.arch2_wins += 1,
            Outcome::Draw => self.draws += 1,
        }
        self.arch1_games += m.games_for(archetype1_seat);
        self.arch2_games += m.games_for(archetype2_seat);
        self.total_matches += 1;
    }
}

/// A matchup from one archetype's perspective.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupView {
    pub archetype: String,
    pub opponent: String,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub total_matches: u32,
    /// wins / decisive matches, 0 when none were decisive
    pub win_rate: f64,
    pub game_win_rate: f64,
}

/// One row of the rendered grid: a row archetype and one cell per column
/// archetype. Cells are `None` on the diagonal and for pairs never played.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupGridRow {
    pub archetype: String,
    pub cells: Vec<Option<MatchupView>>,
}

/// Symmetric archetype × archetype matchup table.
#[derive(Debug, Clone, Default)]
pub struct MatchupGrid {
    archetypes: Vec<String>,
    rows: HashMap<PairKey, MatchupRow>,
}

impl MatchupGrid {
    /// Build from raw results. Only constructed rounds count, and only
    /// matches where both players have a decklist on different archetypes.
    pub fn build<'a, I>(
        archetypes: I,
        index: &PlayerIndex,
        matches: &[MatchResult],
        classifier: &RoundClassifier,
    ) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut rows: HashMap<PairKey, MatchupRow> = HashMap::new();
        let mut unknown = 0usize;

        for m in matches {
            if classifier.is_draft_round(m.round) {
                continue;
            }
            let (Some(a1), Some(a2)) = (index.archetype_of(&m.player1), index.archetype_of(&m.player2))
            else {
                unknown += 1;
                continue;
            };
            if a1 == a2 {
                continue;
            }

            let key = PairKey::new(a1, a2);
            let row = rows
                .entry(key)
                .or_insert_with(|| MatchupRow::new(a1, a2));
            let archetype1_seat = if row.archetype1 == a1 {
                Seat::Player1
            } else {
                Seat::Player2
            };
            row.record(m, archetype1_seat);
        }

        if unknown > 0 {
            debug!(
                "Matchup grid skipped {} matches with a player missing a decklist",
                unknown
            );
        }

        Self::assemble(archetypes, rows)
    }

    /// Build from the precomputed analysis rows. Win rates are recomputed from
    /// the win tallies; the precomputed rate fields are not trusted.
    pub fn from_analysis(analysis: &AnalysisData) -> Self {
        let mut rows: HashMap<PairKey, MatchupRow> = HashMap::new();

        for (key, stats) in &analysis.matchup_stats {
            if stats.archetype1 == stats.archetype2 {
                debug!("Ignoring mirror matchup row '{}'", key);
                continue;
            }
            let pair = PairKey::new(&stats.archetype1, &stats.archetype2);
            if rows.contains_key(&pair) {
                warn!(
                    "Matchup row '{}' repeats the pair {} / {}, keeping the first",
                    key, stats.archetype1, stats.archetype2
                );
                continue;
            }
            rows.insert(
                pair,
                MatchupRow {
                    archetype1: stats.archetype1.clone(),
                    archetype2: stats.archetype2.clone(),
                    arch1_wins: stats.arch1_wins,
                    arch2_wins: stats.arch2_wins,
                    arch1_games: stats.arch1_games,
                    arch2_games: stats.arch2_games,
                    draws: 0,
                    total_matches: stats.arch1_wins + stats.arch2_wins,
                },
            );
        }

        Self::assemble(analysis.archetype_counts.keys().map(String::as_str), rows)
    }

    fn assemble<'a, I>(archetypes: I, rows: HashMap<PairKey, MatchupRow>) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut names: BTreeSet<String> = archetypes.into_iter().map(str::to_string).collect();
        for row in rows.values() {
            names.insert(row.archetype1.clone());
            names.insert(row.archetype2.clone());
        }

        Self {
            archetypes: names.into_iter().collect(),
            rows,
        }
    }

    /// All archetypes in the grid, sorted.
    pub fn archetypes(&self) -> &[String] {
        &self.archetypes
    }

    /// The matchup from `archetype`'s perspective against `opponent`.
    /// `None` for mirrors and for pairs with no recorded matches.
    pub fn get(&self, archetype: &str, opponent: &str) -> Option<MatchupView> {
        if archetype == opponent {
            return None;
        }
        self.rows
            .get(&PairKey::new(archetype, opponent))
            .and_then(|row| row.oriented(archetype))
    }

    /// Stored rows, one per unordered pair, sorted by pair.
    pub fn rows(&self) -> Vec<&MatchupRow> {
        let mut keys: Vec<&PairKey> = self.rows.keys().collect();
        keys.sort();
        keys.into_iter().map(|k| &self.rows[k]).collect()
    }

    /// Every recorded matchup of one archetype, sorted by opponent.
    pub fn opponents_of(&self, archetype: &str) -> Vec<MatchupView> {
        self.archetypes
            .iter()
            .filter_map(|opponent| self.get(archetype, opponent))
            .collect()
    }

    /// The full grid in row-major order.
    pub fn grid(&self) -> Vec<MatchupGridRow> {
        self.archetypes
            .iter()
            .map(|row| MatchupGridRow {
                archetype: row.clone(),
                cells: self
                    .archetypes
                    .iter()
                    .map(|column| self.get(row, column))
                    .collect(),
            })
            .collect()
    }
}
