//! Day-1 vs day-2 metagame share and conversion.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use super::names::{normalize_player_name, PlayerIndex};
use super::rounds::RoundClassifier;
use crate::models::{percentage, ArchetypeMetagameRow, MatchResult};

/// Normalized identities of every player seated in a day-2 round.
pub fn day2_players(matches: &[MatchResult], classifier: &RoundClassifier) -> HashSet<String> {
    matches
        .iter()
        .filter(|m| classifier.is_day2_round(m.round))
        .flat_map(|m| [&m.player1, &m.player2])
        .map(|name| normalize_player_name(name))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Day-2 players per archetype, counted through the player index.
pub fn day2_archetype_counts(
    index: &PlayerIndex,
    matches: &[MatchResult],
    classifier: &RoundClassifier,
) -> BTreeMap<String, u32> {
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    let mut unmatched = 0usize;

    for player in day2_players(matches, classifier) {
        match index.get_normalized(&player) {
            Some(entry) => *counts.entry(entry.archetype.clone()).or_default() += 1,
            None => unmatched += 1,
        }
    }

    if unmatched > 0 {
        debug!("{} day-2 players have no decklist", unmatched);
    }
    counts
}

/// Conversion rows for every archetype in `archetype_counts` plus any
/// archetype that only shows up on day 2. Ordered by day-1 share, largest
/// first.
pub fn conversion_by_archetype(
    archetype_counts: &BTreeMap<String, u32>,
    index: &PlayerIndex,
    matches: &[MatchResult],
    classifier: &RoundClassifier,
) -> Vec<ArchetypeMetagameRow> {
    let day2 = day2_archetype_counts(index, matches, classifier);

    let day1_total: u32 = archetype_counts.values().sum();
    let day2_total: u32 = day2.values().sum();

    let mut archetypes: Vec<&String> = archetype_counts.keys().collect();
    for archetype in day2.keys() {
        if !archetype_counts.contains_key(archetype) {
            debug!("Archetype '{}' appears on day 2 only", archetype);
            archetypes.push(archetype);
        }
    }

    let mut rows: Vec<ArchetypeMetagameRow> = archetypes
        .into_iter()
        .map(|archetype| {
            let day1_players = archetype_counts.get(archetype).copied().unwrap_or(0);
            let day2_players = day2.get(archetype).copied().unwrap_or(0);
            ArchetypeMetagameRow {
                archetype: archetype.clone(),
                day1_players,
                day1_percentage: percentage(day1_players, day1_total),
                day2_players,
                day2_percentage: percentage(day2_players, day2_total),
                conversion_rate: percentage(day2_players, day1_players),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.day1_players
            .cmp(&a.day1_players)
            .then_with(|| a.archetype.cmp(&b.archetype))
    });
    rows
}
