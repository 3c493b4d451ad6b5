//! Player name normalization and the player → decklist index.

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use crate::models::Decklist;

/// Canonical form of a player's display name.
///
/// Handles both "First Last" and "Last, First" exports: a name containing a
/// comma is reordered using its first two comma-separated segments (anything
/// after the second comma is dropped). The result is lower-cased with
/// whitespace runs collapsed to single spaces.
pub fn normalize_player_name(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return String::new();
    }

    let reordered;
    let name = if name.contains(',') {
        let parts: Vec<&str> = name.split(',').map(str::trim).collect();
        reordered = format!("{} {}", parts[1], parts[0]);
        reordered.as_str()
    } else {
        name
    };

    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether two display names refer to the same player.
pub fn same_player(a: &str, b: &str) -> bool {
    normalize_player_name(a) == normalize_player_name(b)
}

/// A decklist entry as seen through the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedPlayer {
    /// Display name from the decklist
    pub player: String,

    /// Archetype from the decklist
    pub archetype: String,

    /// Position of the decklist in the loaded collection
    pub position: usize,
}

/// Two decklists whose players normalize to the same identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicatePlayer {
    pub normalized: String,
    /// The decklist that was indexed
    pub kept: IndexedPlayer,
    /// The decklist that was ignored
    pub ignored: IndexedPlayer,
}

/// Normalized player name → decklist, built once per dataset.
#[derive(Debug, Clone, Default)]
pub struct PlayerIndex {
    players: HashMap<String, IndexedPlayer>,
    duplicates: Vec<DuplicatePlayer>,
}

impl PlayerIndex {
    /// Index decklists in order. When two lists normalize to the same player
    /// the first one is kept and the collision is recorded.
    pub fn build(decklists: &[Decklist]) -> Self {
        let mut players: HashMap<String, IndexedPlayer> = HashMap::new();
        let mut duplicates = Vec::new();

        for (position, deck) in decklists.iter().enumerate() {
            let normalized = normalize_player_name(&deck.player);
            if normalized.is_empty() {
                warn!("Decklist at position {} has no player name", position);
                continue;
            }

            let entry = IndexedPlayer {
                player: deck.player.clone(),
                archetype: deck.archetype.clone(),
                position,
            };

            match players.get(&normalized) {
                Some(existing) => {
                    warn!(
                        "Duplicate decklist for player '{}' ({} and {}), keeping the first",
                        normalized, existing.archetype, entry.archetype
                    );
                    duplicates.push(DuplicatePlayer {
                        normalized,
                        kept: existing.clone(),
                        ignored: entry,
                    });
                }
                None => {
                    players.insert(normalized, entry);
                }
            }
        }

        Self {
            players,
            duplicates,
        }
    }

    /// Look up a player by any display form of their name.
    pub fn get(&self, name: &str) -> Option<&IndexedPlayer> {
        self.players.get(&normalize_player_name(name))
    }

    /// Look up by an already-normalized name.
    pub fn get_normalized(&self, normalized: &str) -> Option<&IndexedPlayer> {
        self.players.get(normalized)
    }

    /// Archetype of a player, if they have a decklist.
    pub fn archetype_of(&self, name: &str) -> Option<&str> {
        self.get(name).map(|p| p.archetype.as_str())
    }

    /// The decklist of a player.
    pub fn decklist<'a>(&self, decklists: &'a [Decklist], name: &str) -> Option<&'a Decklist> {
        self.get(name).and_then(|p| decklists.get(p.position))
    }

    /// Indexed players ordered by their position in the collection.
    pub fn players(&self) -> Vec<&IndexedPlayer> {
        let mut players: Vec<_> = self.players.values().collect();
        players.sort_by_key(|p| p.position);
        players
    }

    /// Duplicate-player collisions found while building.
    pub fn duplicates(&self) -> &[DuplicatePlayer] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
