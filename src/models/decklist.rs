//! Decklist model: a player's registered main deck and sideboard.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One line of a decklist: a card name and its copy count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEntry {
    pub count: u32,
    pub name: String,
}

impl CardEntry {
    pub fn new(count: u32, name: impl Into<String>) -> Self {
        Self {
            count,
            name: name.into(),
        }
    }
}

/// Deck identity used for inclusion statistics: the (player, archetype) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeckKey {
    pub player: String,
    pub archetype: String,
}

/// A submitted decklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decklist {
    /// Player display name as registered
    pub player: String,

    /// Archetype label assigned upstream
    pub archetype: String,

    /// Main deck entries (absent in some exports)
    #[serde(default)]
    pub main_deck: Vec<CardEntry>,

    /// Sideboard entries (absent in some exports)
    #[serde(default)]
    pub sideboard: Vec<CardEntry>,
}

impl Decklist {
    pub fn new(player: impl Into<String>, archetype: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            archetype: archetype.into(),
            main_deck: Vec::new(),
            sideboard: Vec::new(),
        }
    }

    pub fn with_main_deck(mut self, cards: Vec<CardEntry>) -> Self {
        self.main_deck = cards;
        self
    }

    pub fn with_sideboard(mut self, cards: Vec<CardEntry>) -> Self {
        self.sideboard = cards;
        self
    }

    pub fn key(&self) -> DeckKey {
        DeckKey {
            player: self.player.clone(),
            archetype: self.archetype.clone(),
        }
    }

    /// Total number of cards in the main deck.
    pub fn main_deck_size(&self) -> u32 {
        self.main_deck.iter().map(|c| c.count).sum()
    }

    /// Total number of cards in the sideboard.
    pub fn sideboard_size(&self) -> u32 {
        self.sideboard.iter().map(|c| c.count).sum()
    }

    /// Copies of `card` in the main deck (entries with the same name are summed).
    pub fn main_deck_copies(&self, card: &str) -> u32 {
        copies_of(&self.main_deck, card)
    }

    /// Copies of `card` in the sideboard.
    pub fn sideboard_copies(&self, card: &str) -> u32 {
        copies_of(&self.sideboard, card)
    }

    /// Export in the plain-text "N Card Name" format accepted by digital clients.
    /// Main deck first, then a blank line and the sideboard.
    pub fn to_arena_format(&self) -> String {
        let mut lines: Vec<String> = self
            .main_deck
            .iter()
            .map(|c| format!("{} {}", c.count, c.name))
            .collect();

        if !self.sideboard.is_empty() {
            lines.push(String::new());
            lines.extend(self.sideboard.iter().map(|c| format!("{} {}", c.count, c.name)));
        }

        lines.join("\n").trim().to_string()
    }
}

fn copies_of(entries: &[CardEntry], card: &str) -> u32 {
    entries
        .iter()
        .filter(|c| c.name == card)
        .map(|c| c.count)
        .sum()
}

/// Drop later decklists whose (player, archetype) identity was already seen.
/// Returns the kept lists in input order plus the number dropped.
pub fn unique_decks<'a, I>(decklists: I) -> (Vec<&'a Decklist>, usize)
where
    I: IntoIterator<Item = &'a Decklist>,
{
    let mut seen: HashSet<DeckKey> = HashSet::new();
    let mut kept = Vec::new();
    let mut dropped = 0;

    for deck in decklists {
        if seen.insert(deck.key()) {
            kept.push(deck);
        } else {
            dropped += 1;
        }
    }

    (kept, dropped)
}
