//! Card inclusion statistics over decklists.
//!
//! Decks are identified by (player, archetype); repeated identities count
//! once, first occurrence wins. Averages and percentages are taken over every
//! deck in scope, including decks without the card.

use std::collections::BTreeMap;

use tracing::debug;

use super::CalculateError;
use crate::models::{percentage, ratio, unique_decks, CardStat, CardUsage, Decklist};

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    main_total: u32,
    main_decks: u32,
    side_total: u32,
    side_decks: u32,
    decks: u32,
}

impl Tally {
    /// Fold one deck's copies of a card.
    fn add(&mut self, main: u32, side: u32) {
        self.main_total += main;
        self.side_total += side;
        if main > 0 {
            self.main_decks += 1;
        }
        if side > 0 {
            self.side_decks += 1;
        }
        if main + side > 0 {
            self.decks += 1;
        }
    }

    fn total(&self) -> u32 {
        self.main_total + self.side_total
    }

    fn into_stat(self, name: &str, archetype: Option<&str>, total_decks: u32) -> CardStat {
        CardStat {
            name: name.to_string(),
            archetype: archetype.map(str::to_string),
            main_deck_total: self.main_total,
            main_deck_average: ratio(self.main_total, total_decks),
            main_deck_decks_included: self.main_decks,
            main_deck_percentage: percentage(self.main_decks, total_decks),
            sideboard_total: self.side_total,
            sideboard_average: ratio(self.side_total, total_decks),
            sideboard_decks_included: self.side_decks,
            sideboard_percentage: percentage(self.side_decks, total_decks),
            total_copies: self.total(),
            decks_included: self.decks,
            total_decks,
            percentage_included: percentage(self.decks, total_decks),
        }
    }
}

fn require(label: &str, value: &str) -> Result<(), CalculateError> {
    if value.trim().is_empty() {
        return Err(CalculateError::InvalidScope(format!(
            "{} must not be blank",
            label
        )));
    }
    Ok(())
}

/// Unique decks, optionally limited to one archetype.
fn decks_in_scope<'a>(decklists: &'a [Decklist], archetype: Option<&str>) -> Vec<&'a Decklist> {
    let (kept, dropped) = unique_decks(
        decklists
            .iter()
            .filter(|d| archetype.map_or(true, |a| d.archetype == a)),
    );
    if dropped > 0 {
        debug!("Ignored {} repeated decklists", dropped);
    }
    kept
}

fn tally_card(decks: &[&Decklist], card: &str) -> Tally {
    let mut tally = Tally::default();
    for deck in decks {
        tally.add(deck.main_deck_copies(card), deck.sideboard_copies(card));
    }
    tally
}

/// Per-card copies of one deck, repeated entries summed: name → (main, side).
fn deck_cards(deck: &Decklist) -> BTreeMap<&str, (u32, u32)> {
    let mut cards: BTreeMap<&str, (u32, u32)> = BTreeMap::new();
    for entry in &deck.main_deck {
        cards.entry(entry.name.as_str()).or_default().0 += entry.count;
    }
    for entry in &deck.sideboard {
        cards.entry(entry.name.as_str()).or_default().1 += entry.count;
    }
    cards
}

fn by_copies_desc(a: &CardStat, b: &CardStat) -> std::cmp::Ordering {
    b.total_copies.cmp(&a.total_copies)
}

/// Every card played in one archetype, most copies first (ties by name).
pub fn cards_in_archetype(
    decklists: &[Decklist],
    archetype: &str,
) -> Result<Vec<CardStat>, CalculateError> {
    require("archetype", archetype)?;

    let decks = decks_in_scope(decklists, Some(archetype));
    let total_decks = decks.len() as u32;

    let mut tallies: BTreeMap<&str, Tally> = BTreeMap::new();
    for deck in &decks {
        for (name, (main, side)) in deck_cards(deck) {
            tallies.entry(name).or_default().add(main, side);
        }
    }

    let mut stats: Vec<CardStat> = tallies
        .into_iter()
        .filter(|(_, t)| t.total() > 0)
        .map(|(name, t)| t.into_stat(name, Some(archetype), total_decks))
        .collect();
    stats.sort_by(by_copies_desc);

    debug!(
        "Card stats for {}: {} cards over {} decks",
        archetype,
        stats.len(),
        total_decks
    );
    Ok(stats)
}

/// One card broken down by archetype. The denominator of each row is every
/// deck of that archetype; archetypes without a copy are omitted. Most copies
/// first (ties by archetype).
pub fn card_across_archetypes(
    decklists: &[Decklist],
    card: &str,
) -> Result<Vec<CardStat>, CalculateError> {
    require("card", card)?;

    let mut groups: BTreeMap<&str, Vec<&Decklist>> = BTreeMap::new();
    for deck in decks_in_scope(decklists, None) {
        groups.entry(deck.archetype.as_str()).or_default().push(deck);
    }

    let mut stats: Vec<CardStat> = groups
        .into_iter()
        .filter_map(|(archetype, decks)| {
            let tally = tally_card(&decks, card);
            (tally.total() > 0).then(|| tally.into_stat(card, Some(archetype), decks.len() as u32))
        })
        .collect();
    stats.sort_by(by_copies_desc);
    Ok(stats)
}

/// One card within one archetype, `None` when no deck there plays it.
pub fn card_in_archetype(
    decklists: &[Decklist],
    card: &str,
    archetype: &str,
) -> Result<Option<CardStat>, CalculateError> {
    require("card", card)?;
    require("archetype", archetype)?;

    let decks = decks_in_scope(decklists, Some(archetype));
    let tally = tally_card(&decks, card);
    if tally.total() == 0 {
        return Ok(None);
    }
    Ok(Some(tally.into_stat(card, Some(archetype), decks.len() as u32)))
}

/// One card across the whole field. Always returns a row, zeroed when the
/// card is never played.
pub fn card_totals(decklists: &[Decklist], card: &str) -> Result<CardStat, CalculateError> {
    require("card", card)?;

    let decks = decks_in_scope(decklists, None);
    Ok(tally_card(&decks, card).into_stat(card, None, decks.len() as u32))
}

/// Every card in the field with its copy totals, most copies first.
pub fn card_usage(decklists: &[Decklist]) -> Vec<CardUsage> {
    let mut usage: BTreeMap<&str, CardUsage> = BTreeMap::new();

    for deck in decks_in_scope(decklists, None) {
        for (name, (main, side)) in deck_cards(deck) {
            if main + side == 0 {
                continue;
            }
            let row = usage.entry(name).or_insert_with(|| CardUsage {
                name: name.to_string(),
                total_copies: 0,
                main_deck_copies: 0,
                sideboard_copies: 0,
                decks_included: 0,
            });
            row.main_deck_copies += main;
            row.sideboard_copies += side;
            row.total_copies += main + side;
            row.decks_included += 1;
        }
    }

    let mut rows: Vec<CardUsage> = usage.into_values().collect();
    rows.sort_by(|a, b| b.total_copies.cmp(&a.total_copies));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CardEntry;
    use pretty_assertions::assert_eq;

    fn deck(player: &str, archetype: &str, main: &[(u32, &str)], side: &[(u32, &str)]) -> Decklist {
        Decklist::new(player, archetype)
            .with_main_deck(main.iter().map(|(c, n)| CardEntry::new(*c, *n)).collect())
            .with_sideboard(side.iter().map(|(c, n)| CardEntry::new(*c, *n)).collect())
    }

    fn field() -> Vec<Decklist> {
        vec![
            deck(
                "Ann",
                "Red Deck",
                &[(3, "Lightning Bolt"), (20, "Mountain")],
                &[(2, "Pyroblast")],
            ),
            deck("Cal", "Red Deck", &[(3, "Lightning Bolt"), (21, "Mountain")], &[]),
            deck("Ben", "Blue Deck", &[(4, "Counterspell"), (20, "Island")], &[]),
            deck("Dee", "Blue Deck", &[(4, "Counterspell")], &[(1, "Lightning Bolt")]),
            deck("Eve", "Blue Deck", &[(2, "Counterspell")], &[]),
        ]
    }

    #[test]
    fn test_card_in_archetype_basic() {
        let decks = vec![
            deck("P1", "Red Deck", &[(4, "Lightning Bolt")], &[]),
            deck("P2", "Red Deck", &[(2, "Lightning Bolt")], &[]),
            deck("P3", "Blue Deck", &[], &[]),
        ];
        let stat = card_in_archetype(&decks, "Lightning Bolt", "Red Deck")
            .unwrap()
            .unwrap();

        assert_eq!(stat.main_deck_total, 6);
        assert_eq!(stat.main_deck_average, 3.0);
        assert_eq!(stat.decks_included, 2);
        assert_eq!(stat.total_decks, 2);
        assert_eq!(stat.percentage_included, 100.0);
    }

    #[test]
    fn test_average_counts_decks_without_the_card() {
        let stats = cards_in_archetype(&field(), "Blue Deck").unwrap();
        let counterspell = stats.iter().find(|s| s.name == "Counterspell").unwrap();
        assert_eq!(counterspell.main_deck_total, 10);
        assert!((counterspell.main_deck_average - 10.0 / 3.0).abs() < 1e-9);

        let island = stats.iter().find(|s| s.name == "Island").unwrap();
        assert_eq!(island.main_deck_decks_included, 1);
        assert_eq!(island.total_decks, 3);
        assert!((island.percentage_included - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_cards_in_archetype_order_and_scope() {
        let stats = cards_in_archetype(&field(), "Red Deck").unwrap();
        let names: Vec<_> = stats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Mountain", "Lightning Bolt", "Pyroblast"]);
        assert!(stats.iter().all(|s| s.archetype.as_deref() == Some("Red Deck")));
    }

    #[test]
    fn test_sideboard_only_inclusion_counts() {
        let stat = card_in_archetype(&field(), "Lightning Bolt", "Blue Deck")
            .unwrap()
            .unwrap();
        assert_eq!(stat.main_deck_total, 0);
        assert_eq!(stat.sideboard_total, 1);
        assert_eq!(stat.sideboard_decks_included, 1);
        assert_eq!(stat.decks_included, 1);
        assert_eq!(stat.total_decks, 3);
    }

    #[test]
    fn test_percentage_bounds() {
        for archetype in ["Red Deck", "Blue Deck"] {
            for stat in cards_in_archetype(&field(), archetype).unwrap() {
                assert!(stat.decks_included <= stat.total_decks);
                assert!((0.0..=100.0).contains(&stat.percentage_included));
                assert!(stat.total_copies > 0);
            }
        }
    }

    #[test]
    fn test_card_across_archetypes() {
        let rows = card_across_archetypes(&field(), "Lightning Bolt").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].archetype.as_deref(), Some("Red Deck"));
        assert_eq!(rows[0].total_copies, 6);
        assert_eq!(rows[0].total_decks, 2);
        assert_eq!(rows[1].archetype.as_deref(), Some("Blue Deck"));
        assert_eq!(rows[1].total_copies, 1);
        assert_eq!(rows[1].total_decks, 3);
    }

    #[test]
    fn test_card_across_archetypes_omits_zero_rows() {
        let rows = card_across_archetypes(&field(), "Counterspell").unwrap();
        assert_eq!(rows.len(), 1);
        assert!(card_across_archetypes(&field(), "Black Lotus")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_card_in_archetype_absent() {
        assert!(card_in_archetype(&field(), "Island", "Red Deck")
            .unwrap()
            .is_none());
        assert!(card_in_archetype(&field(), "Island", "Green Deck")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_card_totals() {
        let stat = card_totals(&field(), "Lightning Bolt").unwrap();
        assert_eq!(stat.archetype, None);
        assert_eq!(stat.total_copies, 7);
        assert_eq!(stat.decks_included, 3);
        assert_eq!(stat.total_decks, 5);
        assert_eq!(stat.percentage_included, 60.0);

        let none = card_totals(&field(), "Black Lotus").unwrap();
        assert_eq!(none.total_copies, 0);
        assert_eq!(none.percentage_included, 0.0);
    }

    #[test]
    fn test_repeated_deck_identity_counted_once() {
        let mut decks = vec![deck("Ann", "Red Deck", &[(3, "Lightning Bolt")], &[])];
        decks.push(deck("Ann", "Red Deck", &[(4, "Lightning Bolt")], &[]));

        let stat = card_in_archetype(&decks, "Lightning Bolt", "Red Deck")
            .unwrap()
            .unwrap();
        assert_eq!(stat.total_decks, 1);
        assert_eq!(stat.main_deck_total, 3);
    }

    #[test]
    fn test_repeated_entries_in_one_deck() {
        let decks = vec![deck(
            "Ann",
            "Red Deck",
            &[(2, "Lightning Bolt"), (1, "Lightning Bolt")],
            &[],
        )];
        let stats = cards_in_archetype(&decks, "Red Deck").unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].main_deck_total, 3);
        assert_eq!(stats[0].main_deck_decks_included, 1);
    }

    #[test]
    fn test_empty_scope() {
        assert!(cards_in_archetype(&field(), "Green Deck").unwrap().is_empty());
        assert!(cards_in_archetype(&[], "Red Deck").unwrap().is_empty());
        let stat = card_totals(&[], "Lightning Bolt").unwrap();
        assert_eq!(stat.total_decks, 0);
        assert_eq!(stat.main_deck_average, 0.0);
    }

    #[test]
    fn test_blank_arguments_rejected() {
        assert!(matches!(
            cards_in_archetype(&field(), "  "),
            Err(CalculateError::InvalidScope(_))
        ));
        assert!(card_across_archetypes(&field(), "").is_err());
        assert!(card_in_archetype(&field(), "Lightning Bolt", "").is_err());
        assert!(card_totals(&field(), " ").is_err());
    }

    #[test]
    fn test_card_usage() {
        let usage = card_usage(&field());
        assert_eq!(usage[0].name, "Mountain");
        assert_eq!(usage[0].total_copies, 41);

        let bolt = usage.iter().find(|u| u.name == "Lightning Bolt").unwrap();
        assert_eq!(bolt.main_deck_copies, 6);
        assert_eq!(bolt.sideboard_copies, 1);
        assert_eq!(bolt.decks_included, 3);
    }
}
