//! Win/loss/draw record aggregation for players and archetypes.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::names::{normalize_player_name, PlayerIndex};
use super::rounds::RoundClassifier;
use crate::models::{
    AnalysisData, ArchetypeSummaryRow, MatchResult, PartitionedRecord, PlayerMatchLine,
    PlayerRecord, Record, Seat,
};

/// Archetype label used when an opponent has no decklist.
pub const UNKNOWN_ARCHETYPE: &str = "Unknown";

/// Which seat(s) of a match the subject occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participation {
    Player1,
    Player2,
    Both,
}

impl Participation {
    pub fn from_seats(as_player1: bool, as_player2: bool) -> Option<Self> {
        match (as_player1, as_player2) {
            (true, true) => Some(Participation::Both),
            (true, false) => Some(Participation::Player1),
            (false, true) => Some(Participation::Player2),
            (false, false) => None,
        }
    }

    pub fn seats(self) -> &'static [Seat] {
        match self {
            Participation::Player1 => &[Seat::Player1],
            Participation::Player2 => &[Seat::Player2],
            Participation::Both => &[Seat::Player1, Seat::Player2],
        }
    }
}

/// Fold every match the subject takes part in and whose round passes
/// `round_filter` into one record.
pub fn aggregate<S, F>(matches: &[MatchResult], subject: S, round_filter: F) -> Record
where
    S: Fn(&MatchResult) -> Option<Participation>,
    F: Fn(u32) -> bool,
{
    let mut record = Record::default();
    for m in matches.iter().filter(|m| round_filter(m.round)) {
        if let Some(participation) = subject(m) {
            for &seat in participation.seats() {
                record.add_match(m, seat);
            }
        }
    }
    record
}

/// Draft and constructed records in a single pass.
pub fn aggregate_partitioned<S>(
    matches: &[MatchResult],
    subject: S,
    classifier: &RoundClassifier,
) -> PartitionedRecord
where
    S: Fn(&MatchResult) -> Option<Participation>,
{
    let mut partitioned = PartitionedRecord::default();
    for m in matches {
        if let Some(participation) = subject(m) {
            let record = partitioned.phase_mut(classifier.phase(m.round));
            for &seat in participation.seats() {
                record.add_match(m, seat);
            }
        }
    }
    partitioned
}

/// Subject matcher for one player, compared by normalized name.
pub fn player_subject(name: &str) -> impl Fn(&MatchResult) -> Option<Participation> {
    let normalized = normalize_player_name(name);
    move |m: &MatchResult| {
        if normalized.is_empty() {
            return None;
        }
        Participation::from_seats(
            normalize_player_name(&m.player1) == normalized,
            normalize_player_name(&m.player2) == normalized,
        )
    }
}

/// Subject matcher for an archetype through its roster. Mirror matches do
/// not count toward the archetype's record.
pub fn archetype_subject<'a>(
    archetype: &'a str,
    index: &'a PlayerIndex,
) -> impl Fn(&MatchResult) -> Option<Participation> + 'a {
    move |m: &MatchResult| {
        let a1 = index.archetype_of(&m.player1);
        let a2 = index.archetype_of(&m.player2);
        if a1.is_some() && a1 == a2 {
            return None;
        }
        Participation::from_seats(a1 == Some(archetype), a2 == Some(archetype))
    }
}

/// Constructed-phase record of every indexed player (the player table).
/// Players without a decklist are not listed.
pub fn player_records(
    index: &PlayerIndex,
    matches: &[MatchResult],
    classifier: &RoundClassifier,
) -> Vec<PlayerRecord> {
    let mut records: HashMap<String, Record> = HashMap::new();

    for m in matches {
        if classifier.is_draft_round(m.round) {
            continue;
        }
        for seat in [Seat::Player1, Seat::Player2] {
            let normalized = normalize_player_name(m.player(seat));
            if index.get_normalized(&normalized).is_some() {
                records.entry(normalized).or_default().add_match(m, seat);
            }
        }
    }

    index
        .players()
        .into_iter()
        .map(|p| {
            let record = records
                .get(&normalize_player_name(&p.player))
                .copied()
                .unwrap_or_default();
            PlayerRecord {
                player: p.player.clone(),
                archetype: p.archetype.clone(),
                record: record.summary(),
            }
        })
        .collect()
}

/// Constructed-phase records of the players on one archetype.
pub fn archetype_player_records(
    index: &PlayerIndex,
    matches: &[MatchResult],
    classifier: &RoundClassifier,
    archetype: &str,
) -> Vec<PlayerRecord> {
    player_records(index, matches, classifier)
        .into_iter()
        .filter(|r| r.archetype == archetype)
        .collect()
}

/// Constructed-phase record per archetype, derived from raw results.
/// Matches involving a player without a decklist, and mirror matches,
/// are skipped.
pub fn archetype_records(
    index: &PlayerIndex,
    matches: &[MatchResult],
    classifier: &RoundClassifier,
) -> BTreeMap<String, Record> {
    let mut records: BTreeMap<String, Record> = BTreeMap::new();
    let mut skipped = 0usize;

    for m in matches {
        if classifier.is_draft_round(m.round) {
            continue;
        }
        let (Some(a1), Some(a2)) = (index.archetype_of(&m.player1), index.archetype_of(&m.player2))
        else {
            skipped += 1;
            continue;
        };
        if a1 == a2 {
            continue;
        }
        records
            .entry(a1.to_string())
            .or_default()
            .add_match(m, Seat::Player1);
        records
            .entry(a2.to_string())
            .or_default()
            .add_match(m, Seat::Player2);
    }

    if skipped > 0 {
        debug!("Skipped {} matches with an unknown archetype", skipped);
    }

    records
}

/// A player's matches in round order, from their perspective.
pub fn player_matches(
    index: &PlayerIndex,
    matches: &[MatchResult],
    classifier: &RoundClassifier,
    player: &str,
) -> Vec<PlayerMatchLine> {
    let normalized = normalize_player_name(player);
    if normalized.is_empty() {
        return Vec::new();
    }

    let mut lines: Vec<PlayerMatchLine> = matches
        .iter()
        .filter_map(|m| {
            let seat = if normalize_player_name(&m.player1) == normalized {
                Seat::Player1
            } else if normalize_player_name(&m.player2) == normalized {
                Seat::Player2
            } else {
                return None;
            };
            let opponent = m.player(seat.opponent());
            Some(PlayerMatchLine {
                round: m.round,
                phase: classifier.phase(m.round),
                opponent: opponent.to_string(),
                opponent_archetype: index
                    .archetype_of(opponent)
                    .unwrap_or(UNKNOWN_ARCHETYPE)
                    .to_string(),
                player_wins: m.games_for(seat),
                opponent_wins: m.games_for(seat.opponent()),
                outcome: m.outcome_for(seat),
            })
        })
        .collect();

    lines.sort_by_key(|l| l.round);
    lines
}

/// Archetype performance rows from the precomputed analysis, limited to
/// archetypes with at least one recorded match.
pub fn archetype_summaries(analysis: &AnalysisData) -> Vec<ArchetypeSummaryRow> {
    analysis
        .archetype_stats
        .iter()
        .filter(|(_, stats)| stats.total_matches > 0)
        .map(|(archetype, stats)| ArchetypeSummaryRow {
            archetype: archetype.clone(),
            players: analysis.players_for(archetype),
            wins: stats.wins,
            losses: stats.losses,
            draws: stats.draws,
            games_won: stats.games_won,
            games_lost: stats.games_lost,
            win_rate: stats.win_rate,
            game_win_rate: stats.game_win_rate,
            total_matches: stats.total_matches,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArchetypeStats, Decklist, Outcome, Phase};
    use pretty_assertions::assert_eq;

    fn classifier() -> RoundClassifier {
        RoundClassifier::default()
    }

    fn sample_matches() -> Vec<MatchResult> {
        vec![
            MatchResult::new(1, "Smith, John", "Jane Doe", 2, 0),
            MatchResult::new(2, "jane doe", "Bob Ray", 1, 1),
            MatchResult::new(4, "John Smith", "Bob Ray", 0, 2),
            MatchResult::new(5, "Doe, Jane", "john smith", 2, 1),
            MatchResult::new(6, "Bob Ray", "Cat Lee", 2, 0),
            MatchResult::new(11, "john  smith", "Cat Lee", 1, 1),
        ]
    }

    fn sample_decks() -> Vec<Decklist> {
        vec![
            Decklist::new("John Smith", "Red Deck"),
            Decklist::new("Jane Doe", "Blue Deck"),
            Decklist::new("Ray, Bob", "Red Deck"),
        ]
    }

    #[test]
    fn test_constructed_only_example() {
        let matches = vec![MatchResult::new(1, "A", "B", 2, 0)];
        let c = classifier();

        let constructed = aggregate(&matches, player_subject("A"), |r| c.is_constructed_round(r));
        assert_eq!(constructed, Record::default());

        let all = aggregate(&matches, player_subject("A"), |_| true);
        assert_eq!(all.wins, 1);
        assert_eq!(all.losses, 0);
        assert_eq!(all.draws, 0);
        assert_eq!(all.total_matches, 1);
    }

    #[test]
    fn test_partition_conservation_for_players() {
        let matches = sample_matches();
        let c = classifier();

        for name in ["John Smith", "Jane Doe", "Bob Ray", "Cat Lee", "Nobody"] {
            let draft = aggregate(&matches, player_subject(name), |r| c.is_draft_round(r));
            let constructed =
                aggregate(&matches, player_subject(name), |r| c.is_constructed_round(r));
            let all = aggregate(&matches, player_subject(name), |_| true);
            assert_eq!(draft + constructed, all, "player {}", name);

            let partitioned = aggregate_partitioned(&matches, player_subject(name), &c);
            assert_eq!(partitioned.draft, draft);
            assert_eq!(partitioned.constructed, constructed);
            assert_eq!(partitioned.overall(), all);
        }
    }

    #[test]
    fn test_partition_conservation_for_archetypes() {
        let matches = sample_matches();
        let decks = sample_decks();
        let index = PlayerIndex::build(&decks);
        let c = classifier();

        for archetype in ["Red Deck", "Blue Deck", "Green Deck"] {
            let subject = archetype_subject(archetype, &index);
            let draft = aggregate(&matches, &subject, |r| c.is_draft_round(r));
            let constructed = aggregate(&matches, &subject, |r| c.is_constructed_round(r));
            let all = aggregate(&matches, &subject, |_| true);
            assert_eq!(draft + constructed, all, "archetype {}", archetype);
        }
    }

    #[test]
    fn test_player_record_counts_name_variants() {
        let matches = sample_matches();
        let record = aggregate(&matches, player_subject("SMITH, JOHN"), |_| true);

        // R1 win, R4 loss, R5 loss, R11 draw
        assert_eq!(record.wins, 1);
        assert_eq!(record.losses, 2);
        assert_eq!(record.draws, 1);
        assert_eq!(record.games_won, 2 + 0 + 1 + 1);
        assert_eq!(record.games_lost, 0 + 2 + 2 + 1);
        assert_eq!(record.total_matches, 4);
        assert!((record.win_rate() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_rates_defined_for_empty_input() {
        let record = aggregate(&[], player_subject("A"), |_| true);
        assert_eq!(record.win_rate(), 0.0);
        assert_eq!(record.game_win_rate(), 0.0);
    }

    #[test]
    fn test_rates_within_unit_interval() {
        let matches = sample_matches();
        for name in ["John Smith", "Jane Doe", "Bob Ray", "Cat Lee"] {
            let r = aggregate(&matches, player_subject(name), |_| true);
            assert!((0.0..=1.0).contains(&r.win_rate()));
            assert!((0.0..=1.0).contains(&r.game_win_rate()));
        }
    }

    #[test]
    fn test_blank_player_matches_nothing() {
        let matches = vec![MatchResult::new(4, "", "B", 2, 0)];
        let record = aggregate(&matches, player_subject("  "), |_| true);
        assert!(record.is_empty());
    }

    #[test]
    fn test_archetype_subject_excludes_mirrors() {
        let decks = sample_decks();
        let index = PlayerIndex::build(&decks);
        // John Smith and Bob Ray are both on Red Deck
        let matches = vec![MatchResult::new(4, "John Smith", "Bob Ray", 0, 2)];
        let record = aggregate(&matches, archetype_subject("Red Deck", &index), |_| true);
        assert!(record.is_empty());
    }

    #[test]
    fn test_player_records_constructed_only() {
        let matches = sample_matches();
        let decks = sample_decks();
        let index = PlayerIndex::build(&decks);
        let rows = player_records(&index, &matches, &classifier());

        assert_eq!(rows.len(), 3);
        let john = &rows[0];
        assert_eq!(john.player, "John Smith");
        // R4 loss, R5 loss, R11 draw
        assert_eq!(john.record.record.wins, 0);
        assert_eq!(john.record.record.losses, 2);
        assert_eq!(john.record.record.draws, 1);
        assert_eq!(john.record.record.total_matches, 3);

        let bob = &rows[2];
        assert_eq!(bob.player, "Ray, Bob");
        // R4 win, R6 win
        assert_eq!(bob.record.record.wins, 2);
        assert_eq!(bob.record.win_rate, 1.0);
    }

    #[test]
    fn test_archetype_player_records_filter() {
        let matches = sample_matches();
        let decks = sample_decks();
        let index = PlayerIndex::build(&decks);
        let rows = archetype_player_records(&index, &matches, &classifier(), "Red Deck");
        let names: Vec<_> = rows.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(names, vec!["John Smith", "Ray, Bob"]);
    }

    #[test]
    fn test_archetype_records_from_raw() {
        let matches = sample_matches();
        let decks = sample_decks();
        let index = PlayerIndex::build(&decks);
        let records = archetype_records(&index, &matches, &classifier());

        // Only R5 (Blue beats Red) is a constructed non-mirror match between
        // two known archetypes; R4 is a mirror and R6/R11 involve Cat Lee.
        assert_eq!(records.len(), 2);
        assert_eq!(records["Blue Deck"].wins, 1);
        assert_eq!(records["Red Deck"].losses, 1);
        assert_eq!(records["Red Deck"].games_won, 1);
        assert_eq!(records["Red Deck"].games_lost, 2);
    }

    #[test]
    fn test_player_matches_history() {
        let matches = sample_matches();
        let decks = sample_decks();
        let index = PlayerIndex::build(&decks);
        let lines = player_matches(&index, &matches, &classifier(), "Jane Doe");

        let rounds: Vec<_> = lines.iter().map(|l| l.round).collect();
        assert_eq!(rounds, vec![1, 2, 5]);

        assert_eq!(lines[0].phase, Phase::Draft);
        assert_eq!(lines[0].outcome, Outcome::Loss);
        assert_eq!(lines[0].opponent, "Smith, John");
        assert_eq!(lines[0].opponent_archetype, "Red Deck");

        assert_eq!(lines[1].outcome, Outcome::Draw);

        assert_eq!(lines[2].phase, Phase::Constructed);
        assert_eq!(lines[2].player_wins, 2);
        assert_eq!(lines[2].opponent_wins, 1);
    }

    #[test]
    fn test_player_matches_unknown_opponent() {
        let matches = sample_matches();
        let decks = sample_decks();
        let index = PlayerIndex::build(&decks);
        let lines = player_matches(&index, &matches, &classifier(), "Bob Ray");
        let cat = lines.iter().find(|l| l.opponent == "Cat Lee").unwrap();
        assert_eq!(cat.opponent_archetype, UNKNOWN_ARCHETYPE);
    }

    #[test]
    fn test_archetype_summaries_skip_empty() {
        let mut analysis = AnalysisData::default();
        analysis.archetype_counts.insert("Red Deck".to_string(), 3);
        analysis.archetype_stats.insert(
            "Red Deck".to_string(),
            ArchetypeStats {
                wins: 2,
                losses: 1,
                total_matches: 3,
                win_rate: 2.0 / 3.0,
                ..Default::default()
            },
        );
        analysis
            .archetype_stats
            .insert("Blue Deck".to_string(), ArchetypeStats::default());

        let rows = archetype_summaries(&analysis);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].archetype, "Red Deck");
        assert_eq!(rows[0].players, 3);
    }
}
