//! Derived statistics models.

use std::ops::Add;

use serde::{Deserialize, Serialize};

use super::{Outcome, Seat};

/// Ratio that is exactly 0 when the denominator is 0.
pub fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Ratio scaled to a percentage, 0 when the denominator is 0.
pub fn percentage(numerator: u32, denominator: u32) -> f64 {
    ratio(numerator, denominator) * 100.0
}

/// Tournament phase a round belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Draft,
    Constructed,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Draft => write!(f, "Draft"),
            Phase::Constructed => write!(f, "Constructed"),
        }
    }
}

/// Tournament day a round belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Day {
    Day1,
    Day2,
}

/// Match and game tallies for one subject (a player or an archetype).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub total_matches: u32,
}

impl Record {
    /// Fold one match into the record from `seat`'s perspective.
    pub fn add_match(&mut self, m: &super::MatchResult, seat: Seat) {
        match m.outcome_for(seat) {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Draw => self.draws += 1,
        }
        self.games_won += m.games_for(seat);
        self.games_lost += m.games_for(seat.opponent());
        self.total_matches += 1;
    }

    /// Match win rate; draws are excluded from numerator and denominator.
    pub fn win_rate(&self) -> f64 {
        ratio(self.wins, self.wins + self.losses)
    }

    /// Game win rate.
    pub fn game_win_rate(&self) -> f64 {
        ratio(self.games_won, self.games_won + self.games_lost)
    }

    /// "W-L" or "W-L-D" when draws occurred.
    pub fn match_record(&self) -> String {
        if self.draws > 0 {
            format!("{}-{}-{}", self.wins, self.losses, self.draws)
        } else {
            format!("{}-{}", self.wins, self.losses)
        }
    }

    /// "GW-GL".
    pub fn game_record(&self) -> String {
        format!("{}-{}", self.games_won, self.games_lost)
    }

    pub fn is_empty(&self) -> bool {
        self.total_matches == 0
    }

    /// Serializable view with the rates filled in.
    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            record: *self,
            win_rate: self.win_rate(),
            game_win_rate: self.game_win_rate(),
        }
    }
}

impl Add for Record {
    type Output = Record;

    fn add(self, rhs: Record) -> Record {
        Record {
            wins: self.wins + rhs.wins,
            losses: self.losses + rhs.losses,
            draws: self.draws + rhs.draws,
            games_won: self.games_won + rhs.games_won,
            games_lost: self.games_lost + rhs.games_lost,
            total_matches: self.total_matches + rhs.total_matches,
        }
    }
}

/// A record together with its derived rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecordSummary {
    #[serde(flatten)]
    pub record: Record,
    pub win_rate: f64,
    pub game_win_rate: f64,
}

/// Draft and constructed records for one subject, computed in a single pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionedRecord {
    pub draft: Record,
    pub constructed: Record,
}

impl PartitionedRecord {
    pub fn overall(&self) -> Record {
        self.draft + self.constructed
    }

    pub fn phase(&self, phase: Phase) -> &Record {
        match phase {
            Phase::Draft => &self.draft,
            Phase::Constructed => &self.constructed,
        }
    }

    pub fn phase_mut(&mut self, phase: Phase) -> &mut Record {
        match phase {
            Phase::Draft => &mut self.draft,
            Phase::Constructed => &mut self.constructed,
        }
    }
}

/// One row of the player table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRecord {
    /// Display name as registered on the decklist
    pub player: String,

    /// Archetype played
    pub archetype: String,

    /// Constructed-phase record
    #[serde(flatten)]
    pub record: RecordSummary,
}

/// One match from a single player's perspective.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerMatchLine {
    pub round: u32,
    pub phase: Phase,
    pub opponent: String,
    /// Opponent's archetype, "Unknown" when no decklist matched
    pub opponent_archetype: String,
    pub player_wins: u32,
    pub opponent_wins: u32,
    pub outcome: Outcome,
}

/// One row of the archetype performance table (precomputed record).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchetypeSummaryRow {
    pub archetype: String,
    pub players: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub win_rate: f64,
    pub game_win_rate: f64,
    pub total_matches: u32,
}

/// Inclusion statistics for one card within a scope of decks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardStat {
    /// Card name
    pub name: String,

    /// Archetype the scope is limited to, `None` for the whole field
    pub archetype: Option<String>,

    pub main_deck_total: u32,
    /// Copies per deck in scope (decks without the card count as 0)
    pub main_deck_average: f64,
    pub main_deck_decks_included: u32,
    pub main_deck_percentage: f64,

    pub sideboard_total: u32,
    pub sideboard_average: f64,
    pub sideboard_decks_included: u32,
    pub sideboard_percentage: f64,

    /// Main deck plus sideboard copies
    pub total_copies: u32,

    /// Decks with at least one copy in either board
    pub decks_included: u32,

    /// Decks in scope (the denominator)
    pub total_decks: u32,

    /// decks_included / total_decks * 100
    pub percentage_included: f64,
}

/// Field-wide usage of one card (card table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardUsage {
    pub name: String,
    pub total_copies: u32,
    pub main_deck_copies: u32,
    pub sideboard_copies: u32,
    pub decks_included: u32,
}

/// Day-1 vs day-2 representation of one archetype.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchetypeMetagameRow {
    pub archetype: String,
    pub day1_players: u32,
    pub day1_percentage: f64,
    pub day2_players: u32,
    pub day2_percentage: f64,
    /// day2_players / day1_players * 100, 0 when day1_players is 0
    pub conversion_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchResult;

    #[test]
    fn test_rates_zero_when_empty() {
        let r = Record::default();
        assert_eq!(r.win_rate(), 0.0);
        assert_eq!(r.game_win_rate(), 0.0);
        assert!(r.is_empty());
    }

    #[test]
    fn test_draws_do_not_affect_win_rate() {
        let r = Record {
            wins: 3,
            losses: 1,
            draws: 4,
            games_won: 7,
            games_lost: 7,
            total_matches: 8,
        };
        assert_eq!(r.win_rate(), 0.75);
        assert_eq!(r.game_win_rate(), 0.5);
    }

    #[test]
    fn test_only_draws_gives_zero_win_rate() {
        let r = Record {
            draws: 2,
            games_won: 2,
            games_lost: 2,
            total_matches: 2,
            ..Default::default()
        };
        assert_eq!(r.win_rate(), 0.0);
    }

    #[test]
    fn test_add_match_orients_to_seat() {
        let m = MatchResult::new(4, "Alice", "Bob", 2, 1);
        let mut alice = Record::default();
        let mut bob = Record::default();
        alice.add_match(&m, Seat::Player1);
        bob.add_match(&m, Seat::Player2);

        assert_eq!(alice.wins, 1);
        assert_eq!(alice.games_won, 2);
        assert_eq!(alice.games_lost, 1);
        assert_eq!(bob.losses, 1);
        assert_eq!(bob.games_won, 1);
        assert_eq!(bob.games_lost, 2);
    }

    #[test]
    fn test_record_strings() {
        let mut r = Record {
            wins: 5,
            losses: 2,
            games_won: 11,
            games_lost: 6,
            total_matches: 7,
            ..Default::default()
        };
        assert_eq!(r.match_record(), "5-2");
        assert_eq!(r.game_record(), "11-6");
        r.draws = 1;
        assert_eq!(r.match_record(), "5-2-1");
    }

    #[test]
    fn test_partitioned_overall_is_sum() {
        let p = PartitionedRecord {
            draft: Record {
                wins: 2,
                losses: 1,
                games_won: 4,
                games_lost: 2,
                total_matches: 3,
                ..Default::default()
            },
            constructed: Record {
                wins: 1,
                draws: 1,
                games_won: 3,
                games_lost: 1,
                total_matches: 2,
                ..Default::default()
            },
        };
        let overall = p.overall();
        assert_eq!(overall.wins, 3);
        assert_eq!(overall.draws, 1);
        assert_eq!(overall.total_matches, 5);
        assert_eq!(*p.phase(Phase::Draft), p.draft);
    }

    #[test]
    fn test_record_summary_serializes_flat() {
        let r = Record {
            wins: 1,
            losses: 1,
            games_won: 2,
            games_lost: 2,
            total_matches: 2,
            ..Default::default()
        };
        let json = serde_json::to_value(r.summary()).unwrap();
        assert_eq!(json["wins"], 1);
        assert_eq!(json["win_rate"], 0.5);
    }

    #[test]
    fn test_percentage_helper() {
        assert_eq!(percentage(1, 4), 25.0);
        assert_eq!(percentage(3, 0), 0.0);
    }
}
