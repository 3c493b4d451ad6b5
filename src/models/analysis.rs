//! Precomputed analysis export produced upstream of this crate: archetype
//! tallies, records and matchups.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A match as embedded in the precomputed per-archetype stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchInfo {
    pub round: u32,
    pub player1: String,
    pub player2: String,
    pub archetype1: String,
    pub archetype2: String,
    #[serde(default)]
    pub p1_wins: u32,
    #[serde(default)]
    pub p2_wins: u32,
}

/// Precomputed record for one archetype.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeStats {
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub draws: u32,
    #[serde(default)]
    pub games_won: u32,
    #[serde(default)]
    pub games_lost: u32,
    #[serde(default)]
    pub win_rate: f64,
    #[serde(default)]
    pub game_win_rate: f64,
    #[serde(default)]
    pub total_matches: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<MatchInfo>,
}

/// Precomputed head-to-head row for an unordered archetype pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchupStats {
    pub archetype1: String,
    pub archetype2: String,
    #[serde(default)]
    pub arch1_wins: u32,
    #[serde(default)]
    pub arch2_wins: u32,
    #[serde(default)]
    pub arch1_games: u32,
    #[serde(default)]
    pub arch2_games: u32,
    #[serde(default)]
    pub arch1_win_rate: f64,
    #[serde(default)]
    pub arch2_win_rate: f64,
    #[serde(default)]
    pub arch1_game_win_rate: f64,
    #[serde(default)]
    pub arch2_game_win_rate: f64,
    #[serde(default)]
    pub total_matches: u32,
}

/// The full analysis document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisData {
    /// Player tally per archetype (ground truth for the day-1 field)
    #[serde(default)]
    pub archetype_counts: BTreeMap<String, u32>,

    /// Record per archetype
    #[serde(default)]
    pub archetype_stats: BTreeMap<String, ArchetypeStats>,

    /// Matchup rows keyed arbitrarily by the producer
    #[serde(default)]
    pub matchup_stats: BTreeMap<String, MatchupStats>,

    #[serde(default)]
    pub total_players: u32,

    #[serde(default)]
    pub total_matches: u32,
}

impl AnalysisData {
    /// Sum of all archetype counts (registered decks).
    pub fn total_decks(&self) -> u32 {
        self.archetype_counts.values().sum()
    }

    /// Player count for an archetype, 0 when unknown.
    pub fn players_for(&self, archetype: &str) -> u32 {
        self.archetype_counts.get(archetype).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "archetype_counts": {"Red Deck": 3, "Blue Deck": 2},
        "archetype_stats": {
            "Red Deck": {
                "wins": 4, "losses": 2, "games_won": 9, "games_lost": 5,
                "win_rate": 0.667, "game_win_rate": 0.643, "total_matches": 6,
                "matches": []
            }
        },
        "matchup_stats": {
            "Blue Deck vs Red Deck": {
                "archetype1": "Red Deck", "archetype2": "Blue Deck",
                "arch1_wins": 3, "arch2_wins": 1, "arch1_games": 6, "arch2_games": 3,
                "arch1_win_rate": 0.75, "arch2_win_rate": 0.25,
                "arch1_game_win_rate": 0.667, "arch2_game_win_rate": 0.333,
                "total_matches": 4
            }
        },
        "total_players": 5,
        "total_matches": 12
    }"#;

    #[test]
    fn test_analysis_deserialize() {
        let data: AnalysisData = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(data.total_decks(), 5);
        assert_eq!(data.players_for("Blue Deck"), 2);
        assert_eq!(data.players_for("Green Deck"), 0);

        let red = &data.archetype_stats["Red Deck"];
        assert_eq!(red.draws, 0); // absent in export
        assert_eq!(red.total_matches, 6);
        assert_eq!(data.matchup_stats.len(), 1);
    }

    #[test]
    fn test_analysis_deserialize_empty_document() {
        let data: AnalysisData = serde_json::from_str("{}").unwrap();
        assert_eq!(data, AnalysisData::default());
    }
}
