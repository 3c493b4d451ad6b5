//! Round classification: draft vs constructed, day 1 vs day 2.

use std::collections::BTreeSet;

use crate::config::TournamentConfig;
use crate::models::{Day, Phase};

/// Classifies round numbers using the configured event structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundClassifier {
    draft_rounds: BTreeSet<u32>,
    day2_start_round: u32,
}

impl RoundClassifier {
    pub fn new(draft_rounds: impl IntoIterator<Item = u32>, day2_start_round: u32) -> Self {
        Self {
            draft_rounds: draft_rounds.into_iter().collect(),
            day2_start_round,
        }
    }

    pub fn from_config(config: &TournamentConfig) -> Self {
        Self::new(config.draft_rounds.iter().copied(), config.day2_start_round)
    }

    pub fn is_draft_round(&self, round: u32) -> bool {
        self.draft_rounds.contains(&round)
    }

    pub fn is_constructed_round(&self, round: u32) -> bool {
        !self.is_draft_round(round)
    }

    pub fn is_day2_round(&self, round: u32) -> bool {
        round >= self.day2_start_round
    }

    pub fn phase(&self, round: u32) -> Phase {
        if self.is_draft_round(round) {
            Phase::Draft
        } else {
            Phase::Constructed
        }
    }

    pub fn day(&self, round: u32) -> Day {
        if self.is_day2_round(round) {
            Day::Day2
        } else {
            Day::Day1
        }
    }

    pub fn day2_start_round(&self) -> u32 {
        self.day2_start_round
    }

    pub fn draft_rounds(&self) -> impl Iterator<Item = u32> + '_ {
        self.draft_rounds.iter().copied()
    }
}

impl Default for RoundClassifier {
    fn default() -> Self {
        Self::from_config(&TournamentConfig::default())
    }
}
