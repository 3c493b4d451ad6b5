//! Match result model: one completed round between two players.

use serde::{Deserialize, Serialize};

/// Which seat of a pairing a player occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    Player1,
    Player2,
}

impl Seat {
    /// The other seat in the same pairing.
    pub fn opponent(self) -> Self {
        match self {
            Seat::Player1 => Seat::Player2,
            Seat::Player2 => Seat::Player1,
        }
    }
}

/// Match outcome from one seat's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Win => write!(f, "W"),
            Outcome::Loss => write!(f, "L"),
            Outcome::Draw => write!(f, "D"),
        }
    }
}

/// A single best-of-N round result as exported by the tournament software.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Round number (1-based)
    pub round: u32,

    /// Player 1 display name
    pub player1: String,

    /// Player 2 display name
    pub player2: String,

    /// Games won by player 1
    #[serde(default)]
    pub p1_wins: u32,

    /// Games won by player 2
    #[serde(default)]
    pub p2_wins: u32,
}

impl MatchResult {
    pub fn new(
        round: u32,
        player1: impl Into<String>,
        player2: impl Into<String>,
        p1_wins: u32,
        p2_wins: u32,
    ) -> Self {
        Self {
            round,
            player1: player1.into(),
            player2: player2.into(),
            p1_wins,
            p2_wins,
        }
    }

    /// Display name of the player in `seat`.
    pub fn player(&self, seat: Seat) -> &str {
        match seat {
            Seat::Player1 => &self.player1,
            Seat::Player2 => &self.player2,
        }
    }

    /// Games won by the player in `seat`.
    pub fn games_for(&self, seat: Seat) -> u32 {
        match seat {
            Seat::Player1 => self.p1_wins,
            Seat::Player2 => self.p2_wins,
        }
    }

    /// Match outcome for the player in `seat`.
    pub fn outcome_for(&self, seat: Seat) -> Outcome {
        let own = self.games_for(seat);
        let theirs = self.games_for(seat.opponent());
        match own.cmp(&theirs) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Less => Outcome::Loss,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }
}
