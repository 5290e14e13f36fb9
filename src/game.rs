//! Rock-paper-scissors turn resolution and scoring.
//!
//! [`GameEngine`] owns the score and the two-phase handshake used when the
//! counterpart supplies its gesture on a separate line. The engine never
//! blocks: a pending handshake carries a deadline and is expired by
//! [`GameEngine::expire`] from the control loop.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, info};

/// A symbolic game choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    Rock = 0,
    Paper = 1,
    Scissors = 2,
}

impl Gesture {
    pub const ALL: [Gesture; 3] = [Gesture::Rock, Gesture::Paper, Gesture::Scissors];

    pub fn name(self) -> &'static str {
        match self {
            Self::Rock => "rock",
            Self::Paper => "paper",
            Self::Scissors => "scissors",
        }
    }

    /// Rock beats scissors, scissors beats paper, paper beats rock.
    pub fn beats(self, other: Gesture) -> bool {
        matches!(
            (self, other),
            (Self::Rock, Self::Scissors) | (Self::Scissors, Self::Paper) | (Self::Paper, Self::Rock)
        )
    }
}

impl FromStr for Gesture {
    type Err = ();

    /// Exact, lowercase match only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rock" => Ok(Self::Rock),
            "paper" => Ok(Self::Paper),
            "scissors" => Ok(Self::Scissors),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a single round from the user's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    UserWin,
    HandWin,
    Draw,
}

impl Outcome {
    pub fn resolve(user: Gesture, hand: Gesture) -> Self {
        if user == hand {
            Self::Draw
        } else if user.beats(hand) {
            Self::UserWin
        } else {
            Self::HandWin
        }
    }

    pub fn status_text(self) -> &'static str {
        match self {
            Self::UserWin => "You win this round!",
            Self::HandWin => "Hand wins this round!",
            Self::Draw => "It's a draw!",
        }
    }
}

/// The side that reached the win threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    User,
    Hand,
}

impl Side {
    pub fn banner(self) -> &'static str {
        match self {
            Self::User => "You won the game!",
            Self::Hand => "Hand wins the game!",
        }
    }
}

/// Running score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub user_score: u32,
    pub hand_score: u32,
}

impl GameState {
    pub fn new(user_score: u32, hand_score: u32) -> Self {
        Self {
            user_score,
            hand_score,
        }
    }

    fn winner(&self, threshold: u32) -> Option<Side> {
        if self.user_score >= threshold {
            Some(Side::User)
        } else if self.hand_score >= threshold {
            Some(Side::Hand)
        } else {
            None
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "You: {}  Hand: {}", self.user_score, self.hand_score)
    }
}

/// Where the turn handshake currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handshake {
    AwaitingUser,
    /// The user has played; the counterpart's gesture is due by `deadline`.
    AwaitingHand { user: Gesture, deadline: Instant },
}

/// Everything the controller needs to report a finished round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundReport {
    pub user: Gesture,
    pub hand: Gesture,
    pub outcome: Outcome,
    /// Score right after the round, before any terminal reset.
    pub score: GameState,
    /// Set when this round ended the game. The engine has already reset.
    pub winner: Option<Side>,
}

/// Picks the hand's gesture when the user plays without a counterpart.
pub trait GestureChooser {
    fn choose(&mut self) -> Gesture;
}

/// Uniformly random choice.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomChooser;

impl GestureChooser for RandomChooser {
    fn choose(&mut self) -> Gesture {
        Gesture::ALL[rand::rng().random_range(0..Gesture::ALL.len())]
    }
}

/// Plays a fixed script in a loop.
#[derive(Clone, Debug)]
pub struct FixedChooser {
    script: Vec<Gesture>,
    next: usize,
}

impl FixedChooser {
    /// An empty script always plays rock.
    pub fn new(script: impl Into<Vec<Gesture>>) -> Self {
        Self {
            script: script.into(),
            next: 0,
        }
    }
}

impl GestureChooser for FixedChooser {
    fn choose(&mut self) -> Gesture {
        if self.script.is_empty() {
            return Gesture::Rock;
        }
        let g = self.script[self.next % self.script.len()];
        self.next += 1;
        g
    }
}

/// Score keeping and handshake state for game mode.
#[derive(Clone, Debug)]
pub struct GameEngine {
    state: GameState,
    handshake: Handshake,
    win_threshold: u32,
}

impl GameEngine {
    pub fn new(win_threshold: u32) -> Self {
        Self {
            state: GameState::default(),
            handshake: Handshake::AwaitingUser,
            win_threshold: win_threshold.max(1),
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn handshake(&self) -> Handshake {
        self.handshake
    }

    pub fn win_threshold(&self) -> u32 {
        self.win_threshold
    }

    /// Zeroes the score and abandons any pending handshake.
    pub fn reset(&mut self) {
        self.state = GameState::default();
        self.handshake = Handshake::AwaitingUser;
    }

    /// Records the user's move and waits for the counterpart until `deadline`.
    ///
    /// A second `USER:` line while already waiting replaces the pending move.
    pub fn begin_handshake(&mut self, user: Gesture, deadline: Instant) {
        debug!(%user, "awaiting counterpart gesture");
        self.handshake = Handshake::AwaitingHand { user, deadline };
    }

    /// Takes the pending user move, returning to `AwaitingUser`.
    pub fn take_pending(&mut self) -> Option<Gesture> {
        match std::mem::replace(&mut self.handshake, Handshake::AwaitingUser) {
            Handshake::AwaitingHand { user, .. } => Some(user),
            Handshake::AwaitingUser => None,
        }
    }

    /// Drops a pending handshake whose deadline has passed.
    ///
    /// Returns `true` when a handshake was expired.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.handshake {
            Handshake::AwaitingHand { deadline, .. } if now >= deadline => {
                self.handshake = Handshake::AwaitingUser;
                true
            }
            _ => false,
        }
    }

    /// Scores one round and applies the terminal reset if someone won.
    pub fn play_round(&mut self, user: Gesture, hand: Gesture) -> RoundReport {
        let outcome = Outcome::resolve(user, hand);
        match outcome {
            Outcome::UserWin => self.state.user_score += 1,
            Outcome::HandWin => self.state.hand_score += 1,
            Outcome::Draw => {}
        }
        let score = self.state;
        let winner = self.finish_if_won();
        debug!(%user, %hand, ?outcome, %score, "round resolved");

        RoundReport {
            user,
            hand,
            outcome,
            score,
            winner,
        }
    }

    /// Overwrites the score with an externally reported pair.
    ///
    /// The report is authoritative. A pair at or above the threshold ends the
    /// game just like a scored round.
    pub fn apply_score_report(&mut self, reported: GameState) -> Option<Side> {
        self.state = reported;
        self.finish_if_won()
    }

    fn finish_if_won(&mut self) -> Option<Side> {
        let winner = self.state.winner(self.win_threshold)?;
        info!(?winner, score = %self.state, "game over");
        self.state = GameState::default();
        Some(winner)
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn beats_relation_is_a_cycle() {
        for g in Gesture::ALL {
            assert!(!g.beats(g));
            let beaten: Vec<_> = Gesture::ALL.into_iter().filter(|&o| g.beats(o)).collect();
            assert_eq!(beaten.len(), 1);
            assert!(!beaten[0].beats(g));
        }
    }

    #[test]
    fn third_win_resets_score() {
        let mut engine = GameEngine::default();
        engine.apply_score_report(GameState::new(2, 1));
        let report = engine.play_round(Gesture::Paper, Gesture::Rock);
        assert_eq!(report.score, GameState::new(3, 1));
        assert_eq!(report.winner, Some(Side::User));
        assert_eq!(engine.state(), GameState::default());
    }

    #[test]
    fn expire_only_after_deadline() {
        let now = Instant::now();
        let mut engine = GameEngine::default();
        engine.begin_handshake(Gesture::Rock, now + Duration::from_secs(1));
        assert!(!engine.expire(now));
        assert!(engine.expire(now + Duration::from_secs(1)));
        assert_eq!(engine.handshake(), Handshake::AwaitingUser);
        assert!(!engine.expire(now + Duration::from_secs(2)));
    }

    #[test]
    fn fixed_chooser_cycles() {
        let mut chooser = FixedChooser::new([Gesture::Rock, Gesture::Scissors]);
        assert_eq!(chooser.choose(), Gesture::Rock);
        assert_eq!(chooser.choose(), Gesture::Scissors);
        assert_eq!(chooser.choose(), Gesture::Rock);
    }
}
