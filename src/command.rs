//! Per-mode command grammars.
//!
//! All three grammars share one input stream. Which one applies is decided
//! by the active [`Mode`]; every branch ends in a typed [`Command`], with
//! rejected input carried as [`Command::Invalid`] rather than an early
//! return, so the controller can report it without touching any state.

use crate::error::CommandError;
use crate::game::{GameState, Gesture};
use crate::pose::{JointVector, PoseTable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating mode of the hand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Fingerspelling, one letter per byte.
    #[default]
    Spelling,
    /// Follows externally supplied joint angles.
    Mirror,
    /// Rock-paper-scissors against a counterpart.
    Game,
}

impl Mode {
    /// The mode the toggle button advances to.
    pub fn next(self) -> Self {
        match self {
            Self::Spelling => Self::Mirror,
            Self::Mirror => Self::Game,
            Self::Game => Self::Spelling,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Spelling => "ASL",
            Self::Mirror => "Mirror",
            Self::Game => "Game",
        }
    }

    /// Matches the serial mode-select words, ignoring case.
    pub fn from_keyword(word: &str) -> Option<Self> {
        const KEYWORDS: [(&str, Mode); 3] =
            [("ASL", Mode::Spelling), ("MIRROR", Mode::Mirror), ("GAME", Mode::Game)];
        KEYWORDS
            .iter()
            .find(|(kw, _)| kw.eq_ignore_ascii_case(word))
            .map(|&(_, mode)| mode)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed input event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Spell one letter.
    Letter(char),
    /// Move every joint to the given angles.
    AngleVector(JointVector),
    /// The user's move. With `handshake` set, the counterpart's move follows
    /// on its own line; otherwise the hand picks one itself.
    GameUserGesture { gesture: Gesture, handshake: bool },
    /// The counterpart's move completing a handshake.
    GameHandGesture(Gesture),
    /// Authoritative score from the counterpart.
    GameScoreReport(GameState),
    GameReset,
    /// Serial mode-select line.
    SelectMode(Mode),
    Invalid(CommandError),
}

impl Command {
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}

/// Lazy tokenizer yielding every run of ASCII digits in `text` as an
/// integer, in order. Anything that is not a digit separates runs.
///
/// Runs too long for a `u32` saturate, which any angle check then rejects.
#[derive(Clone, Debug)]
pub struct AngleTokens<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> AngleTokens<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }
}

impl Iterator for AngleTokens<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        while self.pos < self.bytes.len() && !self.bytes[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        if self.pos == self.bytes.len() {
            return None;
        }

        let mut value: u32 = 0;
        while let Some(&b) = self.bytes.get(self.pos) {
            if !b.is_ascii_digit() {
                break;
            }
            value = value.saturating_mul(10).saturating_add(u32::from(b - b'0'));
            self.pos += 1;
        }
        Some(value)
    }
}

/// Recognizes a serial mode-select line: `MODE:ASL`, `MODE:MIRROR` or
/// `MODE:GAME`, or the bare word when `allow_bare` is set.
pub fn parse_mode_select(line: &str, allow_bare: bool) -> Option<Command> {
    let line = line.trim();
    let word = match line.strip_prefix("MODE:") {
        Some(word) => word.trim(),
        None if allow_bare => line,
        None => return None,
    };
    Mode::from_keyword(word).map(Command::SelectMode)
}

/// Spelling grammar: one byte, one letter.
pub fn parse_letter(byte: u8, table: &PoseTable) -> Command {
    let c = char::from(byte);
    if c.is_ascii_uppercase() && table.covers(c) {
        Command::Letter(c)
    } else {
        Command::Invalid(CommandError::UnsupportedSymbol(c.to_string()))
    }
}

/// Splits a spelling line into one command per byte, dropping terminators.
pub fn parse_spelling(line: &str, table: &PoseTable) -> Vec<Command> {
    line.bytes()
        .filter(|b| !matches!(b, b'\r' | b'\n'))
        .map(|b| parse_letter(b, table))
        .collect()
}

/// Mirror grammar: exactly one angle per joint, embedded in arbitrary text.
pub fn parse_angles(line: &str, table: &PoseTable) -> Command {
    let expected = table.joint_count();
    let angles: Vec<u32> = AngleTokens::new(line).take(expected).collect();

    if angles.len() != expected {
        return Command::Invalid(CommandError::MalformedVector {
            expected,
            found: angles.len(),
        });
    }

    let max = table.max_angle();
    let mut checked = Vec::with_capacity(expected);
    for (joint, &angle) in angles.iter().enumerate() {
        match u16::try_from(angle) {
            Ok(a) if a <= max => checked.push(a),
            _ => return Command::Invalid(CommandError::AngleOutOfRange { joint, angle, max }),
        }
    }

    Command::AngleVector(JointVector::new(checked))
}

/// Game grammar.
///
/// `awaiting_hand` is set while a `USER:` handshake is pending; in that
/// phase any line other than `reset`, a score report or a fresh `USER:` move
/// is read as the counterpart's gesture.
pub fn parse_game(line: &str, awaiting_hand: bool) -> Command {
    let line = line.trim();

    if line == "reset" {
        return Command::GameReset;
    }
    if let Some(payload) = line.strip_prefix("SCORE:") {
        return parse_score(payload);
    }

    if awaiting_hand {
        // A fresh `USER:` line replaces the pending move.
        if let Some(cmd) = parse_user_move(line) {
            return cmd;
        }
        let gesture = line.strip_prefix("HAND:").unwrap_or(line).trim();
        return match gesture.parse() {
            Ok(g) => Command::GameHandGesture(g),
            Err(()) => Command::Invalid(CommandError::UnsupportedSymbol(gesture.to_string())),
        };
    }

    if let Ok(gesture) = line.parse() {
        return Command::GameUserGesture {
            gesture,
            handshake: false,
        };
    }
    parse_user_move(line)
        .unwrap_or_else(|| Command::Invalid(CommandError::UnrecognizedCommand(line.to_string())))
}

fn parse_user_move(line: &str) -> Option<Command> {
    let rest = line.strip_prefix("USER:")?.trim();
    Some(match rest.parse() {
        Ok(gesture) => Command::GameUserGesture {
            gesture,
            handshake: true,
        },
        Err(()) => Command::Invalid(CommandError::UnsupportedSymbol(rest.to_string())),
    })
}

fn parse_score(payload: &str) -> Command {
    let malformed = || Command::Invalid(CommandError::MalformedScoreReport(payload.to_string()));

    let Some((user, hand)) = payload.split_once(',') else {
        return malformed();
    };
    match (user.trim().parse::<u32>(), hand.trim().parse::<u32>()) {
        (Ok(u), Ok(h)) => Command::GameScoreReport(GameState::new(u, h)),
        _ => malformed(),
    }
}
