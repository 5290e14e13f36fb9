//! Error taxonomy for the hand controller.
//!
//! [`CommandError`] covers everything that can go wrong with a single input
//! event. None of these are fatal: the controller drops the offending input,
//! keeps the previous pose and score, and shows a transient message.
//! [`PoseTableError`] and [`ConfigError`] only surface while constructing a
//! controller.

use thiserror::Error;

/// Why an input event was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// A letter or gesture outside the active domain, including letters a
    /// profile deliberately leaves out.
    #[error("unsupported symbol {0:?}")]
    UnsupportedSymbol(String),

    /// A mirror line that did not carry exactly one angle per joint.
    #[error("angle count mismatch: expected {expected}, found {found}")]
    MalformedVector { expected: usize, found: usize },

    /// A mirror angle above the profile's mechanical limit.
    #[error("angle {angle} on joint {joint} exceeds {max}")]
    AngleOutOfRange { joint: usize, angle: u32, max: u16 },

    /// A game-mode line that matches no known verb.
    #[error("unrecognized command {0:?}")]
    UnrecognizedCommand(String),

    /// A `SCORE:` line whose payload could not be parsed.
    #[error("malformed score report {0:?}")]
    MalformedScoreReport(String),

    /// The counterpart gesture did not arrive in time.
    #[error("counterpart gesture timed out")]
    HandshakeTimeout,
}

impl CommandError {
    /// Short text for the status line.
    pub fn status_text(&self) -> &'static str {
        match self {
            Self::UnsupportedSymbol(_) => "Invalid Letter",
            Self::MalformedVector { .. } => "Invalid Angles",
            Self::AngleOutOfRange { .. } => "Angle Out Of Range",
            Self::UnrecognizedCommand(_) => "Unknown Command",
            Self::MalformedScoreReport(_) => "Score Parse Failed",
            Self::HandshakeTimeout => "No Counterpart Move",
        }
    }
}

/// A pose table that fails validation at load time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoseTableError {
    #[error("entry {key} has {found} angles, profile declares {expected}")]
    WrongJointCount {
        key: String,
        expected: usize,
        found: usize,
    },

    #[error("entry {key} joint {joint} angle {angle} exceeds {max}")]
    AngleOutOfRange {
        key: String,
        joint: usize,
        angle: u16,
        max: u16,
    },

    #[error("table key {0:?} is not a letter A-Z")]
    InvalidLetterKey(String),

    #[error("table declares {0} joints, only 6 or 7 are supported")]
    UnsupportedJointCount(usize),
}

/// Failure while loading a [`HandConfig`](crate::HandConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Table(#[from] PoseTableError),
}
