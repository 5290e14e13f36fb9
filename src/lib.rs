//! # sign-hand
//!
//! Control core for an actuated robotic hand with three modes: fingerspelling
//! letters, mirroring streamed joint angles, and playing rock-paper-scissors
//! against a counterpart.
//!
//! It decouples the *protocol* (one shared text stream, three grammars) from
//! the *hardware* (servos, display), which sit behind the [`ActuatorSink`]
//! and [`DisplaySink`] traits. Everything in between (parsing, pose
//! resolution, mode switching, turn handshake and scoring) lives in
//! [`HandController`] and can be exercised without a device.

pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod input;
pub mod landmarks;
pub mod pose;
pub mod sink;

pub use command::*;
pub use config::*;
pub use controller::*;
pub use error::*;
pub use game::*;
pub use input::*;
pub use landmarks::*;
pub use pose::*;
pub use sink::*;
