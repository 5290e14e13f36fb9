#![allow(dead_code)]

use sign_hand::{
    ActuatorSink, DisplaySink, FixedChooser, Gesture, HandConfig, HandController, JointVector,
};

#[derive(Default)]
pub struct RecordingActuator {
    pub applied: Vec<JointVector>,
}

impl ActuatorSink for RecordingActuator {
    fn apply(&mut self, pose: &JointVector) {
        self.applied.push(pose.clone());
    }
}

#[derive(Default)]
pub struct RecordingDisplay {
    pub frames: Vec<Vec<String>>,
    pub echoes: Vec<String>,
}

impl RecordingDisplay {
    pub fn last(&self) -> &[String] {
        self.frames.last().map(Vec::as_slice).unwrap_or_default()
    }
}

impl DisplaySink for RecordingDisplay {
    fn render(&mut self, lines: &[String]) {
        self.frames.push(lines.to_vec());
    }

    fn echo(&mut self, text: &str) {
        self.echoes.push(text.to_string());
    }
}

pub type TestHand = HandController<RecordingActuator, RecordingDisplay>;

pub fn setup(config: HandConfig) -> TestHand {
    HandController::new(config, RecordingActuator::default(), RecordingDisplay::default())
        .unwrap()
}

/// A controller in game mode whose own picks follow `script`.
pub fn game_hand(script: &[Gesture]) -> TestHand {
    let mut hand = setup(HandConfig::default()).with_chooser(FixedChooser::new(script));
    hand.on_mode_toggle();
    hand.on_mode_toggle();
    hand
}
