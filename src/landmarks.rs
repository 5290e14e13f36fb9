//! Counterpart-side encoding of a tracked hand.
//!
//! A hand tracker reports 21 landmarks in image coordinates (x right, y
//! down, z depth). [`HandLandmarks`] turns them into what the controller's
//! input grammars expect: a game gesture, or a mirror-mode angle line.

use crate::game::Gesture;
use crate::pose::{NEUTRAL_ANGLE, Profile};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Number of landmarks in a tracked hand.
pub const LANDMARK_COUNT: usize = 21;

const WRIST: usize = 0;
/// Finger tips, thumb to pinky.
const TIPS: [usize; 5] = [4, 8, 12, 16, 20];
/// The joint each tip is compared against for curl, thumb to pinky.
const CURL_BASES: [usize; 5] = [3, 6, 10, 14, 18];

/// Vertical distance under which a tip counts as level with its base.
const HALF_CURL_BAND: f32 = 0.05;

/// 21 tracked hand landmarks. Deserializing any other count fails.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandLandmarks {
    points: [Vec3; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Vec3; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Returns `None` unless exactly 21 points are given.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        points.try_into().ok().map(Self::new)
    }

    pub fn point(&self, idx: usize) -> Option<Vec3> {
        self.points.get(idx).copied()
    }

    /// Reads the hand as rock, paper or scissors by comparing the four
    /// finger tips with the wrist. Ambiguous shapes yield `None`.
    pub fn classify_gesture(&self) -> Option<Gesture> {
        let wrist_y = self.points[WRIST].y;
        let raised: Vec<bool> = TIPS[1..]
            .iter()
            .map(|&tip| self.points[tip].y < wrist_y)
            .collect();
        let lowered: Vec<bool> = TIPS[1..]
            .iter()
            .map(|&tip| self.points[tip].y > wrist_y)
            .collect();

        if raised.iter().all(|&r| r) {
            Some(Gesture::Paper)
        } else if lowered.iter().all(|&l| l) {
            Some(Gesture::Rock)
        } else if raised[0] && raised[1] && lowered[2] && lowered[3] {
            Some(Gesture::Scissors)
        } else {
            None
        }
    }

    /// Curl of each finger, thumb to pinky: 0 when the tip is above its base
    /// joint, 90 when roughly level, 180 otherwise.
    pub fn finger_angles(&self) -> [u16; 5] {
        std::array::from_fn(|i| {
            let tip = self.points[TIPS[i]];
            let base = self.points[CURL_BASES[i]];
            if tip.y < base.y {
                0
            } else if (tip.y - base.y).abs() < HALF_CURL_BAND {
                90
            } else {
                180
            }
        })
    }

    /// Open (1) or closed (0) per finger, thumb to pinky. The thumb is judged
    /// sideways against its IP joint, the others vertically against the PIP
    /// joint.
    pub fn finger_states(&self) -> [u8; 5] {
        std::array::from_fn(|i| {
            let tip = self.points[TIPS[i]];
            let open = if i == 0 {
                tip.x < self.points[TIPS[0] - 1].x
            } else {
                tip.y < self.points[TIPS[i] - 2].y
            };
            u8::from(open)
        })
    }

    /// A mirror-mode input line for `profile`: finger curls rescaled to the
    /// profile's extended/curled convention, remaining joints held neutral.
    pub fn mirror_line(&self, profile: Profile) -> String {
        let extended = i32::from(profile.extended_angle());
        let curled = i32::from(profile.curled_angle());

        let fingers = self.finger_angles().map(|curl| {
            let angle = extended + (curled - extended) * i32::from(curl) / 180;
            angle.to_string()
        });

        let neutral = profile.joint_count().saturating_sub(fingers.len());
        fingers
            .into_iter()
            .chain(std::iter::repeat_n(NEUTRAL_ANGLE.to_string(), neutral))
            .collect::<Vec<_>>()
            .join(",")
    }
}
