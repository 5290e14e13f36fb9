use crate::error::PoseTableError;
use crate::game::Gesture;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Number of letters in the fingerspelling alphabet.
pub const ALPHABET_LEN: usize = 26;

/// Angle every profile treats as the resting middle of a joint's travel.
pub const NEUTRAL_ANGLE: u16 = 90;

/// A complete target pose: one angle in degrees per actuated joint.
///
/// Vectors are immutable once built. The controller only forwards vectors
/// whose length and range match the active profile.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JointVector(Vec<u16>);

impl JointVector {
    pub fn new(angles: impl Into<Vec<u16>>) -> Self {
        Self(angles.into())
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for JointVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, angle) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{angle}")?;
        }
        Ok(())
    }
}

/// Wiring profile of the physical hand.
///
/// The two revisions disagree on joint count and on which end of the travel
/// means "extended", so each carries its own table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// Thumb, index, middle, ring, pinky, wrist, base. 90 = extended, 0 = curled.
    #[default]
    SevenAxis,
    /// Thumb, index, middle, ring, pinky, wrist. 0 = extended, 180 = curled.
    /// Has no pose for 'U'.
    SixAxis,
}

impl Profile {
    pub fn joint_count(self) -> usize {
        self.joint_names().len()
    }

    pub fn joint_names(self) -> &'static [&'static str] {
        match self {
            Self::SevenAxis => &["thumb", "index", "middle", "ring", "pinky", "wrist", "base"],
            Self::SixAxis => &["thumb", "index", "middle", "ring", "pinky", "wrist"],
        }
    }

    pub fn max_angle(self) -> u16 {
        180
    }

    /// Finger angle for a straightened finger.
    pub fn extended_angle(self) -> u16 {
        match self {
            Self::SevenAxis => 90,
            Self::SixAxis => 0,
        }
    }

    /// Finger angle for a fully curled finger.
    pub fn curled_angle(self) -> u16 {
        match self {
            Self::SevenAxis => 0,
            Self::SixAxis => 180,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::SevenAxis => "seven_axis",
            Self::SixAxis => "six_axis",
        }
    }

    fn builtin_spec(self) -> PoseTableSpec {
        let (letters, rock, paper, scissors): (&[(char, &[u16])], &[u16], &[u16], &[u16]) =
            match self {
                Self::SevenAxis => (
                    SEVEN_AXIS_LETTERS,
                    &[0, 0, 0, 0, 0, 90, 90],
                    &[90, 90, 90, 90, 90, 90, 90],
                    &[0, 90, 90, 0, 0, 90, 90],
                ),
                Self::SixAxis => (
                    SIX_AXIS_LETTERS,
                    &[180, 180, 180, 180, 180, 90],
                    &[0, 0, 0, 0, 0, 90],
                    &[180, 0, 0, 180, 180, 90],
                ),
            };

        PoseTableSpec {
            joints: self.joint_count(),
            max_angle: self.max_angle(),
            letters: letters
                .iter()
                .map(|(c, angles)| (c.to_string(), angles.to_vec()))
                .collect(),
            rock: rock.to_vec(),
            paper: paper.to_vec(),
            scissors: scissors.to_vec(),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Serialized form of a pose table, as it appears under `[table]` in a
/// config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseTableSpec {
    pub joints: usize,
    #[serde(default = "default_max_angle")]
    pub max_angle: u16,
    /// Letter poses keyed by the uppercase letter. Missing letters are gaps.
    pub letters: BTreeMap<String, Vec<u16>>,
    pub rock: Vec<u16>,
    pub paper: Vec<u16>,
    pub scissors: Vec<u16>,
}

fn default_max_angle() -> u16 {
    180
}

/// Read-only mapping from letters and gestures to poses.
///
/// Every entry has been checked for joint count and range, so anything the
/// table hands out can go straight to the actuator.
#[derive(Clone, Debug)]
pub struct PoseTable {
    joints: usize,
    max_angle: u16,
    letters: [Option<JointVector>; ALPHABET_LEN],
    gestures: [JointVector; 3],
}

impl PoseTable {
    /// The compiled-in table for `profile`.
    pub fn builtin(profile: Profile) -> Result<Self, PoseTableError> {
        Self::from_spec(&profile.builtin_spec())
    }

    /// Validates `spec` and builds a table from it.
    pub fn from_spec(spec: &PoseTableSpec) -> Result<Self, PoseTableError> {
        if !(6..=7).contains(&spec.joints) {
            return Err(PoseTableError::UnsupportedJointCount(spec.joints));
        }

        let check = |key: &str, angles: &[u16]| -> Result<JointVector, PoseTableError> {
            if angles.len() != spec.joints {
                return Err(PoseTableError::WrongJointCount {
                    key: key.to_string(),
                    expected: spec.joints,
                    found: angles.len(),
                });
            }
            if let Some((joint, &angle)) = angles
                .iter()
                .enumerate()
                .find(|&(_, &a)| a > spec.max_angle)
            {
                return Err(PoseTableError::AngleOutOfRange {
                    key: key.to_string(),
                    joint,
                    angle,
                    max: spec.max_angle,
                });
            }
            Ok(JointVector::new(angles))
        };

        let mut letters: [Option<JointVector>; ALPHABET_LEN] = std::array::from_fn(|_| None);
        for (key, angles) in &spec.letters {
            let idx = letter_index_of_key(key)
                .ok_or_else(|| PoseTableError::InvalidLetterKey(key.clone()))?;
            letters[idx] = Some(check(key, angles)?);
        }

        let gestures = [
            check(Gesture::Rock.name(), &spec.rock)?,
            check(Gesture::Paper.name(), &spec.paper)?,
            check(Gesture::Scissors.name(), &spec.scissors)?,
        ];

        Ok(Self {
            joints: spec.joints,
            max_angle: spec.max_angle,
            letters,
            gestures,
        })
    }

    pub fn joint_count(&self) -> usize {
        self.joints
    }

    pub fn max_angle(&self) -> u16 {
        self.max_angle
    }

    /// Whether the table defines a pose for `letter`.
    pub fn covers(&self, letter: char) -> bool {
        self.lookup_letter(letter).is_some()
    }

    /// Pose for an uppercase letter, or `None` for gaps and non-letters.
    pub fn lookup_letter(&self, letter: char) -> Option<&JointVector> {
        let idx = (letter as u32).checked_sub('A' as u32)? as usize;
        self.letters.get(idx)?.as_ref()
    }

    pub fn lookup_gesture(&self, gesture: Gesture) -> &JointVector {
        &self.gestures[gesture as usize]
    }
}

fn letter_index_of_key(key: &str) -> Option<usize> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c @ 'A'..='Z'), None) => Some(c as usize - 'A' as usize),
        _ => None,
    }
}

const SEVEN_AXIS_LETTERS: &[(char, &[u16])] = &[
    ('A', &[90, 90, 90, 90, 90, 90, 90]),
    ('B', &[90, 0, 0, 90, 90, 90, 90]),
    ('C', &[0, 0, 90, 90, 90, 90, 90]),
    ('D', &[90, 0, 90, 90, 90, 90, 90]),
    ('E', &[0, 90, 90, 90, 90, 90, 90]),
    ('F', &[0, 0, 0, 90, 90, 90, 90]),
    ('G', &[90, 90, 0, 90, 90, 90, 90]),
    ('H', &[90, 0, 0, 0, 90, 90, 90]),
    ('I', &[90, 90, 0, 0, 90, 90, 90]),
    ('J', &[90, 90, 0, 0, 0, 90, 90]),
    ('K', &[90, 0, 90, 90, 0, 90, 90]),
    ('L', &[90, 90, 90, 0, 90, 90, 90]),
    ('M', &[0, 0, 0, 0, 90, 90, 90]),
    ('N', &[0, 0, 0, 90, 90, 90, 90]),
    ('O', &[0, 0, 90, 90, 90, 90, 90]),
    ('P', &[0, 0, 0, 0, 0, 90, 90]),
    ('Q', &[0, 0, 90, 0, 90, 90, 90]),
    ('R', &[90, 0, 0, 90, 0, 90, 90]),
    ('S', &[90, 90, 90, 90, 0, 90, 90]),
    ('T', &[90, 90, 90, 90, 0, 0, 90]),
    ('U', &[90, 0, 0, 0, 0, 90, 90]),
    ('V', &[90, 0, 0, 0, 90, 90, 90]),
    ('W', &[90, 0, 0, 90, 90, 90, 90]),
    ('X', &[90, 90, 0, 0, 0, 90, 90]),
    ('Y', &[90, 0, 0, 90, 0, 90, 90]),
    ('Z', &[90, 90, 90, 90, 0, 0, 90]),
];

// 'U' is intentionally absent.
const SIX_AXIS_LETTERS: &[(char, &[u16])] = &[
    ('A', &[0, 0, 0, 0, 0, 90]),
    ('B', &[0, 180, 180, 0, 0, 90]),
    ('C', &[180, 180, 0, 0, 0, 90]),
    ('D', &[0, 180, 0, 0, 0, 90]),
    ('E', &[180, 0, 0, 0, 0, 90]),
    ('F', &[180, 180, 180, 0, 0, 90]),
    ('G', &[0, 0, 180, 0, 0, 90]),
    ('H', &[0, 180, 180, 180, 0, 90]),
    ('I', &[0, 0, 180, 180, 0, 90]),
    ('J', &[0, 0, 180, 180, 180, 90]),
    ('K', &[0, 180, 0, 0, 180, 90]),
    ('L', &[0, 0, 0, 180, 0, 90]),
    ('M', &[180, 180, 180, 180, 0, 90]),
    ('N', &[180, 180, 180, 0, 0, 90]),
    ('O', &[180, 180, 0, 0, 0, 90]),
    ('P', &[180, 180, 180, 180, 180, 90]),
    ('Q', &[180, 180, 0, 180, 0, 90]),
    ('R', &[0, 180, 180, 0, 180, 90]),
    ('S', &[0, 0, 0, 0, 180, 90]),
    ('T', &[0, 0, 0, 0, 180, 0]),
    ('V', &[0, 180, 180, 180, 0, 90]),
    ('W', &[0, 180, 180, 0, 0, 90]),
    ('X', &[0, 0, 180, 180, 180, 90]),
    ('Y', &[0, 180, 180, 0, 180, 90]),
    ('Z', &[0, 0, 0, 0, 180, 0]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_validate() {
        let seven = PoseTable::builtin(Profile::SevenAxis).unwrap();
        assert_eq!(seven.joint_count(), 7);
        assert!(('A'..='Z').all(|c| seven.covers(c)));

        let six = PoseTable::builtin(Profile::SixAxis).unwrap();
        assert_eq!(six.joint_count(), 6);
        assert!(!six.covers('U'));
        assert_eq!(('A'..='Z').filter(|&c| six.covers(c)).count(), 25);
    }

    #[test]
    fn lookup_rejects_non_letters() {
        let table = PoseTable::builtin(Profile::SevenAxis).unwrap();
        assert!(table.lookup_letter('a').is_none());
        assert!(table.lookup_letter('1').is_none());
        assert!(table.lookup_letter('[').is_none());
    }

    #[test]
    fn wrong_length_entry_is_rejected() {
        let mut spec = Profile::SevenAxis.builtin_spec();
        spec.letters.insert("Q".into(), vec![90, 90, 90]);
        assert_eq!(
            PoseTable::from_spec(&spec).unwrap_err(),
            PoseTableError::WrongJointCount {
                key: "Q".into(),
                expected: 7,
                found: 3
            }
        );
    }

    #[test]
    fn out_of_range_entry_is_rejected() {
        let mut spec = Profile::SixAxis.builtin_spec();
        spec.rock = vec![0, 0, 0, 0, 200, 90];
        assert!(matches!(
            PoseTable::from_spec(&spec),
            Err(PoseTableError::AngleOutOfRange { joint: 4, angle: 200, .. })
        ));
    }

    #[test]
    fn lowercase_keys_are_rejected() {
        let mut spec = Profile::SevenAxis.builtin_spec();
        spec.letters.insert("a".into(), vec![90; 7]);
        assert_eq!(
            PoseTable::from_spec(&spec).unwrap_err(),
            PoseTableError::InvalidLetterKey("a".into())
        );
    }

    #[test]
    fn joint_vector_displays_comma_separated() {
        assert_eq!(JointVector::new([90, 0, 180]).to_string(), "90,0,180");
    }
}
