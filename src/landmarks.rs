use glam::{Vec2, Vec3};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Number of points the hand detector reports per hand
pub const LANDMARK_COUNT: usize = 21;

/// Named hand joints, indexed the way hand detectors emit them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Joint {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl Joint {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// The five fingers, thumb first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    pub const fn tip(self) -> Joint {
        match self {
            Finger::Thumb => Joint::ThumbTip,
            Finger::Index => Joint::IndexTip,
            Finger::Middle => Joint::MiddleTip,
            Finger::Ring => Joint::RingTip,
            Finger::Pinky => Joint::PinkyTip,
        }
    }

    /// Joint the tip is compared against when deciding if the finger is open.
    /// The thumb has no PIP, so its MCP plays that role.
    pub const fn proximal(self) -> Joint {
        match self {
            Finger::Thumb => Joint::ThumbMcp,
            Finger::Index => Joint::IndexPip,
            Finger::Middle => Joint::MiddlePip,
            Finger::Ring => Joint::RingPip,
            Finger::Pinky => Joint::PinkyPip,
        }
    }
}

/// Rejected detector output
#[derive(Debug, Error, PartialEq)]
pub enum LandmarkError {
    #[error("expected 21 landmarks, got {0}")]
    WrongCount(usize),
    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
    #[error("landmark {index} has {len} components, expected 2 or 3")]
    RowLength { index: usize, len: usize },
}

/// One hand's 21 landmarks in normalized camera space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandLandmarks {
    points: [Vec3; LANDMARK_COUNT],
}

impl HandLandmarks {
    /// Validate a detector point list
    pub fn from_vec3s(points: &[Vec3]) -> Result<Self, LandmarkError> {
        if points.len() != LANDMARK_COUNT {
            return Err(LandmarkError::WrongCount(points.len()));
        }
        let mut out = [Vec3::ZERO; LANDMARK_COUNT];
        for (index, (slot, p)) in out.iter_mut().zip(points).enumerate() {
            if !p.is_finite() {
                return Err(LandmarkError::NonFinite { index });
            }
            *slot = *p;
        }
        Ok(Self { points: out })
    }

    /// Accepts `[x, y]` or `[x, y, z]` rows; missing z is 0
    pub fn from_points(rows: &[Vec<f32>]) -> Result<Self, LandmarkError> {
        if rows.len() != LANDMARK_COUNT {
            return Err(LandmarkError::WrongCount(rows.len()));
        }
        let mut points = [Vec3::ZERO; LANDMARK_COUNT];
        for (index, (slot, row)) in points.iter_mut().zip(rows).enumerate() {
            *slot = match row.as_slice() {
                &[x, y] => Vec3::new(x, y, 0.0),
                &[x, y, z] => Vec3::new(x, y, z),
                _ => {
                    return Err(LandmarkError::RowLength {
                        index,
                        len: row.len(),
                    })
                }
            };
        }
        Self::from_vec3s(&points)
    }

    pub fn point(&self, joint: Joint) -> Vec3 {
        self.points[joint.index()]
    }

    pub fn points(&self) -> &[Vec3; LANDMARK_COUNT] {
        &self.points
    }

    /// Planar distance between two joints; detector depth is too noisy to use
    pub fn distance(&self, a: Joint, b: Joint) -> f32 {
        self.point(a).truncate().distance(self.point(b).truncate())
    }

    /// Wrist to middle knuckle, a proxy for how close the hand is to the camera
    pub fn hand_size(&self) -> f32 {
        self.distance(Joint::Wrist, Joint::MiddleMcp)
    }

    /// Reference point of the hand (middle knuckle)
    pub fn center(&self) -> Vec2 {
        self.point(Joint::MiddleMcp).truncate()
    }

    /// Hand position mapped to [-1, 1] with y pointing up
    pub fn normalized_position(&self) -> Vec2 {
        let c = self.center();
        Vec2::new((c.x - 0.5) * 2.0, -(c.y - 0.5) * 2.0)
    }

    /// Rotation velocity requested by the hand, roughly [-2, 2]
    pub fn rotation_signal(&self) -> f32 {
        -(self.center().x - 0.5) * 4.0
    }
}

impl<'de> Deserialize<'de> for HandLandmarks {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<Vec<f32>>::deserialize(deserializer)?;
        HandLandmarks::from_points(&rows).map_err(serde::de::Error::custom)
    }
}

impl serde::Serialize for HandLandmarks {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let rows: Vec<[f32; 3]> = self.points.iter().map(|p| p.to_array()).collect();
        rows.serialize(serializer)
    }
}
