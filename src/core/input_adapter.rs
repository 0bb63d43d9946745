use glam::Vec3;
use log::warn;
use serde::Deserialize;

use crate::landmarks::HandLandmarks;

/// Raw per-frame output of a hand detector: zero or more hands of raw points
/// Mirrors what detector bindings hand back before any validation
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DetectorFrame {
    #[serde(default)]
    pub hands: Vec<Vec<Vec3>>,
}

impl DetectorFrame {
    /// Frame with no hands
    pub fn empty() -> Self {
        Self::default()
    }

    /// Frame with a single already-validated hand
    pub fn single(hand: &HandLandmarks) -> Self {
        Self {
            hands: vec![hand.points().to_vec()],
        }
    }

    /// First reported hand, validated
    ///
    /// The scene follows one hand only. Malformed detector output is logged
    /// and degrades to "no hand" rather than reaching the classifier.
    pub fn primary_hand(&self) -> Option<HandLandmarks> {
        let raw = self.hands.first()?;
        match HandLandmarks::from_vec3s(raw) {
            Ok(hand) => Some(hand),
            Err(e) => {
                warn!("dropping detector hand: {e}");
                None
            }
        }
    }
}

/// One detector frame stamped with its capture time
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerFrame {
    pub t_ms: u64,
    pub detection: DetectorFrame,
}
