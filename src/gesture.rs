use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::landmarks::{Finger, HandLandmarks, Joint};

/// Discrete hand gesture derived from one landmark snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    #[default]
    None,
    Fist,
    Open,
    Pinch,
    VSign,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Fist => "fist",
            Self::Open => "open",
            Self::Pinch => "pinch",
            Self::VSign => "v_sign",
        }
    }
}

/// Classifier thresholds, all in normalized frame units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureThresholds {
    /// Thumb tip to index tip distance below which the hand pinches
    pub pinch_threshold: f32,
    /// Pinch threshold used when the index reads as curled but the hand is not a fist
    pub pinch_threshold_relaxed: f32,
    /// Minimum index tip to middle tip spread for a V sign
    pub v_sign_min_separation: f32,
    /// Wrist to middle knuckle distance below which the hand is too far away
    pub min_hand_size: f32,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            pinch_threshold: 0.08,
            pinch_threshold_relaxed: 0.12,
            v_sign_min_separation: 0.05,
            min_hand_size: 0.05,
        }
    }
}

/// Open/closed flag per finger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FingerStates {
    open: [bool; 5],
}

impl FingerStates {
    /// A finger is open when its tip is farther from the wrist than its proximal joint
    pub fn measure(hand: &HandLandmarks) -> Self {
        let mut open = [false; 5];
        for (slot, finger) in open.iter_mut().zip(Finger::ALL) {
            let tip = hand.distance(Joint::Wrist, finger.tip());
            let proximal = hand.distance(Joint::Wrist, finger.proximal());
            *slot = tip > proximal;
        }
        Self { open }
    }

    pub fn is_open(&self, finger: Finger) -> bool {
        self.open[finger as usize]
    }

    pub fn open_count(&self) -> usize {
        self.open.iter().filter(|&&o| o).count()
    }
}

/// Classify a hand. Precedence: pinch, V sign, then open-finger count.
pub fn classify(hand: &HandLandmarks, thresholds: &GestureThresholds) -> Gesture {
    let fingers = FingerStates::measure(hand);

    // A thumb folded across a closed fist lands on the curled index tip
    let pinch_limit = if fingers.is_open(Finger::Index) {
        Some(thresholds.pinch_threshold)
    } else if fingers.open_count() > 1 {
        Some(thresholds.pinch_threshold_relaxed)
    } else {
        None
    };
    let pinch_distance = hand.distance(Joint::ThumbTip, Joint::IndexTip);
    if pinch_limit.is_some_and(|limit| pinch_distance < limit) {
        return Gesture::Pinch;
    }

    let v_pattern = fingers.is_open(Finger::Index)
        && fingers.is_open(Finger::Middle)
        && !fingers.is_open(Finger::Ring)
        && !fingers.is_open(Finger::Pinky);
    if v_pattern
        && hand.distance(Joint::IndexTip, Joint::MiddleTip) > thresholds.v_sign_min_separation
    {
        return Gesture::VSign;
    }

    match fingers.open_count() {
        0 | 1 => Gesture::Fist,
        n if n >= 4 => Gesture::Open,
        _ => Gesture::None,
    }
}

/// What the tracker saw in one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandObservation {
    /// No hand in the frame
    Lost,
    /// A hand was reported but is too small to classify reliably
    TooFar,
    Tracked {
        gesture: Gesture,
        position: Vec2,
        rotation: f32,
    },
}

impl HandObservation {
    pub fn is_tracking(&self) -> bool {
        matches!(self, Self::Tracked { .. })
    }

    pub fn gesture(&self) -> Gesture {
        match self {
            Self::Tracked { gesture, .. } => *gesture,
            _ => Gesture::None,
        }
    }
}

/// Turn an optional hand into an observation, treating distant hands as lost
pub fn observe(hand: Option<&HandLandmarks>, thresholds: &GestureThresholds) -> HandObservation {
    match hand {
        None => HandObservation::Lost,
        Some(h) if h.hand_size() < thresholds.min_hand_size => HandObservation::TooFar,
        Some(h) => HandObservation::Tracked {
            gesture: classify(h, thresholds),
            position: h.normalized_position(),
            rotation: h.rotation_signal(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::HandPose;

    fn classify_pose(pose: HandPose) -> Gesture {
        classify(&pose.at(0.5, 0.5), &GestureThresholds::default())
    }

    #[test]
    fn poses_classify() {
        assert_eq!(classify_pose(HandPose::Fist), Gesture::Fist);
        assert_eq!(classify_pose(HandPose::Open), Gesture::Open);
        assert_eq!(classify_pose(HandPose::Pinch), Gesture::Pinch);
        assert_eq!(classify_pose(HandPose::VSign), Gesture::VSign);
        assert_eq!(classify_pose(HandPose::Relaxed), Gesture::None);
    }

    #[test]
    fn finger_counts() {
        let open = FingerStates::measure(&HandPose::Open.at(0.5, 0.5));
        assert_eq!(open.open_count(), 5);

        let fist = FingerStates::measure(&HandPose::Fist.at(0.5, 0.5));
        assert_eq!(fist.open_count(), 0);

        let v = FingerStates::measure(&HandPose::VSign.at(0.5, 0.5));
        assert!(v.is_open(Finger::Index));
        assert!(v.is_open(Finger::Middle));
        assert!(!v.is_open(Finger::Ring));
    }

    #[test]
    fn tight_v_sign_is_not_v() {
        let thresholds = GestureThresholds {
            v_sign_min_separation: 1.0,
            ..Default::default()
        };
        // Two fingers open, no spread: falls through to the count rule
        assert_eq!(classify(&HandPose::VSign.at(0.5, 0.5), &thresholds), Gesture::None);
    }

    #[test]
    fn closed_fist_never_pinches() {
        // Fist thumb tip sits ~0.13 from the curled index tip
        let loose = GestureThresholds {
            pinch_threshold: 0.2,
            pinch_threshold_relaxed: 0.2,
            ..Default::default()
        };
        assert_eq!(classify(&HandPose::Fist.at(0.5, 0.5), &loose), Gesture::Fist);
    }

    #[test]
    fn observe_lost_and_far() {
        let t = GestureThresholds::default();
        assert_eq!(observe(None, &t), HandObservation::Lost);

        let far = HandPose::Open.scaled(0.5, 0.5, 0.2);
        assert_eq!(observe(Some(&far), &t), HandObservation::TooFar);
        assert!(!observe(Some(&far), &t).is_tracking());
    }

    #[test]
    fn observe_tracked_carries_position() {
        let hand = HandPose::Open.at(0.25, 0.5);
        let obs = observe(Some(&hand), &GestureThresholds::default());
        assert!(obs.is_tracking());
        assert_eq!(obs.gesture(), Gesture::Open);
        if let HandObservation::Tracked { rotation, .. } = obs {
            assert!(rotation > 0.0);
        }
    }

    #[test]
    fn gesture_names() {
        assert_eq!(Gesture::VSign.as_str(), "v_sign");
        assert_eq!(serde_json::to_string(&Gesture::VSign).unwrap(), "\"v_sign\"");
        assert_eq!(Gesture::default(), Gesture::None);
    }
}
