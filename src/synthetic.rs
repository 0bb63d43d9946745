//! Synthetic hand poses for demos, benches and tests.
//!
//! Poses are laid out relative to the wrist with image y pointing down, then
//! placed so the middle knuckle lands on the requested position.

use glam::Vec3;

use crate::landmarks::{HandLandmarks, Joint, LANDMARK_COUNT};
use crate::replay::{ReplayScript, ScriptFrame};

/// Distance from wrist to middle knuckle at scale 1.0
pub const REFERENCE_HAND_SIZE: f32 = 0.2;

/// Knuckle offsets from the wrist: index, middle, ring, pinky
const MCP: [(f32, f32); 4] = [(-0.04, -0.19), (0.0, -0.20), (0.04, -0.19), (0.08, -0.17)];

const THUMB_CMC: (f32, f32) = (-0.06, -0.04);
const THUMB_MCP: (f32, f32) = (-0.10, -0.09);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandPose {
    /// Every finger curled, thumb folded over the palm
    Fist,
    /// Every finger extended
    Open,
    /// Thumb tip touching the index tip, other fingers extended
    Pinch,
    /// Index and middle extended and spread, the rest curled
    VSign,
    /// Three fingers extended; matches no gesture
    Relaxed,
}

#[derive(Clone, Copy)]
enum Digit {
    Extended { spread: f32 },
    Curled,
}

#[derive(Clone, Copy)]
enum Thumb {
    Open,
    Folded,
    Pinching,
}

impl HandPose {
    /// Full-size hand with its middle knuckle at `(x, y)`
    pub fn at(self, x: f32, y: f32) -> HandLandmarks {
        self.scaled(x, y, 1.0)
    }

    /// Hand with its middle knuckle at `(x, y)`, shrunk or grown by `scale`
    pub fn scaled(self, x: f32, y: f32, scale: f32) -> HandLandmarks {
        let ext = Digit::Extended { spread: 0.0 };
        let (thumb, digits) = match self {
            HandPose::Fist => (Thumb::Folded, [Digit::Curled; 4]),
            HandPose::Open => (Thumb::Open, [ext; 4]),
            HandPose::Pinch => (Thumb::Pinching, [ext; 4]),
            HandPose::VSign => (
                Thumb::Folded,
                [
                    Digit::Extended { spread: -0.04 },
                    Digit::Extended { spread: 0.04 },
                    Digit::Curled,
                    Digit::Curled,
                ],
            ),
            HandPose::Relaxed => (Thumb::Folded, [ext, ext, ext, Digit::Curled]),
        };

        let mut offsets = [(0.0f32, 0.0f32); LANDMARK_COUNT];
        offsets[Joint::ThumbCmc.index()] = THUMB_CMC;
        offsets[Joint::ThumbMcp.index()] = THUMB_MCP;
        let (ip, tip) = match thumb {
            Thumb::Open => ((-0.14, -0.14), (-0.17, -0.18)),
            Thumb::Folded => ((-0.07, -0.12), (0.04, -0.05)),
            Thumb::Pinching => ((-0.10, -0.20), (-0.05, -0.31)),
        };
        offsets[Joint::ThumbIp.index()] = ip;
        offsets[Joint::ThumbTip.index()] = tip;

        for (finger, (digit, (mx, my))) in digits.iter().zip(MCP).enumerate() {
            let base = Joint::IndexMcp.index() + finger * 4;
            offsets[base] = (mx, my);
            let chain = match *digit {
                Digit::Extended { spread } => [
                    (mx + spread * 0.4, my - 0.06),
                    (mx + spread * 0.7, my - 0.10),
                    (mx + spread, my - 0.14),
                ],
                Digit::Curled => [(mx, my - 0.05), (mx, my - 0.02), (mx, my + 0.03)],
            };
            offsets[base + 1..base + 4].copy_from_slice(&chain);
        }

        let wrist_x = x;
        let wrist_y = y + REFERENCE_HAND_SIZE * scale;
        let points: Vec<Vec3> = offsets
            .iter()
            .map(|&(dx, dy)| Vec3::new(wrist_x + dx * scale, wrist_y + dy * scale, 0.0))
            .collect();

        // Offsets are a fixed 21-entry table, so validation cannot fail
        match HandLandmarks::from_vec3s(&points) {
            Ok(hand) => hand,
            Err(e) => unreachable!("synthetic pose produced invalid landmarks: {e}"),
        }
    }
}

/// Scripted session: idle, open, sweep, pinch, release, V-sign hold, fist, idle
pub fn demo_script(frame_ms: u64) -> ReplayScript {
    let frame_ms = frame_ms.max(1);
    let mut frames = Vec::new();
    let push_span = |frames: &mut Vec<ScriptFrame>, from: u64, to: u64, pose: Option<(HandPose, f32, f32)>| {
        let mut t = from;
        while t < to {
            let progress = (t - from) as f32 / (to - from) as f32;
            let landmarks = pose.map(|(p, x0, x1)| p.at(x0 + (x1 - x0) * progress, 0.5));
            frames.push(ScriptFrame { t_ms: t, landmarks });
            t += frame_ms;
        }
    };

    push_span(&mut frames, 0, 1000, None);
    push_span(&mut frames, 1000, 2000, Some((HandPose::Open, 0.5, 0.5)));
    push_span(&mut frames, 2000, 3000, Some((HandPose::Open, 0.5, 0.2)));
    push_span(&mut frames, 3000, 3600, Some((HandPose::Pinch, 0.5, 0.5)));
    push_span(&mut frames, 3600, 4400, Some((HandPose::Open, 0.5, 0.5)));
    push_span(&mut frames, 4400, 8000, Some((HandPose::VSign, 0.5, 0.5)));
    push_span(&mut frames, 8000, 9000, Some((HandPose::Fist, 0.5, 0.5)));
    push_span(&mut frames, 9000, 10000, None);

    ReplayScript { frames }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_knuckle_lands_on_target() {
        let hand = HandPose::Open.at(0.3, 0.6);
        let c = hand.center();
        assert!((c.x - 0.3).abs() < 1e-6);
        assert!((c.y - 0.6).abs() < 1e-6);
    }

    #[test]
    fn scale_controls_hand_size() {
        let full = HandPose::Fist.at(0.5, 0.5);
        assert!((full.hand_size() - REFERENCE_HAND_SIZE).abs() < 1e-5);

        let small = HandPose::Fist.scaled(0.5, 0.5, 0.25);
        assert!((small.hand_size() - REFERENCE_HAND_SIZE * 0.25).abs() < 1e-5);
    }

    #[test]
    fn demo_script_is_ordered() {
        let script = demo_script(33);
        assert!(!script.frames.is_empty());
        assert!(script.frames.windows(2).all(|w| w[0].t_ms < w[1].t_ms));
        assert!(script.frames.first().unwrap().landmarks.is_none());
    }
}
