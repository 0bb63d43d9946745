use gesture_tree::core::{SceneConfig, SceneMachine, SceneMode};
use gesture_tree::gesture::{classify, Gesture, GestureThresholds};
use gesture_tree::landmarks::{HandLandmarks, Joint};
use gesture_tree::synthetic::HandPose;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const GESTURES: [Gesture; 5] = [
    Gesture::None,
    Gesture::Fist,
    Gesture::Open,
    Gesture::Pinch,
    Gesture::VSign,
];

fn focused_at(t0: u64) -> SceneMachine {
    let mut machine = SceneMachine::default();
    machine.on_gesture(Gesture::Open, 0);
    machine.on_gesture(Gesture::Pinch, t0);
    assert_eq!(machine.mode(), SceneMode::Focused);
    machine
}

/// Closed fists with the thumb tip moved around the curled index tip
fn closed_fists() -> Vec<HandLandmarks> {
    let fist = HandPose::Fist.at(0.5, 0.5);
    let index_tip = fist.point(Joint::IndexTip);
    let mut hands = Vec::new();
    for dx in -3..=3 {
        for dy in -3..=3 {
            let mut points = *fist.points();
            points[Joint::ThumbTip.index()] =
                index_tip + Vec3::new(dx as f32 * 0.02, dy as f32 * 0.02, 0.0);
            hands.push(HandLandmarks::from_vec3s(&points).unwrap());
        }
    }
    hands
}

#[cfg(test)]
mod scene_mode_tests {
    use super::*;

    #[test]
    fn test_starts_assembled() {
        assert_eq!(SceneMachine::default().mode(), SceneMode::Assembled);
    }

    #[test]
    fn test_pinch_while_assembled_does_nothing() {
        let mut machine = SceneMachine::default();
        assert_eq!(machine.on_gesture(Gesture::Pinch, 0), None);
        assert_eq!(machine.mode(), SceneMode::Assembled);
        assert_eq!(machine.last_pinch_ms(), Some(0));
    }

    #[test]
    fn test_never_assembled_to_focused() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut machine = SceneMachine::default();
        let mut t = 0;
        for _ in 0..20_000 {
            t += rng.random_range(10..200);
            let change = if rng.random_bool(0.1) {
                machine.on_tracking_lost(t)
            } else {
                machine.on_gesture(GESTURES[rng.random_range(0..GESTURES.len())], t)
            };
            if let Some(change) = change {
                assert!(
                    !(change.from == SceneMode::Assembled && change.to == SceneMode::Focused),
                    "jumped straight to focus at {t} ms"
                );
                assert_eq!(machine.previous(), change.from);
            }
        }
    }

    #[test]
    fn test_focus_release_is_debounced() {
        let t0 = 10_000;

        let mut machine = focused_at(t0);
        assert_eq!(machine.on_gesture(Gesture::Open, t0 + 400), None);
        assert_eq!(machine.mode(), SceneMode::Focused);
        let change = machine.on_gesture(Gesture::Open, t0 + 600);
        assert_eq!(change.map(|c| c.to), Some(SceneMode::Scattered));

        for g in [Gesture::None, Gesture::VSign] {
            let mut machine = focused_at(t0);
            machine.on_gesture(g, t0 + 400);
            assert_eq!(machine.mode(), SceneMode::Focused);
            machine.on_gesture(g, t0 + 600);
            assert_eq!(machine.mode(), SceneMode::Scattered);
        }
    }

    #[test]
    fn test_debounce_boundary_is_exclusive() {
        let mut machine = focused_at(1000);
        machine.on_gesture(Gesture::None, 1500);
        assert_eq!(machine.mode(), SceneMode::Focused);
        machine.on_gesture(Gesture::None, 1501);
        assert_eq!(machine.mode(), SceneMode::Scattered);
    }

    #[test]
    fn test_repeated_pinch_extends_focus() {
        let mut machine = focused_at(0);
        for t in (100..=2000).step_by(100) {
            machine.on_gesture(Gesture::Pinch, t);
        }
        machine.on_gesture(Gesture::None, 2400);
        assert_eq!(machine.mode(), SceneMode::Focused);
    }

    #[test]
    fn test_tracking_loss_reverts_after_grace_period() {
        let mut machine = focused_at(0);
        assert_eq!(machine.on_tracking_lost(300), None);
        assert_eq!(machine.mode(), SceneMode::Focused);
        machine.on_tracking_lost(501);
        assert_eq!(machine.mode(), SceneMode::Scattered);
        // Losing the hand while scattered changes nothing
        assert_eq!(machine.on_tracking_lost(5000), None);
    }

    #[test]
    fn test_fist_assembles_from_any_mode() {
        let mut assembled = SceneMachine::default();
        assert_eq!(assembled.on_gesture(Gesture::Fist, 0), None);
        assert_eq!(assembled.mode(), SceneMode::Assembled);

        let mut scattered = SceneMachine::default();
        scattered.on_gesture(Gesture::Open, 0);
        scattered.on_gesture(Gesture::Fist, 10);
        assert_eq!(scattered.mode(), SceneMode::Assembled);

        // Fist overrides focus even inside the debounce window
        let mut focused = focused_at(0);
        let change = focused.on_gesture(Gesture::Fist, 10);
        assert_eq!(change.map(|c| (c.from, c.to)), Some((SceneMode::Focused, SceneMode::Assembled)));
    }

    #[test]
    fn test_custom_debounce() {
        let mut machine = SceneMachine::new(SceneConfig {
            focus_debounce_ms: 100,
        });
        machine.on_gesture(Gesture::Open, 0);
        machine.on_gesture(Gesture::Pinch, 0);
        machine.on_gesture(Gesture::Open, 101);
        assert_eq!(machine.mode(), SceneMode::Scattered);
    }

    #[test]
    fn test_closed_fist_landmarks_assemble_from_any_mode() {
        let thresholds = GestureThresholds::default();
        for (i, hand) in closed_fists().iter().enumerate() {
            let gesture = classify(hand, &thresholds);
            assert_eq!(gesture, Gesture::Fist, "layout {i}");

            let mut assembled = SceneMachine::default();
            assembled.on_gesture(gesture, 0);
            assert_eq!(assembled.mode(), SceneMode::Assembled, "layout {i}");

            let mut scattered = SceneMachine::default();
            scattered.on_gesture(Gesture::Open, 0);
            scattered.on_gesture(gesture, 10);
            assert_eq!(scattered.mode(), SceneMode::Assembled, "layout {i}");

            let mut focused = focused_at(0);
            focused.on_gesture(gesture, 10);
            assert_eq!(focused.mode(), SceneMode::Assembled, "layout {i}");
        }
    }
}
