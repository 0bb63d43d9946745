use gesture_tree::core::{RotationConfig, RotationIntegrator, SceneMode};

fn run(r: &mut RotationIntegrator, mode: SceneMode, hand: Option<f32>, seconds: f32, fps: f32) {
    let frames = (seconds * fps).round() as usize;
    for _ in 0..frames {
        r.update(mode, hand, 1.0 / fps);
    }
}

#[cfg(test)]
mod rotation_tests {
    use super::*;

    #[test]
    fn test_assembled_converges_to_auto_spin_without_hand() {
        let config = RotationConfig::default();
        let mut r = RotationIntegrator::new(config);
        run(&mut r, SceneMode::Assembled, None, 5.0, 60.0);
        assert!((r.velocity() - config.auto_spin_velocity).abs() < 1e-3);
        assert!(r.velocity() > 0.0);
    }

    #[test]
    fn test_assembled_ignores_hand_and_recovers_from_fast_spin() {
        let config = RotationConfig::default();
        let mut r = RotationIntegrator::new(config);
        run(&mut r, SceneMode::Scattered, Some(2.0), 2.0, 60.0);
        assert!(r.velocity() > 1.9);

        run(&mut r, SceneMode::Assembled, Some(-2.0), 6.0, 60.0);
        assert!((r.velocity() - config.auto_spin_velocity).abs() < 1e-3);
    }

    #[test]
    fn test_coasting_decays_toward_zero() {
        let mut r = RotationIntegrator::new(RotationConfig::default());
        run(&mut r, SceneMode::Scattered, Some(1.5), 1.0, 60.0);
        let before = r.velocity();
        r.update(SceneMode::Scattered, None, 1.0 / 60.0);
        assert!((r.velocity() - before * 0.98).abs() < 1e-6);

        run(&mut r, SceneMode::Scattered, None, 10.0, 60.0);
        assert!(r.velocity().abs() < 1e-3);
        assert!(r.velocity() > 0.0);
    }

    #[test]
    fn test_focus_stops_rotation() {
        let mut r = RotationIntegrator::new(RotationConfig::default());
        run(&mut r, SceneMode::Scattered, Some(-1.0), 1.0, 60.0);
        run(&mut r, SceneMode::Focused, Some(-1.0), 3.0, 60.0);
        assert!(r.velocity().abs() < 1e-3);
    }

    #[test]
    fn test_angle_is_frame_rate_independent() {
        let mut slow = RotationIntegrator::new(RotationConfig::default());
        let mut fast = RotationIntegrator::new(RotationConfig::default());
        // Settle first so both integrate the same constant velocity
        run(&mut slow, SceneMode::Scattered, Some(1.0), 3.0, 30.0);
        run(&mut fast, SceneMode::Scattered, Some(1.0), 3.0, 120.0);
        let (a0, b0) = (slow.angle(), fast.angle());

        run(&mut slow, SceneMode::Scattered, Some(1.0), 2.0, 30.0);
        run(&mut fast, SceneMode::Scattered, Some(1.0), 2.0, 120.0);
        let slow_turn = slow.angle() - a0;
        let fast_turn = fast.angle() - b0;
        assert!((slow_turn - 2.0).abs() < 1e-2, "slow turned {slow_turn}");
        assert!((fast_turn - 2.0).abs() < 1e-2, "fast turned {fast_turn}");
    }

    #[test]
    fn test_long_frame_does_not_overshoot() {
        let mut r = RotationIntegrator::new(RotationConfig::default());
        r.update(SceneMode::Scattered, Some(1.0), 2.0);
        assert_eq!(r.velocity(), 1.0);
    }
}
