use serde::{Deserialize, Serialize};

use super::scene_mode::SceneMode;

/// Response rates (per second) and damping for the tree spin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Spin the assembled tree settles into (rad/s)
    pub auto_spin_velocity: f32,
    pub auto_spin_rate: f32,
    /// How quickly the velocity follows the hand while scattered
    pub hand_follow_rate: f32,
    /// Per-frame multiplier applied while coasting without a hand
    pub inertia_damping: f32,
    pub focus_stop_rate: f32,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            auto_spin_velocity: 0.1,
            auto_spin_rate: 2.0,
            hand_follow_rate: 10.0,
            inertia_damping: 0.98,
            focus_stop_rate: 5.0,
        }
    }
}

/// Integrates a rotation velocity into the tree's Y angle
#[derive(Debug, Clone, Default)]
pub struct RotationIntegrator {
    velocity: f32,
    angle: f32,
    config: RotationConfig,
}

impl RotationIntegrator {
    pub fn new(config: RotationConfig) -> Self {
        Self {
            velocity: 0.0,
            angle: 0.0,
            config,
        }
    }

    /// Advance one frame. `hand_signal` is `None` when no hand is tracked.
    pub fn update(&mut self, mode: SceneMode, hand_signal: Option<f32>, delta: f32) {
        let delta = delta.max(0.0);
        match (mode, hand_signal) {
            (SceneMode::Assembled, _) => {
                self.approach(self.config.auto_spin_velocity, self.config.auto_spin_rate, delta)
            }
            (SceneMode::Scattered, Some(target)) => {
                self.approach(target, self.config.hand_follow_rate, delta)
            }
            (SceneMode::Scattered, None) => self.velocity *= self.config.inertia_damping,
            (SceneMode::Focused, _) => self.approach(0.0, self.config.focus_stop_rate, delta),
        }
        self.angle += self.velocity * delta;
    }

    fn approach(&mut self, target: f32, rate: f32, delta: f32) {
        // Clamped so a long frame lands on the target instead of overshooting
        let t = (rate * delta).min(1.0);
        self.velocity += (target - self.velocity) * t;
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Cumulative angle in radians
    pub fn angle(&self) -> f32 {
        self.angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn run(r: &mut RotationIntegrator, mode: SceneMode, hand: Option<f32>, frames: usize) {
        for _ in 0..frames {
            r.update(mode, hand, DT);
        }
    }

    #[test]
    fn assembled_converges_to_auto_spin() {
        let mut r = RotationIntegrator::default();
        run(&mut r, SceneMode::Assembled, None, 600);
        assert!((r.velocity() - 0.1).abs() < 1e-3);

        // A tracked hand does not matter while assembled
        run(&mut r, SceneMode::Assembled, Some(-2.0), 60);
        assert!((r.velocity() - 0.1).abs() < 1e-3);
    }

    #[test]
    fn scattered_follows_hand_quickly() {
        let mut r = RotationIntegrator::default();
        run(&mut r, SceneMode::Scattered, Some(1.5), 60);
        assert!((r.velocity() - 1.5).abs() < 1e-3);
    }

    #[test]
    fn coasting_decays_geometrically() {
        let mut r = RotationIntegrator::default();
        run(&mut r, SceneMode::Scattered, Some(1.0), 120);
        let v0 = r.velocity();
        r.update(SceneMode::Scattered, None, DT);
        assert!((r.velocity() - v0 * 0.98).abs() < 1e-6);
        run(&mut r, SceneMode::Scattered, None, 1000);
        assert!(r.velocity().abs() < 1e-6);
    }

    #[test]
    fn focus_stops_rotation() {
        let mut r = RotationIntegrator::default();
        run(&mut r, SceneMode::Scattered, Some(2.0), 120);
        run(&mut r, SceneMode::Focused, Some(2.0), 300);
        assert!(r.velocity().abs() < 1e-3);
    }

    #[test]
    fn angle_is_frame_rate_independent() {
        let mut fast = RotationIntegrator::default();
        let mut slow = RotationIntegrator::default();
        // Settle both at the same constant velocity first
        run(&mut fast, SceneMode::Scattered, Some(1.0), 600);
        slow.update(SceneMode::Scattered, Some(1.0), 1.0);
        let (a0, b0) = (fast.angle(), slow.angle());

        for _ in 0..120 {
            fast.update(SceneMode::Scattered, Some(1.0), 1.0 / 120.0);
        }
        for _ in 0..30 {
            slow.update(SceneMode::Scattered, Some(1.0), 1.0 / 30.0);
        }
        assert!(((fast.angle() - a0) - (slow.angle() - b0)).abs() < 1e-3);
    }

    #[test]
    fn long_frame_does_not_overshoot() {
        let mut r = RotationIntegrator::default();
        r.update(SceneMode::Scattered, Some(1.0), 5.0);
        assert_eq!(r.velocity(), 1.0);
    }
}
