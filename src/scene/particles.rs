use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::core::SceneMode;
use crate::types::ParticleInstance;

/// Golden angle in radians; spreads particles evenly around the cone
const GOLDEN_ANGLE: f32 = 2.39996;

const BODY_PALETTE: [[f32; 3]; 4] = [
    [0.0, 0.259, 0.145],   // racing green
    [0.102, 0.365, 0.102], // forest green
    [0.753, 0.753, 0.753], // silver
    [0.545, 0.0, 0.0],     // dark red
];

pub const LIGHT_COLOR: [f32; 3] = [1.0, 0.843, 0.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: usize,
    pub cone_height: f32,
    pub cone_radius: f32,
    /// Share of particles that become fairy lights
    pub light_fraction: f32,
    /// How fast particles travel between tree and scatter targets (per second)
    pub travel_rate: f32,
    pub seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 1500,
            cone_height: 8.0,
            cone_radius: 3.5,
            light_fraction: 0.15,
            travel_rate: 2.0,
            seed: 2024,
        }
    }
}

#[derive(Debug, Clone)]
struct Particle {
    cone: Vec3,
    scatter: Vec3,
    current: Vec3,
    scale: f32,
    speed: f32,
    color: [f32; 3],
    is_light: bool,
}

/// Tree particles with a cone target and a scatter target each
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    travel_rate: f32,
}

impl ParticleField {
    pub fn generate(config: &ParticleConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let h = config.cone_height;

        let particles = (0..config.count)
            .map(|i| {
                let y = rng.random::<f32>() * h - h / 2.0;
                let ny = (y + h / 2.0) / h;
                // Curved cone: narrows faster toward the top
                let radius = (1.0 - ny).powf(1.2) * config.cone_radius;
                let theta = i as f32 * GOLDEN_ANGLE;
                let r = radius + (rng.random::<f32>() - 0.5) * 0.5;
                let cone = Vec3::new(r * theta.cos(), y, r * theta.sin());

                let is_light = rng.random::<f32>() < config.light_fraction;
                if is_light {
                    Particle {
                        cone,
                        scatter: centered_box(&mut rng, Vec3::new(80.0, 60.0, 40.0)),
                        current: cone,
                        scale: rng.random::<f32>() * 0.03 + 0.01,
                        speed: rng.random::<f32>() * 0.02 + 0.01,
                        color: LIGHT_COLOR,
                        is_light,
                    }
                } else {
                    Particle {
                        cone,
                        scatter: centered_box(&mut rng, Vec3::new(20.0, 15.0, 10.0)),
                        current: cone,
                        scale: rng.random::<f32>() * 0.08 + 0.02,
                        speed: rng.random::<f32>() * 0.02 + 0.01,
                        color: BODY_PALETTE[rng.random_range(0..BODY_PALETTE.len())],
                        is_light,
                    }
                }
            })
            .collect();

        Self {
            particles,
            travel_rate: config.travel_rate,
        }
    }

    /// Move every particle toward the target for `mode`
    pub fn update(&mut self, mode: SceneMode, delta: f32) {
        let t = (delta.max(0.0) * self.travel_rate).min(1.0);
        for p in &mut self.particles {
            let target = Self::target(p, mode);
            p.current += (target - p.current) * t;
        }
    }

    fn target(p: &Particle, mode: SceneMode) -> Vec3 {
        match mode {
            SceneMode::Assembled => p.cone,
            SceneMode::Scattered | SceneMode::Focused => p.scatter,
        }
    }

    /// Largest remaining distance to the targets of `mode`
    pub fn max_offset(&self, mode: SceneMode) -> f32 {
        self.particles
            .iter()
            .map(|p| p.current.distance(Self::target(p, mode)))
            .fold(0.0, f32::max)
    }

    /// GPU instances at animation time `time`: body particles wobble, lights twinkle
    pub fn instances(&self, time: f32) -> Vec<ParticleInstance> {
        self.particles
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let phase = i as f32;
                if p.is_light {
                    let twinkle = (time * 5.0 + phase).sin() * 0.2 + 1.0;
                    ParticleInstance::new(p.current, p.scale * twinkle, p.color, true)
                } else {
                    let wobble = Vec3::new(
                        (time * p.speed + phase).sin() * 0.02,
                        (time * p.speed + phase).cos() * 0.02,
                        0.0,
                    );
                    ParticleInstance::new(p.current + wobble, p.scale, p.color, false)
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn light_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_light).count()
    }
}

/// Uniform point in a box of `size` centred on the origin
fn centered_box(rng: &mut StdRng, size: Vec3) -> Vec3 {
    Vec3::new(
        (rng.random::<f32>() - 0.5) * size.x,
        (rng.random::<f32>() - 0.5) * size.y,
        (rng.random::<f32>() - 0.5) * size.z,
    )
}
