use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::SceneMode;
use crate::types::PhotoInstance;

/// Where the viewer's camera sits, looking at the origin
pub const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 0.0, 14.0);
/// World point a focused photo is pulled to
pub const FOCUS_POINT: Vec3 = Vec3::new(0.0, 0.0, 10.0);

const SCATTER_SIZE: Vec3 = Vec3::new(12.0, 8.0, 5.0);
const CONE_WRAPS: f32 = 3.0;
const SCALE_SCATTERED: f32 = 1.5;
const SCALE_FOCUSED: f32 = 5.0;
const MOVE_RATE: f32 = 3.0;
const FOCUS_MOVE_RATE: f32 = 10.0;

#[derive(Debug, Clone)]
struct PhotoSlot {
    url: String,
    cone: Vec3,
    scatter: Vec3,
    position: Vec3,
    scale: f32,
}

/// Photos hung on the tree, with focus selection
#[derive(Debug, Clone)]
pub struct PhotoCloud {
    slots: Vec<PhotoSlot>,
    focused: Option<usize>,
    last_mode: SceneMode,
    cone_height: f32,
    cone_radius: f32,
    seed: u64,
}

impl PhotoCloud {
    pub fn new(cone_height: f32, cone_radius: f32, seed: u64) -> Self {
        Self {
            slots: Vec::new(),
            focused: None,
            last_mode: SceneMode::Assembled,
            cone_height,
            cone_radius,
            seed,
        }
    }

    /// Re-lay out slots for `urls`; photos already present keep their current pose
    pub fn sync(&mut self, urls: &[String]) {
        let focused_url = self.focused_url().map(str::to_owned);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let h = self.cone_height;
        let count = urls.len().max(1) as f32;

        let slots: Vec<PhotoSlot> = urls
            .iter()
            .enumerate()
            .map(|(i, url)| {
                let y = rng.random::<f32>() * h - h / 2.0;
                // Slightly outside the particle cone so photos stay visible
                let r = (1.0 - (y + h / 2.0) / h) * (self.cone_radius + 0.5);
                let theta = i as f32 / count * TAU * CONE_WRAPS;
                let cone = Vec3::new(r * theta.cos(), y, r * theta.sin());
                let scatter = Vec3::new(
                    (rng.random::<f32>() - 0.5) * SCATTER_SIZE.x,
                    (rng.random::<f32>() - 0.5) * SCATTER_SIZE.y,
                    (rng.random::<f32>() - 0.5) * SCATTER_SIZE.z,
                );
                let existing = self.slots.iter().find(|s| &s.url == url);
                PhotoSlot {
                    url: url.clone(),
                    cone,
                    scatter,
                    position: existing.map_or(cone, |s| s.position),
                    scale: existing.map_or(0.0, |s| s.scale),
                }
            })
            .collect();

        self.focused = focused_url.and_then(|u| slots.iter().position(|s| s.url == u));
        self.slots = slots;
    }

    /// Advance one frame with the tree spun to `angle` radians about Y
    pub fn update(&mut self, mode: SceneMode, angle: f32, delta: f32) {
        let spin = Quat::from_rotation_y(angle);

        if mode == SceneMode::Focused && self.last_mode != SceneMode::Focused {
            self.focused = self.closest_to_camera(spin);
            if let Some(url) = self.focused_url() {
                debug!("focusing photo {url}");
            }
        } else if mode != SceneMode::Focused {
            self.focused = None;
        }
        self.last_mode = mode;

        let delta = delta.max(0.0);
        // The focus point is fixed in world space; slots live in tree space
        let focus_local = spin.inverse() * FOCUS_POINT;
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let is_focused = self.focused == Some(i);
            let (target, target_scale) = match mode {
                SceneMode::Assembled => (slot.cone, 0.0),
                _ if is_focused => (focus_local, SCALE_FOCUSED),
                _ => (slot.scatter, SCALE_SCATTERED),
            };
            let rate = if is_focused { FOCUS_MOVE_RATE } else { MOVE_RATE };
            slot.position += (target - slot.position) * (delta * rate).min(1.0);
            slot.scale += (target_scale - slot.scale) * (delta * MOVE_RATE).min(1.0);
        }
    }

    fn closest_to_camera(&self, spin: Quat) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, s)| (i, (spin * s.scatter).distance(CAMERA_POSITION)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focused
    }

    pub fn focused_url(&self) -> Option<&str> {
        self.focused
            .and_then(|i| self.slots.get(i))
            .map(|s| s.url.as_str())
    }

    /// Instances in tree space
    pub fn instances(&self) -> Vec<PhotoInstance> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, s)| PhotoInstance::new(s.position, s.scale, self.focused == Some(i)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
