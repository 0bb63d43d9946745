use std::io::Cursor;

use anyhow::{Context, Result};
use glam::{Quat, Vec3};
use image::{ImageOutputFormat, RgbImage};

use crate::config::Config;
use crate::core::{FrameState, RotationIntegrator, SceneMode};
use crate::types::{ParticleInstance, PhotoInstance};

use super::particles::ParticleField;
use super::photos::{PhotoCloud, CAMERA_POSITION};

const BACKGROUND: [u8; 3] = [10, 26, 10];
const FOV_Y: f32 = 45.0;

/// Render-side scene: particles, photos and the spin of the whole tree
#[derive(Debug, Clone)]
pub struct TreeScene {
    particles: ParticleField,
    photos: PhotoCloud,
    rotation: RotationIntegrator,
    mode: SceneMode,
    time: f32,
}

impl TreeScene {
    pub fn new(config: &Config) -> Self {
        let p = &config.particles;
        Self {
            particles: ParticleField::generate(p),
            photos: PhotoCloud::new(p.cone_height, p.cone_radius, p.seed.wrapping_add(1)),
            rotation: RotationIntegrator::new(config.rotation),
            mode: SceneMode::Assembled,
            time: 0.0,
        }
    }

    /// Per-frame update from the latest published state
    pub fn frame(&mut self, state: &FrameState, delta: f32) {
        let hand = state.hand.tracking.then_some(state.hand.rotation);
        self.mode = state.mode;
        self.rotation.update(state.mode, hand, delta);
        self.particles.update(state.mode, delta);
        self.photos.update(state.mode, self.rotation.angle(), delta);
        self.time += delta.max(0.0);
    }

    pub fn sync_photos(&mut self, urls: &[String]) {
        self.photos.sync(urls);
    }

    pub fn mode(&self) -> SceneMode {
        self.mode
    }

    pub fn rotation(&self) -> &RotationIntegrator {
        &self.rotation
    }

    /// Rotation to apply to every instance below
    pub fn group_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.rotation.angle())
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn photos(&self) -> &PhotoCloud {
        &self.photos
    }

    pub fn focused_photo(&self) -> Option<&str> {
        self.photos.focused_url()
    }

    pub fn particle_instances(&self) -> Vec<ParticleInstance> {
        self.particles.instances(self.time)
    }

    pub fn photo_instances(&self) -> Vec<PhotoInstance> {
        self.photos.instances()
    }

    /// Rasterize a small RGB preview as seen from the viewer camera
    pub fn render_preview(&self, width: u32, height: u32) -> Preview {
        let mut preview = Preview::new(width, height, BACKGROUND);
        let spin = self.group_rotation();
        let focal = (height as f32 / 2.0) / (FOV_Y.to_radians() / 2.0).tan();

        let project = |local: Vec3| -> Option<(f32, f32, f32)> {
            let world = spin * local;
            let depth = CAMERA_POSITION.z - world.z;
            if depth <= 0.1 {
                return None;
            }
            let sx = width as f32 / 2.0 + world.x * focal / depth;
            let sy = height as f32 / 2.0 - world.y * focal / depth;
            Some((sx, sy, focal / depth))
        };

        for p in self.particle_instances() {
            if let Some((x, y, k)) = project(Vec3::from_array(p.position)) {
                let color = p.color.map(|c| (c.clamp(0.0, 1.0) * 255.0) as u8);
                preview.fill_square(x, y, (p.scale * k).max(0.5), color);
            }
        }
        for p in self.photo_instances() {
            if let Some((x, y, k)) = project(Vec3::from_array(p.position)) {
                preview.fill_square(x, y, p.scale * k * 0.5, [245, 245, 235]);
            }
        }
        preview
    }
}

/// Packed RGB8 image
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl Preview {
    pub fn new(width: u32, height: u32, fill: [u8; 3]) -> Self {
        let rgb = fill
            .iter()
            .copied()
            .cycle()
            .take((width * height * 3) as usize)
            .collect();
        Self { width, height, rgb }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 3) as usize;
        Some([self.rgb[i], self.rgb[i + 1], self.rgb[i + 2]])
    }

    /// Fill a square of half-size `half` centred on `(cx, cy)`, clipped to the image
    fn fill_square(&mut self, cx: f32, cy: f32, half: f32, color: [u8; 3]) {
        let x0 = (cx - half).floor().max(0.0) as u32;
        let y0 = (cy - half).floor().max(0.0) as u32;
        let x1 = ((cx + half).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((cy + half).ceil().max(0.0) as u32).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let i = ((y * self.width + x) * 3) as usize;
                self.rgb[i..i + 3].copy_from_slice(&color);
            }
        }
    }

    /// PNG encoding, one of the formats the photo store serves as an image
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let image = RgbImage::from_raw(self.width, self.height, self.rgb.clone())
            .context("Preview buffer does not match its dimensions")?;
        let mut out = Cursor::new(Vec::new());
        image
            .write_to(&mut out, ImageOutputFormat::Png)
            .context("Failed to encode preview as PNG")?;
        Ok(out.into_inner())
    }
}
