use glam::Vec3;

/// Particle instance data for GPU upload
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
    pub scale: f32,
    pub color: [f32; 3],
    pub is_light: f32, // 1.0 for fairy lights (emissive), 0.0 for body
}

impl ParticleInstance {
    pub fn new(position: Vec3, scale: f32, color: [f32; 3], is_light: bool) -> Self {
        Self {
            position: position.to_array(),
            scale,
            color,
            is_light: if is_light { 1.0 } else { 0.0 },
        }
    }
}

/// Photo quad instance data for GPU upload
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PhotoInstance {
    pub position: [f32; 3],
    pub scale: f32,
    pub focused: f32, // 1.0 while pulled in front of the camera
    pub _pad: [f32; 3],
}

impl PhotoInstance {
    pub fn new(position: Vec3, scale: f32, focused: bool) -> Self {
        Self {
            position: position.to_array(),
            scale,
            focused: if focused { 1.0 } else { 0.0 },
            _pad: [0.0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instances_are_tightly_packed() {
        assert_eq!(std::mem::size_of::<ParticleInstance>(), 32);
        assert_eq!(std::mem::size_of::<PhotoInstance>(), 32);
    }

    #[test]
    fn casts_to_bytes() {
        let instances = [
            ParticleInstance::new(Vec3::ONE, 0.5, [1.0, 0.0, 0.0], true),
            ParticleInstance::new(Vec3::ZERO, 0.1, [0.0, 1.0, 0.0], false),
        ];
        let bytes: &[u8] = bytemuck::cast_slice(&instances);
        assert_eq!(bytes.len(), 64);
        let floats: &[f32] = bytemuck::cast_slice(&instances);
        assert_eq!(floats[7], 1.0);
        assert_eq!(floats[15], 0.0);
    }
}
