use glam::Vec3;

/// Surface description consumed by the gallery shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Lit by the hemisphere light.
    Standard {
        color: Vec3,
        metalness: f32,
        roughness: f32,
    },
    /// Unlit. When `textured` is set the surface shows a blank placeholder
    /// until its image arrives.
    Basic { color: Vec3, textured: bool },
    /// Samples the planar reflection target in screen space.
    Reflector { color: Vec3 },
}

impl Material {
    pub fn kind(&self) -> u32 {
        match self {
            Material::Standard { .. } => 0,
            Material::Basic { .. } => 1,
            Material::Reflector { .. } => 2,
        }
    }

    pub fn color(&self) -> Vec3 {
        match *self {
            Material::Standard { color, .. }
            | Material::Basic { color, .. }
            | Material::Reflector { color } => color,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Material::Basic {
            color: Vec3::ONE,
            textured: false,
        }
    }
}
