use glam::Vec3;

/// Converts a `0xRRGGBB` sRGB colour to linear RGB.
pub fn srgb_hex(hex: u32) -> Vec3 {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xff) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };

    Vec3::new(channel(16), channel(8), channel(0))
}

#[derive(Debug, Clone)]
pub struct HemisphereLight {
    pub sky_color: Vec3,
    pub ground_color: Vec3,
    pub intensity: f32,
}

#[derive(Debug, Clone)]
pub struct FloorConfig {
    pub size: f32,
    pub height: f32,
    /// Geometry closer than this to the mirror plane is left out of the
    /// reflection.
    pub clip_bias: f32,
    pub color: Vec3,
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub background: Vec3,
    pub light: HemisphereLight,
    pub floor: FloorConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: srgb_hex(0xfefefe),
            light: HemisphereLight {
                sky_color: srgb_hex(0xffffff),
                ground_color: srgb_hex(0x444444),
                intensity: 1.0,
            },
            floor: FloorConfig {
                size: 50.0,
                height: -1.0,
                clip_bias: 0.003,
                color: srgb_hex(0x7f7f7f),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srgb_hex_endpoints() {
        assert_eq!(srgb_hex(0x000000), Vec3::ZERO);
        assert_eq!(srgb_hex(0xffffff), Vec3::ONE);
        let grey = srgb_hex(0x7f7f7f);
        assert!((grey.x - 0.212).abs() < 1e-3);
        assert_eq!(grey.x, grey.z);
    }
}
