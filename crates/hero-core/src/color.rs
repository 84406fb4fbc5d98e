use glam::Vec3;

/// Decode a packed `0xRRGGBB` sRGB color into linear RGB.
pub fn hex_to_linear(hex: u32) -> Vec3 {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Vec3::new(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b))
}

#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_and_black_are_fixed_points() {
        assert!((hex_to_linear(0xffffff) - Vec3::ONE).length() < 1e-5);
        assert_eq!(hex_to_linear(0x000000), Vec3::ZERO);
    }

    #[test]
    fn channels_decode_in_rgb_order() {
        let c = hex_to_linear(0xff0000);
        assert!((c - Vec3::X).length() < 1e-5);
        let c = hex_to_linear(0x0000ff);
        assert!((c - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn mid_grey_is_darker_in_linear_space() {
        let c = hex_to_linear(0x808080);
        assert!(c.x > 0.2 && c.x < 0.23, "got {}", c.x);
    }
}
