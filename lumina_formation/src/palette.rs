//! Ornament colors.

/// Packed `0xRRGGBB` color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const GOLD:  Color = Color(0xD4AF37);
    pub const RED:   Color = Color(0xB01B2E);
    pub const GREEN: Color = Color(0x2F5233);

    pub fn rgb(self) -> (u8, u8, u8) {
        ((self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8)
    }

    /// Opaque `0xAARRGGBB`, the framebuffer format.
    pub fn to_argb(self) -> u32 {
        0xFF00_0000 | (self.0 & 0x00FF_FFFF)
    }

    /// Mix toward `other`. `t` = 0.0 → all `self`, `t` = 1.0 → all `other`.
    pub fn blend(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 * (1.0 - t) + b as f32 * t).round() as u32;
        let (ar, ag, ab) = self.rgb();
        let (br, bg, bb) = other.rgb();
        Color((mix(ar, br) << 16) | (mix(ag, bg) << 8) | mix(ab, bb))
    }
}
