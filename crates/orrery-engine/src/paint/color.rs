/// Linear premultiplied RGBA color.
///
/// Invariant:
/// - `rgb` components are expected to be multiplied by `a` (premultiplied alpha).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::from_premul(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::from_premul(1.0, 1.0, 1.0, 1.0);
    // Linear values of the raylib palette bytes.
    pub const GRAY: Color = Color::from_premul(0.223228, 0.223228, 0.223228, 1.0);
    pub const GREEN: Color = Color::from_premul(0.0, 0.775822, 0.029557, 1.0);
    pub const LIME: Color = Color::from_premul(0.0, 0.341914, 0.028426, 1.0);
    pub const MAGENTA: Color = Color::from_premul(1.0, 0.0, 1.0, 1.0);
    pub const ORANGE: Color = Color::from_premul(1.0, 0.3564, 0.0, 1.0);
    pub const RED: Color = Color::from_premul(0.791298, 0.022174, 0.038204, 1.0);

    #[inline]
    pub const fn transparent() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }

    /// Creates a premultiplied color from straight sRGB bytes (`0`–`255`).
    ///
    /// RGB is decoded to linear; alpha is already linear.
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), a as f32 / 255.0)
    }

    /// Creates a premultiplied color from premultiplied components.
    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a premultiplied color from straight alpha components.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: (r.clamp(0.0, 1.0)) * a,
            g: (g.clamp(0.0, 1.0)) * a,
            b: (b.clamp(0.0, 1.0)) * a,
            a,
        }
    }

    /// Returns a straight-alpha representation.
    ///
    /// For `a == 0`, RGB is returned as 0.
    #[inline]
    pub fn to_straight(self) -> (f32, f32, f32, f32) {
        if self.a <= 0.0 {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            let inv = 1.0 / self.a;
            (self.r * inv, self.g * inv, self.b * inv, self.a)
        }
    }

    /// Component-wise product, the usual "tint" of a diffuse color.
    #[inline]
    pub fn modulate(self, tint: Color) -> Self {
        Self {
            r: self.r * tint.r,
            g: self.g * tint.g,
            b: self.b * tint.b,
            a: self.a * tint.a,
        }
    }

    /// Scales the rgb channels by `factor` while keeping alpha.
    #[inline]
    pub fn shaded(self, factor: f32) -> Self {
        let f = factor.max(0.0);
        Self { r: (self.r * f).min(self.a), g: (self.g * f).min(self.a), b: (self.b * f).min(self.a), a: self.a }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}

/// sRGB transfer function, decoded.
fn srgb_to_linear(byte: u8) -> f32 {
    let c = byte as f32 / 255.0;
    if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_round_trips_through_premul() {
        let c = Color::from_straight(0.5, 0.25, 1.0, 0.5);
        assert_eq!(c.r, 0.25);
        let (r, g, b, a) = c.to_straight();
        assert!((r - 0.5).abs() < 1e-6);
        assert!((g - 0.25).abs() < 1e-6);
        assert!((b - 1.0).abs() < 1e-6);
        assert_eq!(a, 0.5);
    }

    #[test]
    fn modulate_by_white_is_identity() {
        let c = Color::from_srgb_u8(10, 20, 30, 255);
        assert_eq!(c.modulate(Color::WHITE), c);
    }

    #[test]
    fn shaded_never_exceeds_alpha() {
        let c = Color::from_straight(0.8, 0.8, 0.8, 0.5).shaded(4.0);
        assert!(c.r <= c.a && c.g <= c.a && c.b <= c.a);
    }

    #[test]
    fn srgb_bytes_decode_to_linear() {
        let c = Color::from_srgb_u8(130, 228, 48, 255);
        assert!((c.r - 0.2232).abs() < 1e-3, "{c:?}");
        assert!((c.g - 0.7758).abs() < 1e-3);
        assert!((c.b - 0.0296).abs() < 1e-3);
        let m = Color::from_srgb_u8(255, 0, 255, 255);
        assert!((m.r - 1.0).abs() < 1e-5 && m.g == 0.0 && (m.b - 1.0).abs() < 1e-5);
        assert_eq!(Color::from_srgb_u8(0, 0, 0, 128).a, 128.0 / 255.0);
    }

    #[test]
    fn palette_constants_match_their_srgb_bytes() {
        let close = |a: Color, b: Color| {
            (a.r - b.r).abs() < 1e-5 && (a.g - b.g).abs() < 1e-5 && (a.b - b.b).abs() < 1e-5 && a.a == b.a
        };
        assert!(close(Color::GRAY, Color::from_srgb_u8(130, 130, 130, 255)));
        assert!(close(Color::GREEN, Color::from_srgb_u8(0, 228, 48, 255)));
        assert!(close(Color::LIME, Color::from_srgb_u8(0, 158, 47, 255)));
        assert!(close(Color::ORANGE, Color::from_srgb_u8(255, 161, 0, 255)));
        assert!(close(Color::RED, Color::from_srgb_u8(230, 41, 55, 255)));
    }
}
