//! Module implementing the `Color` type and its HSL counterparts.

use std::fmt;

use rand::Rng;


/// RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    /// Create a white color.
    #[inline]
    pub fn white() -> Self {
        Self::gray(0xff)
    }

    /// Create a black color.
    #[inline]
    pub fn black() -> Self {
        Self::gray(0x0)
    }

    /// Create a gray color of given intensity.
    #[inline]
    pub fn gray(value: u8) -> Self {
        Color(value, value, value)
    }
}

impl Color {
    /// Convert the color to its chromatic inverse.
    #[inline]
    pub const fn invert(self) -> Self {
        let Color(r, g, b) = self;
        Color(0xff - r, 0xff - g, 0xff - b)
    }

    /// Linearly interpolate between this color and another one.
    /// `t` is clamped to the [0, 1] range.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.max(0.0).min(1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        let (Color(r1, g1, b1), Color(r2, g2, b2)) = (self, other);
        Color(mix(r1, r2), mix(g1, g2), mix(b1, b2))
    }
}

impl From<Hsl> for Color {
    fn from(hsl: Hsl) -> Self {
        hsl.to_rgb()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let &Color(r, g, b) = self;
        write!(fmt, "#{:0>2x}{:0>2x}{:0>2x}", r, g, b)
    }
}


/// Color in the HSL space.
///
/// Hue is in degrees, saturation & lightness are percentages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Hsl {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl Hsl {
    #[inline]
    pub fn new(hue: u16, saturation: u8, lightness: u8) -> Self {
        Hsl{hue: hue % 360, saturation: saturation.min(100), lightness: lightness.min(100)}
    }

    /// Convert the color to RGB.
    pub fn to_rgb(&self) -> Color {
        let h = self.hue as f64 / 60.0;
        let s = self.saturation as f64 / 100.0;
        let l = self.lightness as f64 / 100.0;

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        let channel = |v: f64| ((v + m) * 255.0).round().max(0.0).min(255.0) as u8;
        Color(channel(r), channel(g), channel(b))
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "hsl({} {}% {}%)", self.hue, self.saturation, self.lightness)
    }
}


/// Pair of colors that make up a background gradient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColorPair {
    pub primary: Hsl,
    pub secondary: Hsl,
}

impl ColorPair {
    /// Create the pair out of a hue, a shared saturation,
    /// and lightness values for both colors.
    ///
    /// The secondary color is shifted by 40 degrees of hue.
    #[inline]
    pub fn from_hsl(hue: u16, saturation: u8, primary_lightness: u8,
                    secondary_lightness: u8) -> Self {
        ColorPair{
            primary: Hsl::new(hue, saturation, primary_lightness),
            secondary: Hsl::new((hue % 360 + 40) % 360, saturation, secondary_lightness),
        }
    }

    /// Pick a random pair of colors that go well together.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let hue = rng.gen_range(0..360);
        let saturation = 60 + rng.gen_range(0..20);
        let primary_lightness = 40 + rng.gen_range(0..20);
        let secondary_lightness = 20 + rng.gen_range(0..30);
        Self::from_hsl(hue, saturation, primary_lightness, secondary_lightness)
    }
}


#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;
    use spectral::prelude::*;
    use crate::model::constants::{OUTLINE_COLOR, TEXT_COLOR};
    use super::{Color, ColorPair, Hsl};

    #[test]
    fn black_and_white() {
        assert_eq!(Color(0, 0, 0), Color::black());
        assert_eq!(Color(255, 255, 255), Color::white());
        assert_eq!(Color::black(), Color::white().invert());
    }

    #[test]
    fn outline_contrasts_with_text() {
        assert_eq!(Color::black(), OUTLINE_COLOR);
        assert_eq!(TEXT_COLOR, OUTLINE_COLOR.invert());
        assert_eq!(Color(0, 127, 255), Color(255, 128, 0).invert());
    }

    #[test]
    fn display_as_hex() {
        assert_eq!("#ff8000", format!("{}", Color(255, 128, 0)));
        assert_eq!("#000000", format!("{}", Color::black()));
    }

    #[test]
    fn hsl_primaries() {
        assert_eq!(Color(255, 0, 0), Hsl::new(0, 100, 50).to_rgb());
        assert_eq!(Color(0, 255, 0), Hsl::new(120, 100, 50).to_rgb());
        assert_eq!(Color(0, 0, 255), Hsl::new(240, 100, 50).to_rgb());
        assert_eq!(Color::white(), Hsl::new(77, 30, 100).to_rgb());
        assert_eq!(Color::black(), Hsl::new(300, 90, 0).to_rgb());
    }

    #[test]
    fn lerp_endpoints() {
        let (a, b) = (Color(10, 20, 30), Color(110, 220, 130));
        assert_eq!(a, a.lerp(b, 0.0));
        assert_eq!(b, a.lerp(b, 1.0));
        assert_eq!(Color(60, 120, 80), a.lerp(b, 0.5));
        assert_eq!(b, a.lerp(b, 7.0));
    }

    #[test]
    fn pair_hue_wraps_around() {
        let pair = ColorPair::from_hsl(350, 70, 50, 30);
        assert_eq!(350, pair.primary.hue);
        assert_eq!(30, pair.secondary.hue);
        assert_eq!(pair.primary.saturation, pair.secondary.saturation);
    }

    #[test]
    fn random_pair_with_fixed_source() {
        let pair = ColorPair::random(&mut StepRng::new(0, 0));
        assert_eq!(ColorPair::from_hsl(0, 60, 40, 20), pair);
        assert_eq!(Color(163, 41, 41), pair.primary.to_rgb());
        assert_eq!(Color(97, 66, 5), pair.secondary.to_rgb());
    }

    #[test]
    fn random_pair_within_bounds() {
        let mut rng = rand::thread_rng();
        for _ in 0..256 {
            let pair = ColorPair::random(&mut rng);
            assert_that!(pair.primary.hue).is_less_than(360);
            assert_eq!((pair.primary.hue + 40) % 360, pair.secondary.hue);
            assert_that!(pair.primary.saturation).is_greater_than_or_equal_to(60);
            assert_that!(pair.primary.saturation).is_less_than(80);
            assert_that!(pair.primary.lightness).is_greater_than_or_equal_to(40);
            assert_that!(pair.primary.lightness).is_less_than(60);
            assert_that!(pair.secondary.lightness).is_greater_than_or_equal_to(20);
            assert_that!(pair.secondary.lightness).is_less_than(50);
        }
    }
}
