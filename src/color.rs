use std::ops::{ Add, Mul };

use crate::feq;

/// A color with an alpha channel.
///
/// `r`, `g` and `b` are stored *un-premultiplied*, with `a` in `[0, 1]`. The
/// compositing operators (`+` and `Color * Color`) convert both operands to
/// premultiplied space (each channel weighted by its alpha) before combining
/// them, which lets partially transparent surfaces accumulate light the same
/// way opaque ones do. Scaling by a scalar leaves alpha alone.
///
/// # Examples
///
/// Adding two opaque colors is plain channel addition:
///
/// ```
/// # use pov_tracer::color::Color;
/// let sum = Color::rgb(0.2, 0.3, 0.0) + Color::rgb(0.1, 0.1, 0.5);
/// assert_eq!(sum, Color::rgb(0.3, 0.4, 0.5));
/// ```
///
/// A half-transparent color contributes half its channels:
///
/// ```
/// # use pov_tracer::color::Color;
/// let sum = Color::rgba(1.0, 1.0, 1.0, 0.5) + Color::rgba(0.0, 0.0, 0.0, 0.25);
/// assert_eq!(sum, Color::rgba(0.5, 0.5, 0.5, 0.75));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

/// Partial equality on two colors.
///
/// Colors are compared component-wise, accounting for possible floating point
/// error in comparisons.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b) &&
            feq(self.a, other.a)
    }
}

/// Conversion from a list of numbers to a `Color`.
///
/// The first three elements are red, green and blue; missing ones default to
/// `0.0`. An optional fourth element is the alpha, which otherwise defaults
/// to `1.0` (opaque).
impl From<&[f64]> for Color {
    fn from(v: &[f64]) -> Color {
        let at = |i: usize, default: f64| v.get(i).copied().unwrap_or(default);
        Color::rgba(at(0, 0.0), at(1, 0.0), at(2, 0.0), at(3, 1.0))
    }
}

impl Color {
    /// Creates an opaque color.
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b, a: 1.0 }
    }

    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Color {
        Color { r, g, b, a }
    }

    /// Opaque black.
    pub fn black() -> Color {
        Color::rgb(0.0, 0.0, 0.0)
    }

    /// Opaque white.
    pub fn white() -> Color {
        Color::rgb(1.0, 1.0, 1.0)
    }

    /// Fully transparent black; the identity for `+`.
    pub fn transparent() -> Color {
        Color::rgba(0.0, 0.0, 0.0, 0.0)
    }

    /// Returns the channels weighted by alpha.
    pub fn premultiplied(&self) -> (f64, f64, f64, f64) {
        (self.r * self.a, self.g * self.a, self.b * self.a, self.a)
    }

    /// Quantizes to 8-bit premultiplied RGBA.
    ///
    /// Each channel becomes `round(min(c * a, 1) * 255)`, and alpha becomes
    /// `round(min(a, 1) * 255)`. Negative values clamp to zero.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let quantize = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b, a) = self.premultiplied();

        [quantize(r), quantize(g), quantize(b), quantize(a)]
    }
}

/// Adds two colors in premultiplied space.
///
/// Alpha saturates at `1.0`.
impl Add<Color> for Color {
    type Output = Color;

    fn add(self, other: Color) -> Self::Output {
        let (lr, lg, lb, la) = self.premultiplied();
        let (rr, rg, rb, ra) = other.premultiplied();

        Color {
            r: lr + rr,
            g: lg + rg,
            b: lb + rb,
            a: (la + ra).min(1.0),
        }
    }
}

/// Scales the color channels by a scalar. Alpha is unchanged.
impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, other: f64) -> Self::Output {
        Color {
            r: self.r * other,
            g: self.g * other,
            b: self.b * other,
            a: self.a,
        }
    }
}

/// Multiplies two colors channel-wise in premultiplied space (filtering one
/// color through another, e.g. a light through a surface pigment).
impl Mul<Color> for Color {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        let (lr, lg, lb, la) = self.premultiplied();
        let (rr, rg, rb, ra) = other.premultiplied();

        Color {
            r: lr * rr,
            g: lg * rg,
            b: lb * rb,
            a: (la * ra).min(1.0),
        }
    }
}

#[test]
fn add_colors() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);

    assert_eq!(c1 + c2, Color::rgb(1.6, 0.7, 1.0));
}

#[test]
fn add_to_transparent_is_identity_for_opaque() {
    let c = Color::rgb(0.3, 0.2, 0.1);

    assert_eq!(Color::transparent() + c, c);
}

#[test]
fn scale_keeps_alpha() {
    let c = Color::rgba(0.2, 0.3, 0.4, 0.5);

    assert_eq!(c * 2.0, Color::rgba(0.4, 0.6, 0.8, 0.5));
}

#[test]
fn multiply_colors() {
    let c1 = Color::rgb(1.0, 0.2, 0.4);
    let c2 = Color::rgb(0.9, 1.0, 0.1);

    assert_eq!(c1 * c2, Color::rgb(0.9, 0.2, 0.04));
}

#[test]
fn multiply_translucent_colors() {
    let c1 = Color::rgba(1.0, 1.0, 1.0, 0.5);
    let c2 = Color::rgba(0.5, 0.5, 0.5, 0.5);

    assert_eq!(c1 * c2, Color::rgba(0.125, 0.125, 0.125, 0.25));
}

#[test]
fn quantize_premultiplied() {
    assert_eq!(Color::rgba(1.0, 0.5, 2.0, 1.0).to_rgba8(), [255, 128, 255, 255]);
    assert_eq!(Color::rgba(1.0, 1.0, -1.0, 0.5).to_rgba8(), [128, 128, 0, 128]);
}

#[test]
fn color_from_list() {
    assert_eq!(Color::from(&[0.1, 0.2, 0.3][..]), Color::rgb(0.1, 0.2, 0.3));
    assert_eq!(Color::from(&[0.1, 0.2, 0.3, 0.4][..]),
        Color::rgba(0.1, 0.2, 0.3, 0.4));
}
