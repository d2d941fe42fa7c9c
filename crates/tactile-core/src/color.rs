use crate::{Size, Vec2};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8, pub u8);

impl Color {
    pub const TRANSPARENT: Color = Color(0, 0, 0, 0);
    pub const BLACK: Color = Color(0, 0, 0, 255);
    pub const WHITE: Color = Color(255, 255, 255, 255);
    pub const GREEN: Color = Color(0, 128, 0, 255);
    pub const GRAY: Color = Color(128, 128, 128, 255);

    /// Palette every widget starts from.
    pub const DEFAULT_BACKGROUND: Color = Color::BLACK;
    pub const DEFAULT_FOREGROUND: Color = Color::GREEN;

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color(r, g, b, 255)
    }
    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color(r, g, b, a)
    }
    pub fn from_hex(hex: &str) -> Self {
        let s = hex.trim_start_matches('#');
        if !s.is_ascii() {
            return Color(0, 0, 0, 255);
        }
        let (r, g, b, a) = match s.len() {
            6 => (
                u8::from_str_radix(&s[0..2], 16).unwrap_or(0),
                u8::from_str_radix(&s[2..4], 16).unwrap_or(0),
                u8::from_str_radix(&s[4..6], 16).unwrap_or(0),
                255,
            ),
            8 => (
                u8::from_str_radix(&s[0..2], 16).unwrap_or(0),
                u8::from_str_radix(&s[2..4], 16).unwrap_or(0),
                u8::from_str_radix(&s[4..6], 16).unwrap_or(0),
                u8::from_str_radix(&s[6..8], 16).unwrap_or(255),
            ),
            _ => (0, 0, 0, 255),
        };
        Color(r, g, b, a)
    }
    pub fn with_alpha(self, a: u8) -> Self {
        Color(self.0, self.1, self.2, a)
    }

    /// Source-over blend of `self` onto an opaque `dst`, with `coverage`
    /// (0..=1) scaling the source alpha.
    pub fn blend_over(self, dst: Color, coverage: f32) -> Color {
        let a = (self.3 as f32 / 255.0) * coverage.clamp(0.0, 1.0);
        if a <= 0.0 {
            return dst;
        }
        if a >= 1.0 {
            return Color(self.0, self.1, self.2, 255);
        }
        let mix = |s: u8, d: u8| -> u8 { (s as f32 * a + d as f32 * (1.0 - a)).round() as u8 };
        Color(
            mix(self.0, dst.0),
            mix(self.1, dst.1),
            mix(self.2, dst.2),
            255,
        )
    }

    /// 5-6-5 packing used by the touchpad hardware.
    pub fn to_rgb565(self) -> u16 {
        let r = (self.0 as u16 >> 3) & 0x1F;
        let g = (self.1 as u16 >> 2) & 0x3F;
        let b = (self.2 as u16 >> 3) & 0x1F;
        (r << 11) | (g << 5) | b
    }

    fn lerp(a: Color, b: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let l = |x: u8, y: u8| -> u8 { (x as f32 + (y as f32 - x as f32) * t).round() as u8 };
        Color(l(a.0, b.0), l(a.1, b.1), l(a.2, b.2), l(a.3, b.3))
    }
}

/// Brush for filling shapes.
///
/// This can be a solid color or a gradient. Widgets talk in terms of `Brush`
/// rather than raw `Color` so that panel backgrounds and bars share one fill
/// path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Brush {
    /// Solid color fill
    Solid(Color),

    /// Linear gradient from `start` to `end` in normalized local coordinates
    /// of the rect being filled ((0,0) top-left, (1,1) bottom-right).
    Linear {
        start: Vec2,
        end: Vec2,
        start_color: Color,
        end_color: Color,
    },
}

impl Default for Brush {
    fn default() -> Self {
        Brush::Solid(Color::DEFAULT_BACKGROUND)
    }
}

impl From<Color> for Brush {
    fn from(c: Color) -> Self {
        Brush::Solid(c)
    }
}

impl Brush {
    /// Color at `local` inside a rect of `size`.
    pub fn color_at(&self, local: Vec2, size: Size) -> Color {
        match *self {
            Brush::Solid(c) => c,
            Brush::Linear {
                start,
                end,
                start_color,
                end_color,
            } => {
                let u = if size.width > 0.0 { local.x / size.width } else { 0.0 };
                let v = if size.height > 0.0 { local.y / size.height } else { 0.0 };
                let dx = end.x - start.x;
                let dy = end.y - start.y;
                let len2 = dx * dx + dy * dy;
                let t = if len2 > 0.0 {
                    ((u - start.x) * dx + (v - start.y) * dy) / len2
                } else {
                    0.0
                };
                Color::lerp(start_color, end_color, t)
            }
        }
    }

    pub fn is_solid(&self) -> bool {
        matches!(self, Brush::Solid(_))
    }
}

pub struct LinearGradient;

impl LinearGradient {
    pub fn vertical(top: Color, bottom: Color) -> Brush {
        Brush::Linear {
            start: Vec2 { x: 0.0, y: 0.0 },
            end: Vec2 { x: 0.0, y: 1.0 },
            start_color: top,
            end_color: bottom,
        }
    }

    pub fn horizontal(left: Color, right: Color) -> Brush {
        Brush::Linear {
            start: Vec2 { x: 0.0, y: 0.0 },
            end: Vec2 { x: 1.0, y: 0.0 },
            start_color: left,
            end_color: right,
        }
    }
}
