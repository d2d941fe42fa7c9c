//! Software frame buffer and the scoped drawing surface widgets paint into.
//!
//! A `Canvas` carries a current origin and clip rect. `Canvas::layer` pushes
//! a translated/clipped state and returns a guard; dropping the guard pops
//! it, so a child's clip can never leak to its next sibling.

use std::ops::{Deref, DerefMut};

use crate::error::FrameError;
use crate::{Brush, Color, Rect, Size, Vec2};

#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; width as usize * height as usize],
        }
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Result<Self, FrameError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(FrameError::SizeMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    pub fn to_rgb565(&self) -> Vec<u16> {
        self.pixels.iter().map(|c| c.to_rgb565()).collect()
    }

    /// Little-endian RGB565, the layout the touchpad expects on the wire.
    pub fn to_rgb565_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 2);
        for c in &self.pixels {
            out.extend_from_slice(&c.to_rgb565().to_le_bytes());
        }
        out
    }

    pub fn canvas(&mut self) -> Canvas<'_> {
        let clip = Rect::new(0.0, 0.0, self.width as f32, self.height as f32);
        Canvas {
            fb: self,
            origin: Vec2::ZERO,
            clip,
            saved: Vec::with_capacity(8),
        }
    }
}

pub struct Canvas<'a> {
    fb: &'a mut FrameBuffer,
    /// Absolute position of local (0,0).
    origin: Vec2,
    /// Absolute clip rect.
    clip: Rect,
    saved: Vec<(Vec2, Rect)>,
}

impl<'a> Canvas<'a> {
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Current clip in local coordinates.
    pub fn clip_bounds(&self) -> Rect {
        self.clip.translate(-self.origin)
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Enter `rect` (local): origin moves to its top-left, clip narrows to it.
    pub fn layer(&mut self, rect: Rect) -> Layer<'_, 'a> {
        self.layer_with(rect, rect.origin())
    }

    /// Clip to `clip` (local) while moving the origin to `origin` (local).
    /// Scroll containers use this to shift content under a fixed viewport.
    pub fn layer_with(&mut self, clip: Rect, origin: Vec2) -> Layer<'_, 'a> {
        self.saved.push((self.origin, self.clip));
        let abs_clip = clip.translate(self.origin);
        self.clip = self.clip.intersect(&abs_clip);
        self.origin = self.origin + origin;
        Layer { canvas: self }
    }

    fn pop(&mut self) {
        match self.saved.pop() {
            Some((origin, clip)) => {
                self.origin = origin;
                self.clip = clip;
            }
            None => log::warn!("canvas layer pop with empty stack"),
        }
    }

    // Local rect -> clamped absolute pixel span.
    fn pixel_span(&self, r: Rect) -> Option<(u32, u32, u32, u32)> {
        let abs = r.translate(self.origin).intersect(&self.clip);
        if abs.is_empty() {
            return None;
        }
        let x0 = abs.x.round().max(0.0) as u32;
        let y0 = abs.y.round().max(0.0) as u32;
        let x1 = (abs.right().round().max(0.0) as u32).min(self.fb.width);
        let y1 = (abs.bottom().round().max(0.0) as u32).min(self.fb.height);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0, y0, x1, y1))
    }

    pub fn fill_rect(&mut self, r: Rect, brush: &Brush) {
        let Some((x0, y0, x1, y1)) = self.pixel_span(r) else {
            return;
        };
        let w = self.fb.width as usize;
        let rect_origin = r.origin() + self.origin;
        for y in y0..y1 {
            let row = y as usize * w;
            for x in x0..x1 {
                let src = match brush {
                    Brush::Solid(c) => *c,
                    _ => brush.color_at(
                        Vec2::new(x as f32 - rect_origin.x, y as f32 - rect_origin.y),
                        r.size(),
                    ),
                };
                let px = &mut self.fb.pixels[row + x as usize];
                *px = src.blend_over(*px, 1.0);
            }
        }
    }

    /// Outline drawn inside `r` with the given stroke width.
    pub fn stroke_rect(&mut self, r: Rect, color: Color, width: f32) {
        let w = width.max(1.0).min(r.w / 2.0).min(r.h / 2.0);
        if w <= 0.0 {
            return;
        }
        let brush = Brush::Solid(color);
        self.fill_rect(Rect::new(r.x, r.y, r.w, w), &brush);
        self.fill_rect(Rect::new(r.x, r.bottom() - w, r.w, w), &brush);
        self.fill_rect(Rect::new(r.x, r.y + w, w, r.h - 2.0 * w), &brush);
        self.fill_rect(Rect::new(r.right() - w, r.y + w, w, r.h - 2.0 * w), &brush);
    }

    /// Blend one pixel at local (x, y); used by glyph rasterizers.
    pub fn blend_pixel(&mut self, x: f32, y: f32, color: Color, coverage: f32) {
        let ax = x + self.origin.x;
        let ay = y + self.origin.y;
        if !self.clip.contains(Vec2::new(ax, ay)) || ax < 0.0 || ay < 0.0 {
            return;
        }
        let (px, py) = (ax as u32, ay as u32);
        if px >= self.fb.width || py >= self.fb.height {
            return;
        }
        let idx = py as usize * self.fb.width as usize + px as usize;
        let dst = self.fb.pixels[idx];
        self.fb.pixels[idx] = color.blend_over(dst, coverage);
    }

    /// Fill the whole current clip.
    pub fn clear(&mut self, color: Color) {
        let local = self.clip_bounds();
        let Some((x0, y0, x1, y1)) = self.pixel_span(local) else {
            return;
        };
        let w = self.fb.width as usize;
        for y in y0..y1 {
            let row = y as usize * w;
            self.fb.pixels[row + x0 as usize..row + x1 as usize].fill(color);
        }
    }
}

/// Guard returned by [`Canvas::layer`]; restores the previous origin and clip
/// on drop.
pub struct Layer<'c, 'a> {
    canvas: &'c mut Canvas<'a>,
}

impl<'a> Deref for Layer<'_, 'a> {
    type Target = Canvas<'a>;
    fn deref(&self) -> &Canvas<'a> {
        self.canvas
    }
}

impl<'a> DerefMut for Layer<'_, 'a> {
    fn deref_mut(&mut self) -> &mut Canvas<'a> {
        self.canvas
    }
}

impl Drop for Layer<'_, '_> {
    fn drop(&mut self) {
        self.canvas.pop();
    }
}
