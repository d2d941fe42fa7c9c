use bitflags::bitflags;
use tactile_core::{Canvas, Color, Rect, Size, Vec2};
use tactile_text::FontSpec;

bitflags! {
    /// Where a text block sits inside its box. Setting both bits of an axis
    /// centers on that axis.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextAlignment: u8 {
        const LEFT = 1;
        const RIGHT = 1 << 1;
        const HORIZ_CENTER = Self::LEFT.bits() | Self::RIGHT.bits();
        const TOP = 1 << 2;
        const BOTTOM = 1 << 3;
        const VERT_CENTER = Self::TOP.bits() | Self::BOTTOM.bits();
        const CENTER = Self::HORIZ_CENTER.bits() | Self::VERT_CENTER.bits();
        const DEFAULT = Self::LEFT.bits() | Self::TOP.bits();
    }
}

impl Default for TextAlignment {
    fn default() -> Self {
        TextAlignment::DEFAULT
    }
}

impl TextAlignment {
    /// Top-left corner for a block of `content` size inside `area`. An axis
    /// with no bits set behaves like LEFT / TOP.
    pub fn place(self, content: Size, area: Rect) -> Vec2 {
        let free_x = area.w - content.width;
        let free_y = area.h - content.height;
        let x = if self.contains(TextAlignment::HORIZ_CENTER) {
            free_x / 2.0
        } else if self.contains(TextAlignment::RIGHT) {
            free_x
        } else {
            0.0
        };
        let y = if self.contains(TextAlignment::VERT_CENTER) {
            free_y / 2.0
        } else if self.contains(TextAlignment::BOTTOM) {
            free_y
        } else {
            0.0
        };
        Vec2::new(area.x + x.floor(), area.y + y.floor())
    }
}

/// Draw `text` with its top-left at `at` (local).
pub fn draw_text(canvas: &mut Canvas<'_>, text: &str, font: &FontSpec, color: Color, at: Vec2) {
    if text.is_empty() {
        return;
    }
    tactile_text::rasterize(text, font, |x, y, coverage| {
        canvas.blend_pixel(at.x + x, at.y + y, color, coverage);
    });
}

/// Draw `text` aligned inside `area`. Returns the measured text size.
pub fn draw_text_in(
    canvas: &mut Canvas<'_>,
    text: &str,
    font: &FontSpec,
    color: Color,
    area: Rect,
    alignment: TextAlignment,
) -> Size {
    let size = tactile_text::measure(text, font);
    draw_text(canvas, text, font, color, alignment.place(size, area));
    size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_values() {
        assert_eq!(TextAlignment::HORIZ_CENTER.bits(), 3);
        assert_eq!(TextAlignment::VERT_CENTER.bits(), 12);
        assert_eq!(TextAlignment::CENTER.bits(), 15);
        assert_eq!(TextAlignment::default(), TextAlignment::LEFT | TextAlignment::TOP);
    }

    #[test]
    fn test_place() {
        let area = Rect::new(10.0, 20.0, 100.0, 50.0);
        let content = Size::new(40.0, 10.0);

        assert_eq!(TextAlignment::DEFAULT.place(content, area), Vec2::new(10.0, 20.0));
        assert_eq!(TextAlignment::CENTER.place(content, area), Vec2::new(40.0, 40.0));
        assert_eq!(
            (TextAlignment::RIGHT | TextAlignment::BOTTOM).place(content, area),
            Vec2::new(70.0, 60.0)
        );
        assert_eq!(TextAlignment::empty().place(content, area), Vec2::new(10.0, 20.0));
    }
}
