use tactile_core::{Brush, Canvas, Color, Rect};

use crate::widget::{DrawCx, Widget};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Border {
    pub width: f32,
    pub color: Color,
}

/// Plain container: background fill, optional border, children on top.
#[derive(Clone, Debug, Default)]
pub struct Panel {
    pub background: Brush,
    pub border: Option<Border>,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background(mut self, background: impl Into<Brush>) -> Self {
        self.background = background.into();
        self
    }

    pub fn with_border(mut self, width: f32, color: Color) -> Self {
        self.border = Some(Border { width, color });
        self
    }

    /// Container that draws nothing of its own.
    pub fn transparent() -> Self {
        Self::new().with_background(Color::TRANSPARENT)
    }

    pub(crate) fn paint(&self, local: Rect, canvas: &mut Canvas<'_>) {
        if self.background != Brush::Solid(Color::TRANSPARENT) {
            canvas.fill_rect(local, &self.background);
        }
        if let Some(b) = self.border {
            canvas.stroke_rect(local, b.color, b.width);
        }
    }
}

impl Widget for Panel {
    fn kind(&self) -> &'static str {
        "Panel"
    }

    fn draw(&mut self, cx: &mut DrawCx<'_>, canvas: &mut Canvas<'_>) {
        self.paint(cx.local_bounds(), canvas);
    }

    fn accepts_children(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tree;
    use tactile_core::{FrameBuffer, Size};

    #[test]
    fn test_border_drawn_inside_bounds() {
        let mut t = Tree::new(Size::new(100.0, 100.0));
        let white = Color::WHITE;
        t.spawn(
            t.root(),
            Rect::new(10.0, 10.0, 20.0, 20.0),
            Panel::new().with_border(2.0, white),
        )
        .unwrap();

        let mut fb = FrameBuffer::new(100, 100);
        t.render(&mut fb);
        assert_eq!(fb.pixel(10, 10), Some(white));
        assert_eq!(fb.pixel(11, 20), Some(white));
        assert_eq!(fb.pixel(29, 29), Some(white));
        assert_eq!(fb.pixel(15, 15), Some(Color::BLACK));
        assert_eq!(fb.pixel(30, 30), Some(Color::BLACK));
    }

    #[test]
    fn test_transparent_panel_keeps_parent_background() {
        let mut t = Tree::new(Size::new(50.0, 50.0));
        let grey = Color::GRAY;
        let outer = t
            .spawn(t.root(), Rect::new(0.0, 0.0, 50.0, 50.0), Panel::new().with_background(grey))
            .unwrap();
        t.spawn(outer, Rect::new(0.0, 0.0, 20.0, 20.0), Panel::transparent())
            .unwrap();

        let mut fb = FrameBuffer::new(50, 50);
        t.render(&mut fb);
        assert_eq!(fb.pixel(5, 5), Some(grey));
    }
}
