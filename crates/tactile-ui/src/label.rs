use tactile_core::{Brush, Canvas, Color, Rect, Size};
use tactile_text::FontSpec;

use crate::text::{TextAlignment, draw_text};
use crate::widget::{DrawCx, Widget};

/// Static text.
///
/// An auto-sized label takes the size of its text plus padding; the size is
/// recomputed at the start of the render pass following any change to text,
/// font or padding. A fixed label keeps its bounds and aligns the text inside.
#[derive(Clone, Debug)]
pub struct Label {
    text: String,
    font: FontSpec,
    color: Color,
    background: Color,
    draw_background: bool,
    padding: f32,
    alignment: TextAlignment,
    auto_size: bool,
    needs_remeasure: bool,
    text_size: Size,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: FontSpec::default(),
            color: Color::DEFAULT_FOREGROUND,
            background: Color::DEFAULT_BACKGROUND,
            draw_background: true,
            padding: 0.0,
            alignment: TextAlignment::DEFAULT,
            auto_size: true,
            needs_remeasure: true,
            text_size: Size::ZERO,
        }
    }

    /// Keep the node's bounds instead of sizing to the text.
    pub fn fixed(mut self) -> Self {
        self.auto_size = false;
        self
    }

    pub fn with_font(mut self, font: FontSpec) -> Self {
        self.set_font(font);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self.draw_background = true;
        self
    }

    pub fn without_background(mut self) -> Self {
        self.draw_background = false;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.set_padding(padding);
        self
    }

    pub fn with_alignment(mut self, alignment: TextAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.needs_remeasure = true;
    }

    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    pub fn set_font(&mut self, font: FontSpec) {
        self.font = font;
        self.needs_remeasure = true;
    }

    pub fn set_padding(&mut self, padding: f32) {
        self.padding = padding.max(0.0);
        self.needs_remeasure = true;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    pub fn set_alignment(&mut self, alignment: TextAlignment) {
        self.alignment = alignment;
    }

    pub fn is_auto_sized(&self) -> bool {
        self.auto_size
    }

    pub fn needs_remeasure(&self) -> bool {
        self.needs_remeasure
    }
}

impl Widget for Label {
    fn kind(&self) -> &'static str {
        "Label"
    }

    fn remeasure(&mut self) -> Option<Size> {
        if !self.needs_remeasure {
            return None;
        }
        self.needs_remeasure = false;
        self.text_size = tactile_text::measure(&self.text, &self.font);
        self.auto_size.then(|| {
            Size::new(
                self.text_size.width + 2.0 * self.padding,
                self.text_size.height + 2.0 * self.padding,
            )
        })
    }

    fn draw(&mut self, cx: &mut DrawCx<'_>, canvas: &mut Canvas<'_>) {
        let local = cx.local_bounds();
        if self.draw_background {
            canvas.fill_rect(local, &Brush::Solid(self.background));
        }
        let area = Rect::new(
            self.padding,
            self.padding,
            local.w - 2.0 * self.padding,
            local.h - 2.0 * self.padding,
        );
        let at = self.alignment.place(self.text_size, area);
        draw_text(canvas, &self.text, &self.font, self.color, at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tree;
    use tactile_core::FrameBuffer;

    #[test]
    fn test_auto_size_applied_on_render() {
        let mut t = Tree::new(Size::new(800.0, 480.0));
        let label = t
            .spawn(t.root(), Rect::new(10.0, 10.0, 0.0, 0.0), Label::new("Hello").with_padding(4.0))
            .unwrap();
        assert_eq!(t.size_of(label).unwrap(), Size::ZERO);

        let mut fb = FrameBuffer::new(800, 480);
        t.render(&mut fb);

        let text = tactile_text::measure("Hello", &FontSpec::default());
        assert_eq!(
            t.size_of(label).unwrap(),
            Size::new(text.width + 8.0, text.height + 8.0)
        );
        assert!(!t.widget::<Label>(label).unwrap().needs_remeasure());
    }

    #[test]
    fn test_text_change_marks_remeasure() {
        let mut t = Tree::new(Size::new(800.0, 480.0));
        let label = t.spawn(t.root(), Rect::ZERO, Label::new("a")).unwrap();
        let mut fb = FrameBuffer::new(800, 480);
        t.render(&mut fb);
        let short = t.size_of(label).unwrap();

        t.update::<Label, _>(label, |l| l.set_text("a much longer line"))
            .unwrap();
        assert!(t.widget::<Label>(label).unwrap().needs_remeasure());
        t.render(&mut fb);
        assert!(t.size_of(label).unwrap().width > short.width);
    }

    #[test]
    fn test_fixed_label_keeps_bounds() {
        let mut t = Tree::new(Size::new(800.0, 480.0));
        let label = t
            .spawn(t.root(), Rect::new(0.0, 0.0, 50.0, 20.0), Label::new("wide text here").fixed())
            .unwrap();
        let mut fb = FrameBuffer::new(800, 480);
        t.render(&mut fb);
        assert_eq!(t.size_of(label).unwrap(), Size::new(50.0, 20.0));
    }

    #[test]
    fn test_background_fill() {
        let mut t = Tree::new(Size::new(100.0, 100.0));
        let bg = Color::from_rgb(10, 20, 30);
        t.spawn(t.root(), Rect::new(0.0, 0.0, 40.0, 40.0), Label::new("").fixed().with_background(bg))
            .unwrap();
        let mut fb = FrameBuffer::new(100, 100);
        t.render(&mut fb);
        assert_eq!(fb.pixel(39, 39), Some(bg));
        assert_eq!(fb.pixel(40, 40), Some(Color::BLACK));
    }
}
