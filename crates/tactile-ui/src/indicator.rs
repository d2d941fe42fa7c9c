use tactile_core::{Canvas, Color, Rect};
use tactile_text::{DEFAULT_FONT_FAMILY, FontSpec};

use crate::error::TreeError;
use crate::label::Label;
use crate::panel::Panel;
use crate::text::TextAlignment;
use crate::tree::{NodeId, Tree};
use crate::widget::{DrawCx, Widget};

pub const INDICATOR_HEIGHT: f32 = 60.0;
pub const INDICATOR_TEXT: &str = "Keyboard Active";
/// 25pt.
const INDICATOR_FONT_PX: f32 = 25.0 * 4.0 / 3.0;

/// Translucent strip across the top of the pad, shown exactly while the
/// keyboard is captured. Its contents are fixed; add/remove on it are
/// ignored.
#[derive(Clone, Debug)]
pub struct KeyboardIndicator {
    panel: Panel,
    sealed: bool,
}

impl KeyboardIndicator {
    /// Build the strip under `parent` and hook it to capture changes.
    pub fn install(tree: &mut Tree, parent: NodeId) -> Result<NodeId, TreeError> {
        let width = tree.size().width;
        let strip = Rect::new(0.0, 0.0, width, INDICATOR_HEIGHT);
        let id = tree.spawn(
            parent,
            strip,
            KeyboardIndicator {
                panel: Panel::new().with_background(Color::DEFAULT_FOREGROUND.with_alpha(128)),
                sealed: false,
            },
        )?;
        tree.spawn(
            id,
            strip,
            Label::new(INDICATOR_TEXT)
                .fixed()
                .without_background()
                .with_color(Color::BLACK)
                .with_font(FontSpec::new(DEFAULT_FONT_FAMILY, INDICATOR_FONT_PX).bold())
                .with_alignment(TextAlignment::CENTER),
        )?;
        tree.widget_mut::<KeyboardIndicator>(id)?.sealed = true;
        tree.observe_capture(id)?;
        Ok(id)
    }
}

impl Widget for KeyboardIndicator {
    fn kind(&self) -> &'static str {
        "KeyboardIndicator"
    }

    fn draw(&mut self, cx: &mut DrawCx<'_>, canvas: &mut Canvas<'_>) {
        self.panel.paint(cx.local_bounds(), canvas);
    }

    fn accepts_children(&self) -> bool {
        true
    }

    fn is_sealed(&self) -> bool {
        self.sealed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TextField;
    use tactile_core::{FrameBuffer, Gesture, Size, Vec2};

    #[test]
    fn test_enabled_exactly_while_captured() {
        let mut t = Tree::new(Size::new(800.0, 480.0));
        let root = t.root();
        let field = t.spawn(root, Rect::new(10.0, 100.0, 200.0, 30.0), TextField::new()).unwrap();
        let ind = KeyboardIndicator::install(&mut t, root).unwrap();
        let label = t.children(ind)[0];
        assert!(!t.is_enabled(ind));
        assert!(!t.is_enabled(label));

        t.dispatch_gesture(Gesture::Tap(Vec2::new(20.0, 110.0)));
        assert_eq!(t.focus().current_focus(), Some(field));
        assert!(t.is_enabled(ind));
        assert!(t.is_enabled(label));

        t.dispatch_gesture(Gesture::Press { touches: 1, position: Vec2::new(400.0, 300.0) });
        assert!(!t.is_enabled(ind));
    }

    #[test]
    fn test_ignores_external_add_and_remove() {
        let mut t = Tree::new(Size::new(800.0, 480.0));
        let root = t.root();
        let ind = KeyboardIndicator::install(&mut t, root).unwrap();
        let label = t.children(ind)[0];

        let extra = t.insert(Rect::ZERO, Panel::new());
        t.add(ind, extra).unwrap();
        t.remove(ind, label).unwrap();
        assert_eq!(t.children(ind), &[label]);
        assert_eq!(t.parent(extra), None);
    }

    #[test]
    fn test_strip_is_translucent_foreground() {
        let mut t = Tree::new(Size::new(800.0, 480.0));
        let root = t.root();
        let ind = KeyboardIndicator::install(&mut t, root).unwrap();
        t.set_enabled(ind, true).unwrap();

        let mut fb = FrameBuffer::new(800, 480);
        t.render(&mut fb);
        // green at half alpha over black, away from the text
        assert_eq!(fb.pixel(2, 2), Some(Color(0, 64, 0, 255)));
        assert_eq!(fb.pixel(2, 60), Some(Color::BLACK));
    }
}
