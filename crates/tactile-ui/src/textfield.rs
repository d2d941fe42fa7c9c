//! Editable text box driven by the captured keyboard.
//!
//! Tapping a field focuses it and requests keyboard capture. While focused
//! and captured:
//!
//! - printable characters append, up to `max_len` chars
//! - Backspace drops the last grapheme cluster
//! - Return inserts a newline in multi-line fields, submits in single-line ones
//! - Tab moves focus to `next_field`
//! - Escape drops focus
//!
//! Losing focus never clears the buffer.

use tactile_core::{Brush, Canvas, Color, Gesture, Key, KeyInput, Rect};
use tactile_text::FontSpec;
use unicode_segmentation::UnicodeSegmentation;

use crate::text::{TextAlignment, draw_text_in};
use crate::tree::NodeId;
use crate::widget::{DrawCx, EventCx, Widget};

const TEXT_INSET: f32 = 3.0;
const HIGHLIGHT_INSET: f32 = 1.0;
const HIGHLIGHT_PEN: f32 = 4.0;

#[derive(Clone, Debug)]
pub struct TextField {
    text: String,
    font: FontSpec,
    max_len: Option<usize>,
    single_line: bool,
    next_field: Option<NodeId>,
    pub background: Color,
    pub text_color: Color,
    pub border: Color,
    pub highlight: Color,
    pub alignment: TextAlignment,
}

impl Default for TextField {
    fn default() -> Self {
        Self::new()
    }
}

impl TextField {
    /// Single-line field with white background, black text, grey border and
    /// a green focus ring.
    pub fn new() -> Self {
        Self {
            text: String::new(),
            font: FontSpec::default(),
            max_len: None,
            single_line: true,
            next_field: None,
            background: Color::WHITE,
            text_color: Color::BLACK,
            border: Color::GRAY,
            highlight: Color::GREEN,
            alignment: TextAlignment::DEFAULT,
        }
    }

    pub fn multi_line(mut self) -> Self {
        self.single_line = false;
        self
    }

    pub fn with_max_len(mut self, max: usize) -> Self {
        self.max_len = Some(max);
        self.truncate_to_limit();
        self
    }

    pub fn with_font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_next(mut self, next: NodeId) -> Self {
        self.next_field = Some(next);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the buffer; anything past `max_len` is cut.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.truncate_to_limit();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn set_next(&mut self, next: Option<NodeId>) {
        self.next_field = next;
    }

    pub fn next_field(&self) -> Option<NodeId> {
        self.next_field
    }

    pub fn is_single_line(&self) -> bool {
        self.single_line
    }

    pub fn max_len(&self) -> Option<usize> {
        self.max_len
    }

    fn has_room(&self) -> bool {
        self.max_len
            .is_none_or(|max| self.text.chars().count() < max)
    }

    fn truncate_to_limit(&mut self) {
        if let Some(max) = self.max_len {
            if let Some((cut, _)) = self.text.char_indices().nth(max) {
                self.text.truncate(cut);
            }
        }
    }

    fn delete_backward(&mut self) -> bool {
        match self.text.grapheme_indices(true).next_back() {
            Some((start, _)) => {
                self.text.truncate(start);
                true
            }
            None => false,
        }
    }
}

impl Widget for TextField {
    fn kind(&self) -> &'static str {
        "TextField"
    }

    fn draw(&mut self, cx: &mut DrawCx<'_>, canvas: &mut Canvas<'_>) {
        let local = cx.local_bounds();
        canvas.fill_rect(local, &Brush::Solid(self.background));
        canvas.stroke_rect(local, self.border, 1.0);
        if cx.is_focused() {
            // pen centered on the inset line; the outer half is clipped away
            canvas.stroke_rect(local, self.highlight, HIGHLIGHT_INSET + HIGHLIGHT_PEN / 2.0);
        }
        let area = Rect::new(
            TEXT_INSET,
            TEXT_INSET,
            local.w - 2.0 * TEXT_INSET,
            local.h - 2.0 * TEXT_INSET,
        );
        draw_text_in(canvas, &self.text, &self.font, self.text_color, area, self.alignment);
    }

    fn on_gesture(&mut self, gesture: &Gesture, cx: &mut EventCx<'_>) {
        if let Gesture::Tap(_) = gesture {
            let id = cx.id();
            cx.focus().focus(id);
            cx.request_redraw();
        }
    }

    fn on_key(&mut self, key: KeyInput, cx: &mut EventCx<'_>) {
        let changed = match key {
            KeyInput::Char(c) if !c.is_control() && self.has_room() => {
                self.text.push(c);
                true
            }
            KeyInput::Char(_) => false,
            KeyInput::Down(Key::Backspace) => self.delete_backward(),
            KeyInput::Down(Key::Return) if self.single_line => {
                cx.submit(self.text.clone());
                false
            }
            KeyInput::Down(Key::Return) if self.has_room() => {
                self.text.push('\n');
                true
            }
            KeyInput::Down(Key::Tab) => match self.next_field {
                Some(next) => {
                    cx.focus().transfer(next);
                    true
                }
                None => false,
            },
            KeyInput::Down(Key::Escape) => {
                cx.focus().release();
                true
            }
            KeyInput::Down(_) => false,
        };
        if changed {
            cx.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tree;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tactile_core::{FrameBuffer, Size, Vec2};

    fn tree() -> Tree {
        Tree::new(Size::new(800.0, 480.0))
    }

    fn field(t: &mut Tree, y: f32, f: TextField) -> NodeId {
        t.spawn(t.root(), Rect::new(10.0, y, 200.0, 30.0), f).unwrap()
    }

    fn text(t: &Tree, id: NodeId) -> String {
        t.widget::<TextField>(id).unwrap().text().to_string()
    }

    fn type_str(t: &mut Tree, s: &str) {
        for c in s.chars() {
            t.key_input(KeyInput::Char(c));
        }
    }

    #[test]
    fn test_tap_focuses_and_captures() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let c = calls.clone();
        let mut t = tree().with_capture(move |on: bool| c.lock().push(on));
        let a = field(&mut t, 10.0, TextField::new());

        t.dispatch_gesture(Gesture::Tap(Vec2::new(20.0, 20.0)));
        assert_eq!(t.focus().current_focus(), Some(a));
        assert!(t.focus().is_captured());

        type_str(&mut t, "hi");
        assert_eq!(text(&t, a), "hi");

        // a press anywhere drops capture but keeps the text
        t.dispatch_gesture(Gesture::Press { touches: 1, position: Vec2::new(500.0, 400.0) });
        assert!(!t.focus().is_captured());
        type_str(&mut t, "x");
        assert_eq!(text(&t, a), "hi");
        assert_eq!(*calls.lock(), vec![true, false]);
    }

    #[test]
    fn test_keys_ignored_without_focus() {
        let mut t = tree();
        let a = field(&mut t, 10.0, TextField::new());
        type_str(&mut t, "abc");
        assert_eq!(text(&t, a), "");
    }

    #[test]
    fn test_tab_transfers_focus_without_typing() {
        let mut t = tree();
        let b = field(&mut t, 60.0, TextField::new().with_text("b"));
        let a = field(&mut t, 10.0, TextField::new().with_text("a").with_next(b));
        t.set_focus(a).unwrap();

        t.key_input(KeyInput::Down(Key::Tab));
        t.key_input(KeyInput::Char('\t'));

        assert_eq!(t.focus().current_focus(), Some(b));
        assert!(t.focus().is_focused(b));
        assert_eq!(text(&t, a), "a");
        assert_eq!(text(&t, b), "b");

        type_str(&mut t, "c");
        assert_eq!(text(&t, b), "bc");
    }

    #[test]
    fn test_char_limit_and_backspace() {
        let mut t = tree();
        let a = field(&mut t, 10.0, TextField::new().with_max_len(3));
        t.set_focus(a).unwrap();

        type_str(&mut t, "abcdef");
        assert_eq!(text(&t, a), "abc");

        t.key_input(KeyInput::Down(Key::Backspace));
        assert_eq!(text(&t, a), "ab");

        t.update::<TextField, _>(a, |f| f.set_text("e\u{301}"))
            .unwrap();
        t.key_input(KeyInput::Down(Key::Backspace));
        assert_eq!(text(&t, a), "");
        t.key_input(KeyInput::Down(Key::Backspace));
        assert_eq!(text(&t, a), "");
    }

    #[test]
    fn test_return_submits_single_line_and_breaks_multi_line() {
        let mut t = tree();
        let single = field(&mut t, 10.0, TextField::new().with_text("go"));
        let multi = field(&mut t, 60.0, TextField::new().multi_line().with_max_len(3));
        let submitted = Arc::new(Mutex::new(Vec::new()));
        let s = submitted.clone();
        t.on_submit(single, move |_, _, text| s.lock().push(text.to_string()))
            .unwrap();

        t.set_focus(single).unwrap();
        t.key_input(KeyInput::Down(Key::Return));
        t.key_input(KeyInput::Char('\r'));
        assert_eq!(*submitted.lock(), vec!["go".to_string()]);
        assert_eq!(text(&t, single), "go");

        t.set_focus(multi).unwrap();
        type_str(&mut t, "ab");
        t.key_input(KeyInput::Down(Key::Return));
        t.key_input(KeyInput::Down(Key::Return));
        assert_eq!(text(&t, multi), "ab\n");
    }

    #[test]
    fn test_focus_ring_drawn_only_while_focused() {
        let mut t = tree();
        let a = field(&mut t, 10.0, TextField::new());
        let mut fb = FrameBuffer::new(800, 480);

        t.render(&mut fb);
        assert_eq!(fb.pixel(12, 20), Some(Color::WHITE));

        t.set_focus(a).unwrap();
        t.render(&mut fb);
        assert_eq!(fb.pixel(12, 20), Some(Color::GREEN));
        assert_eq!(fb.pixel(10, 20), Some(Color::GREEN));
        assert_eq!(fb.pixel(14, 20), Some(Color::WHITE));
    }

    #[test]
    fn test_tab_to_missing_or_disabled_field_releases_keyboard() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let c = calls.clone();
        let mut t = tree().with_capture(move |on: bool| c.lock().push(on));
        let root = t.root();
        let gone = field(&mut t, 60.0, TextField::new());
        let a = field(&mut t, 10.0, TextField::new().with_next(gone));
        t.remove(root, gone).unwrap();
        t.dispose(gone).unwrap();

        t.set_focus(a).unwrap();
        t.key_input(KeyInput::Down(Key::Tab));
        assert_eq!(t.focus().current_focus(), None);
        assert!(!t.focus().is_captured());
        assert_eq!(*calls.lock(), vec![true, false]);

        let off = field(&mut t, 110.0, TextField::new());
        t.set_enabled(off, false).unwrap();
        t.update::<TextField, _>(a, |f| f.set_next(Some(off))).unwrap();
        t.set_focus(a).unwrap();
        t.key_input(KeyInput::Down(Key::Tab));
        assert!(!t.focus().is_captured());
        type_str(&mut t, "x");
        assert_eq!(text(&t, a), "");
        assert_eq!(text(&t, off), "");
    }
}
