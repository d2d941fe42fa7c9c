//! Drag-to-scroll container.
//!
//! The content box is the bounding box of all children anchored at (0,0).
//! The offset is clamped per axis to `viewport - content ..= 0`, and forced to
//! zero on an axis where the content fits. A press starts a drag (and still
//! reaches the children), finger moves while dragging scroll and are
//! consumed, and any release on the pad ends the drag.

use tactile_core::{Brush, Canvas, Gesture, Rect, Size, Vec2};

use crate::panel::Panel;
use crate::widget::{DrawCx, EventCx, Route, Widget};

#[derive(Clone, Debug, Default)]
pub struct ScrollPanel {
    pub panel: Panel,
    content: Rect,
    viewport: Size,
    offset: Vec2,
    dragging: bool,
    last: Vec2,
}

impl ScrollPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background(mut self, background: impl Into<Brush>) -> Self {
        self.panel.background = background.into();
        self
    }

    pub fn content_bounds(&self) -> Rect {
        self.content
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn scroll_offset(&self) -> Vec2 {
        self.offset
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn scroll_by(&mut self, delta: Vec2) {
        self.scroll_to(self.offset + delta);
    }

    pub fn scroll_to(&mut self, offset: Vec2) {
        self.offset = Vec2::new(
            clamp_axis(offset.x, self.viewport.width, self.content.w),
            clamp_axis(offset.y, self.viewport.height, self.content.h),
        );
    }
}

fn clamp_axis(offset: f32, viewport: f32, content: f32) -> f32 {
    if content > viewport {
        offset.clamp(viewport - content, 0.0)
    } else {
        0.0
    }
}

impl Widget for ScrollPanel {
    fn kind(&self) -> &'static str {
        "ScrollPanel"
    }

    fn draw(&mut self, cx: &mut DrawCx<'_>, canvas: &mut Canvas<'_>) {
        self.panel.paint(cx.local_bounds(), canvas);
    }

    fn accepts_children(&self) -> bool {
        true
    }

    fn content_offset(&self) -> Vec2 {
        self.offset
    }

    fn children_changed(&mut self, viewport: Size, children: &[Rect]) {
        let (w, h) = children.iter().fold((0.0f32, 0.0f32), |(w, h), r| {
            (w.max(r.right()), h.max(r.bottom()))
        });
        self.viewport = viewport;
        self.content = Rect::new(0.0, 0.0, w, h);
        self.scroll_to(self.offset);
    }

    fn intercept(&mut self, gesture: &Gesture, cx: &mut EventCx<'_>) -> Route {
        match *gesture {
            Gesture::Press { position, .. } => {
                self.dragging = true;
                self.last = position;
                Route::Continue
            }
            Gesture::Move(position) if self.dragging => {
                let before = self.offset;
                self.scroll_by(position - self.last);
                self.last = position;
                if self.offset != before {
                    cx.request_redraw();
                }
                Route::Consume
            }
            Gesture::Release { .. } => {
                self.dragging = false;
                Route::Continue
            }
            _ => Route::Continue,
        }
    }

    fn on_release_anywhere(&mut self) -> bool {
        self.dragging = false;
        false
    }
}
