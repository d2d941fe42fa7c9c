use std::any::Any;

use tactile_core::{Canvas, Gesture, KeyInput, Rect, Size, Vec2};

use crate::focus::FocusManager;
use crate::tree::NodeId;

/// Whether a container lets a gesture continue to its children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Continue,
    Consume,
}

/// Behaviour attached to a node slot.
///
/// Bounds, enable state, parent links and subscribers live in the tree;
/// a widget only knows how to draw itself and react to what reaches it.
pub trait Widget: Any + Send {
    /// Short type name, used in diagnostics.
    fn kind(&self) -> &'static str;

    /// Draw in local coordinates; `canvas` is already clipped to the node.
    fn draw(&mut self, cx: &mut DrawCx<'_>, canvas: &mut Canvas<'_>);

    fn accepts_children(&self) -> bool {
        false
    }

    /// Containers whose children are fixed after construction return true;
    /// the tree then ignores external add/remove calls on them.
    fn is_sealed(&self) -> bool {
        false
    }

    /// Translation applied to children, both for drawing and hit-testing.
    fn content_offset(&self) -> Vec2 {
        Vec2::ZERO
    }

    /// Called at the start of each render pass. A new size replaces the
    /// node's size.
    fn remeasure(&mut self) -> Option<Size> {
        None
    }

    /// The set or bounds of this container's children changed.
    fn children_changed(&mut self, _viewport: Size, _children: &[Rect]) {}

    /// Seen by a container before the gesture is routed to its children.
    fn intercept(&mut self, _gesture: &Gesture, _cx: &mut EventCx<'_>) -> Route {
        Route::Continue
    }

    /// The gesture landed on this node and no child took it.
    fn on_gesture(&mut self, _gesture: &Gesture, _cx: &mut EventCx<'_>) {}

    fn on_key(&mut self, _key: KeyInput, _cx: &mut EventCx<'_>) {}

    /// A release happened somewhere on the pad. Return true to redraw.
    fn on_release_anywhere(&mut self) -> bool {
        false
    }
}

pub struct EventCx<'a> {
    pub(crate) id: NodeId,
    pub(crate) size: Size,
    pub(crate) focus: &'a mut FocusManager,
    pub(crate) redraw: bool,
    pub(crate) submitted: Option<String>,
}

impl EventCx<'_> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn focus(&mut self) -> &mut FocusManager {
        self.focus
    }

    pub fn request_redraw(&mut self) {
        self.redraw = true;
    }

    /// Fire this node's submit subscribers once the widget returns.
    pub fn submit(&mut self, text: impl Into<String>) {
        self.submitted = Some(text.into());
    }
}

pub struct DrawCx<'a> {
    pub(crate) id: NodeId,
    pub(crate) size: Size,
    pub(crate) focus: &'a FocusManager,
    pub(crate) redraw: bool,
}

impl DrawCx<'_> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Local bounds, i.e. `(0, 0, size)`.
    pub fn local_bounds(&self) -> Rect {
        Rect::from_origin_size(Vec2::ZERO, self.size)
    }

    /// Focused and receiving keys.
    pub fn is_focused(&self) -> bool {
        self.focus.is_focused(self.id)
    }

    pub fn keyboard_captured(&self) -> bool {
        self.focus.is_captured()
    }

    /// Schedule another frame after this one.
    pub fn request_redraw(&mut self) {
        self.redraw = true;
    }
}
