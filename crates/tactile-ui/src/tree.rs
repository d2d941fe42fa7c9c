//! Arena-backed node tree.
//!
//! Every node lives in one slot map; parents are plain keys so a removed or
//! disposed node can never leave a dangling back-reference. All mutation,
//! hit-testing and drawing happen on whichever thread owns the tree (the
//! compositor's redraw thread in practice).

use std::any::{Any, type_name};
use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;
use tactile_core::{Canvas, FrameBuffer, Gesture, GestureKind, KeyInput, Rect, Size, Vec2};

use crate::error::TreeError;
use crate::focus::{FocusManager, KeyboardCapture};
use crate::panel::Panel;
use crate::widget::{DrawCx, EventCx, Route, Widget};

new_key_type! {
    pub struct NodeId;
}

/// Which overlapping child wins a hit test.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HitOrder {
    /// Earliest-added child wins.
    #[default]
    FirstAdded,
    /// Last-added (visually topmost) child wins.
    Topmost,
}

pub type GestureHandler = Box<dyn FnMut(&mut Tree, NodeId, Gesture) + Send>;
pub type NodeHandler = Box<dyn FnMut(&mut Tree, NodeId) + Send>;
pub type SubmitHandler = Box<dyn FnMut(&mut Tree, NodeId, &str) + Send>;

#[derive(Default)]
struct Handlers {
    tap: Vec<GestureHandler>,
    press: Vec<GestureHandler>,
    release: Vec<GestureHandler>,
    finger_over: Vec<GestureHandler>,
    enable: Vec<NodeHandler>,
    disable: Vec<NodeHandler>,
    submit: Vec<SubmitHandler>,
}

impl Handlers {
    fn taps(&mut self) -> &mut Vec<GestureHandler> {
        &mut self.tap
    }
    fn presses(&mut self) -> &mut Vec<GestureHandler> {
        &mut self.press
    }
    fn releases(&mut self) -> &mut Vec<GestureHandler> {
        &mut self.release
    }
    fn finger_overs(&mut self) -> &mut Vec<GestureHandler> {
        &mut self.finger_over
    }
    fn enables(&mut self) -> &mut Vec<NodeHandler> {
        &mut self.enable
    }
    fn disables(&mut self) -> &mut Vec<NodeHandler> {
        &mut self.disable
    }
    fn submits(&mut self) -> &mut Vec<SubmitHandler> {
        &mut self.submit
    }
}

fn gesture_list(kind: GestureKind) -> fn(&mut Handlers) -> &mut Vec<GestureHandler> {
    match kind {
        GestureKind::Tap => Handlers::taps,
        GestureKind::Press => Handlers::presses,
        GestureKind::Release => Handlers::releases,
        GestureKind::Move => Handlers::finger_overs,
    }
}

struct NodeSlot {
    /// Relative to the parent's content origin.
    bounds: Rect,
    enabled: bool,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 8]>,
    handlers: Handlers,
    widget: Box<dyn Widget>,
}

impl NodeSlot {
    fn new(bounds: Rect, widget: Box<dyn Widget>) -> Self {
        Self {
            bounds,
            enabled: true,
            parent: None,
            children: SmallVec::new(),
            handlers: Handlers::default(),
            widget,
        }
    }
}

pub struct Tree {
    nodes: SlotMap<NodeId, NodeSlot>,
    root: NodeId,
    focus: FocusManager,
    hit_order: HitOrder,
    release_capture_on_press: bool,
    dirty: bool,
    capture_observers: Vec<NodeId>,
}

impl Tree {
    /// A tree whose root is a black [`Panel`] of `size` at the origin.
    pub fn new(size: Size) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(NodeSlot::new(
            Rect::from_origin_size(Vec2::ZERO, size),
            Box::new(Panel::new()),
        ));
        Self {
            nodes,
            root,
            focus: FocusManager::default(),
            hit_order: HitOrder::default(),
            release_capture_on_press: true,
            dirty: true,
            capture_observers: Vec::new(),
        }
    }

    pub fn with_capture(mut self, capture: impl KeyboardCapture + 'static) -> Self {
        self.focus.set_capture(capture);
        self
    }

    pub fn with_hit_order(mut self, order: HitOrder) -> Self {
        self.hit_order = order;
        self
    }

    pub fn set_hit_order(&mut self, order: HitOrder) {
        self.hit_order = order;
    }

    pub fn hit_order(&self) -> HitOrder {
        self.hit_order
    }

    /// When set (the default) every press drops keyboard focus before it is
    /// dispatched, so pressing outside a text field ends editing.
    pub fn set_release_capture_on_press(&mut self, release: bool) {
        self.release_capture_on_press = release;
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Size of the root, i.e. the display.
    pub fn size(&self) -> Size {
        self.nodes
            .get(self.root)
            .map(|s| s.bounds.size())
            .unwrap_or(Size::ZERO)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn focus(&self) -> &FocusManager {
        &self.focus
    }

    fn slot(&self, id: NodeId) -> Result<&NodeSlot, TreeError> {
        self.nodes.get(id).ok_or(TreeError::UnknownNode(id))
    }

    fn slot_mut(&mut self, id: NodeId) -> Result<&mut NodeSlot, TreeError> {
        self.nodes.get_mut(id).ok_or(TreeError::UnknownNode(id))
    }

    // ---- structure ----

    /// Insert a detached node.
    pub fn insert(&mut self, bounds: Rect, widget: impl Widget) -> NodeId {
        self.insert_boxed(bounds, Box::new(widget))
    }

    pub fn insert_boxed(&mut self, bounds: Rect, widget: Box<dyn Widget>) -> NodeId {
        self.nodes.insert(NodeSlot::new(bounds, widget))
    }

    /// Insert a node and attach it under `parent`.
    pub fn spawn(
        &mut self,
        parent: NodeId,
        bounds: Rect,
        widget: impl Widget,
    ) -> Result<NodeId, TreeError> {
        let id = self.insert(bounds, widget);
        if let Err(e) = self.add(parent, id) {
            self.nodes.remove(id);
            return Err(e);
        }
        Ok(id)
    }

    /// Append `child` to `parent`'s children. Adding a node that is already a
    /// child of `parent` does nothing.
    pub fn add(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let parent_slot = self.slot(parent)?;
        let child_slot = self.slot(child)?;
        if child == self.root {
            return Err(TreeError::RootReparent);
        }
        if !parent_slot.widget.accepts_children() {
            return Err(TreeError::NotAContainer(parent));
        }
        if parent_slot.widget.is_sealed() {
            log::debug!("ignoring add of {child:?} to sealed {}", parent_slot.widget.kind());
            return Ok(());
        }
        match child_slot.parent {
            Some(p) if p == parent => return Ok(()),
            Some(p) => return Err(TreeError::AlreadyAttached { child, parent: p }),
            None => {}
        }
        if self.is_ancestor(child, parent) {
            return Err(TreeError::WouldCycle { child, parent });
        }

        let parent_enabled = parent_slot.enabled;
        let child_enabled = child_slot.enabled;
        self.slot_mut(parent)?.children.push(child);
        self.slot_mut(child)?.parent = Some(parent);
        if !parent_enabled && child_enabled {
            self.set_enabled(child, false)?;
        }
        self.children_changed(parent);
        self.request_redraw(parent);
        Ok(())
    }

    /// Detach `child` from `parent`. Not a child: no-op.
    pub fn remove(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let parent_slot = self.slot(parent)?;
        self.slot(child)?;
        if parent_slot.widget.is_sealed() {
            log::debug!("ignoring remove of {child:?} from sealed {}", parent_slot.widget.kind());
            return Ok(());
        }
        let Some(pos) = parent_slot.children.iter().position(|c| *c == child) else {
            return Ok(());
        };
        self.slot_mut(parent)?.children.remove(pos);
        self.slot_mut(child)?.parent = None;

        if let Some(focused) = self.focus.current_focus() {
            if self.is_ancestor(child, focused) {
                self.focus.release();
            }
        }
        self.children_changed(parent);
        self.request_redraw(parent);
        self.sync_capture();
        Ok(())
    }

    /// Release a detached node and its whole subtree.
    pub fn dispose(&mut self, id: NodeId) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RootDispose);
        }
        if let Some(parent) = self.slot(id)?.parent {
            log::error!("dispose of {id:?} while still attached to {parent:?}");
            return Err(TreeError::DisposeAttached(id));
        }
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if let Some(slot) = self.nodes.remove(n) {
                stack.extend(slot.children.iter().copied());
            }
            self.focus.forget(n);
            self.capture_observers.retain(|o| *o != n);
        }
        self.sync_capture();
        Ok(())
    }

    /// True when `ancestor` is `node` or one of its parents.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.nodes.get(n).and_then(|s| s.parent);
        }
        false
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|s| s.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|s| s.children.as_slice()).unwrap_or(&[])
    }

    // ---- geometry ----

    pub fn bounds(&self, id: NodeId) -> Result<Rect, TreeError> {
        Ok(self.slot(id)?.bounds)
    }

    pub fn position(&self, id: NodeId) -> Result<Vec2, TreeError> {
        Ok(self.slot(id)?.bounds.origin())
    }

    pub fn size_of(&self, id: NodeId) -> Result<Size, TreeError> {
        Ok(self.slot(id)?.bounds.size())
    }

    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RootBoundsFixed);
        }
        let slot = self.slot_mut(id)?;
        slot.bounds = bounds;
        let parent = slot.parent;
        // own viewport for scroll containers
        self.children_changed(id);
        if let Some(p) = parent {
            self.children_changed(p);
        }
        self.request_redraw(id);
        Ok(())
    }

    pub fn set_position(&mut self, id: NodeId, position: Vec2) -> Result<(), TreeError> {
        let bounds = self.bounds(id)?.with_origin(position);
        self.set_bounds(id, bounds)
    }

    /// Bounds in root coordinates, including ancestors' content offsets.
    pub fn absolute_bounds(&self, id: NodeId) -> Result<Rect, TreeError> {
        let slot = self.slot(id)?;
        let mut origin = slot.bounds.origin();
        let mut cur = slot.parent;
        while let Some(p) = cur {
            let Some(ps) = self.nodes.get(p) else { break };
            origin = origin + ps.bounds.origin() + ps.widget.content_offset();
            cur = ps.parent;
        }
        Ok(slot.bounds.with_origin(origin))
    }

    // ---- enable state ----

    pub fn is_enabled(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|s| s.enabled)
    }

    /// Set the flag on every descendant first, then on `id`. Subscribers fire
    /// only for nodes whose flag actually changed.
    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) -> Result<(), TreeError> {
        let children = self.slot(id)?.children.clone();
        for child in children {
            self.set_enabled(child, enabled)?;
        }
        let slot = self.slot_mut(id)?;
        let changed = slot.enabled != enabled;
        slot.enabled = enabled;
        if changed {
            let list: fn(&mut Handlers) -> &mut Vec<NodeHandler> = if enabled {
                Handlers::enables
            } else {
                Handlers::disables
            };
            self.run_handlers(id, list, |h, tree| h(tree, id));
        }
        self.request_redraw(id);
        Ok(())
    }

    // ---- widgets ----

    pub fn kind(&self, id: NodeId) -> Result<&'static str, TreeError> {
        Ok(self.slot(id)?.widget.kind())
    }

    pub fn widget<W: Widget>(&self, id: NodeId) -> Result<&W, TreeError> {
        let slot = self.slot(id)?;
        let any: &dyn Any = &*slot.widget;
        any.downcast_ref::<W>().ok_or(TreeError::WidgetType {
            id,
            expected: short_type_name::<W>(),
            actual: slot.widget.kind(),
        })
    }

    /// Direct widget access. Changes made through it are picked up by the
    /// next render; use [`Tree::update`] to also schedule that render.
    pub fn widget_mut<W: Widget>(&mut self, id: NodeId) -> Result<&mut W, TreeError> {
        let slot = self.slot_mut(id)?;
        let actual = slot.widget.kind();
        let any: &mut dyn Any = &mut *slot.widget;
        any.downcast_mut::<W>().ok_or(TreeError::WidgetType {
            id,
            expected: short_type_name::<W>(),
            actual,
        })
    }

    /// Mutate a widget and request a redraw.
    pub fn update<W: Widget, R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut W) -> R,
    ) -> Result<R, TreeError> {
        let r = f(self.widget_mut::<W>(id)?);
        self.request_redraw(id);
        Ok(r)
    }

    // ---- subscribers ----

    pub fn on_tap(
        &mut self,
        id: NodeId,
        f: impl FnMut(&mut Tree, NodeId, Gesture) + Send + 'static,
    ) -> Result<(), TreeError> {
        self.slot_mut(id)?.handlers.tap.push(Box::new(f));
        Ok(())
    }

    pub fn on_press(
        &mut self,
        id: NodeId,
        f: impl FnMut(&mut Tree, NodeId, Gesture) + Send + 'static,
    ) -> Result<(), TreeError> {
        self.slot_mut(id)?.handlers.press.push(Box::new(f));
        Ok(())
    }

    pub fn on_release(
        &mut self,
        id: NodeId,
        f: impl FnMut(&mut Tree, NodeId, Gesture) + Send + 'static,
    ) -> Result<(), TreeError> {
        self.slot_mut(id)?.handlers.release.push(Box::new(f));
        Ok(())
    }

    pub fn on_finger_over(
        &mut self,
        id: NodeId,
        f: impl FnMut(&mut Tree, NodeId, Gesture) + Send + 'static,
    ) -> Result<(), TreeError> {
        self.slot_mut(id)?.handlers.finger_over.push(Box::new(f));
        Ok(())
    }

    pub fn on_enable(
        &mut self,
        id: NodeId,
        f: impl FnMut(&mut Tree, NodeId) + Send + 'static,
    ) -> Result<(), TreeError> {
        self.slot_mut(id)?.handlers.enable.push(Box::new(f));
        Ok(())
    }

    pub fn on_disable(
        &mut self,
        id: NodeId,
        f: impl FnMut(&mut Tree, NodeId) + Send + 'static,
    ) -> Result<(), TreeError> {
        self.slot_mut(id)?.handlers.disable.push(Box::new(f));
        Ok(())
    }

    pub fn on_submit(
        &mut self,
        id: NodeId,
        f: impl FnMut(&mut Tree, NodeId, &str) + Send + 'static,
    ) -> Result<(), TreeError> {
        self.slot_mut(id)?.handlers.submit.push(Box::new(f));
        Ok(())
    }

    // Handlers get `&mut Tree`, so the list is lifted out of its slot for the
    // duration of the call. Anything subscribed meanwhile is appended after.
    fn run_handlers<H>(
        &mut self,
        id: NodeId,
        list: fn(&mut Handlers) -> &mut Vec<H>,
        mut call: impl FnMut(&mut H, &mut Tree),
    ) {
        let mut taken = match self.nodes.get_mut(id) {
            Some(slot) => std::mem::take(list(&mut slot.handlers)),
            None => return,
        };
        if taken.is_empty() {
            return;
        }
        // the list goes back even if a handler unwinds
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            for handler in taken.iter_mut() {
                call(handler, self);
            }
        }));
        if let Some(slot) = self.nodes.get_mut(id) {
            let current = list(&mut slot.handlers);
            let added = std::mem::replace(current, taken);
            current.extend(added);
        }
        if let Err(payload) = outcome {
            resume_unwind(payload);
        }
    }

    // ---- redraw ----

    /// Forward a redraw request up to the root. Detached nodes are ignored.
    pub fn request_redraw(&mut self, id: NodeId) {
        let mut cur = Some(id);
        while let Some(n) = cur {
            if n == self.root {
                self.dirty = true;
                return;
            }
            cur = self.nodes.get(n).and_then(|s| s.parent);
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // ---- hit testing & dispatch ----

    /// Child of `panel` under `point` (in `panel`'s local coordinates).
    pub fn hit_test(&self, panel: NodeId, point: Vec2) -> Option<NodeId> {
        let slot = self.nodes.get(panel)?;
        let p = point - slot.widget.content_offset();
        let hit = |c: &NodeId| {
            self.nodes
                .get(*c)
                .is_some_and(|n| n.enabled && n.bounds.contains(p))
        };
        match self.hit_order {
            HitOrder::FirstAdded => slot.children.iter().copied().find(hit),
            HitOrder::Topmost => slot.children.iter().rev().copied().find(hit),
        }
    }

    /// Route a gesture given in root coordinates.
    pub fn dispatch_gesture(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Press { .. } if self.release_capture_on_press => self.focus.release(),
            Gesture::Release { .. } => self.broadcast_release(),
            _ => {}
        }
        self.dispatch_at(self.root, gesture);
        self.sync_capture();
    }

    fn broadcast_release(&mut self) {
        let touched: Vec<NodeId> = self
            .nodes
            .iter_mut()
            .filter_map(|(id, slot)| slot.widget.on_release_anywhere().then_some(id))
            .collect();
        for id in touched {
            self.request_redraw(id);
        }
    }

    fn dispatch_at(&mut self, id: NodeId, gesture: Gesture) {
        if self.with_event_cx(id, |w, cx| w.intercept(&gesture, cx)) == Some(Route::Consume) {
            return;
        }
        let point = gesture.position();
        if let Some(child) = self.hit_test(id, point) {
            let offset = self.nodes.get(id).map(|s| s.widget.content_offset()).unwrap_or(Vec2::ZERO);
            let origin = self.nodes.get(child).map(|s| s.bounds.origin()).unwrap_or(Vec2::ZERO);
            self.dispatch_at(child, gesture.at(point - offset - origin));
            return;
        }
        log::trace!("{:?} handled by {id:?}", gesture.kind());
        self.with_event_cx(id, |w, cx| w.on_gesture(&gesture, cx));
        self.run_handlers(id, gesture_list(gesture.kind()), |h, tree| h(tree, id, gesture));
    }

    fn with_event_cx<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut dyn Widget, &mut EventCx<'_>) -> R,
    ) -> Option<R> {
        let slot = self.nodes.get_mut(id)?;
        let mut cx = EventCx {
            id,
            size: slot.bounds.size(),
            focus: &mut self.focus,
            redraw: false,
            submitted: None,
        };
        let r = f(&mut *slot.widget, &mut cx);
        let EventCx {
            redraw, submitted, ..
        } = cx;
        if redraw {
            self.request_redraw(id);
        }
        if let Some(text) = submitted {
            self.run_handlers(id, Handlers::submits, |h, tree| h(tree, id, &text));
        }
        Some(r)
    }

    // ---- keyboard ----

    /// Deliver a key to the focused node while capture is held.
    pub fn key_input(&mut self, key: KeyInput) {
        match key {
            KeyInput::Down(_) => self.focus.begin_keystroke(),
            KeyInput::Char(c) => {
                if self.focus.swallow_char(c) {
                    log::trace!("swallowed {c:?} after focus transfer");
                    return;
                }
            }
        }
        if !self.focus.is_captured() {
            return;
        }
        let Some(id) = self.focus.current_focus() else {
            return;
        };
        if !self.is_enabled(id) {
            return;
        }
        self.with_event_cx(id, |w, cx| w.on_key(key, cx));
        // focus may have moved to a node that is gone or disabled
        if let Some(target) = self.focus.current_focus() {
            if !self.is_enabled(target) {
                log::debug!("focus target {target:?} unavailable; releasing keyboard");
                self.focus.release();
            }
        }
        self.sync_capture();
    }

    /// Focus `id` and take keyboard capture.
    pub fn set_focus(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.slot(id)?;
        self.focus.focus(id);
        self.request_redraw(id);
        self.sync_capture();
        Ok(())
    }

    pub fn release_focus(&mut self) {
        self.focus.release();
        self.sync_capture();
    }

    /// Keep `id` enabled exactly while keyboard capture is held.
    pub fn observe_capture(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.slot(id)?;
        if !self.capture_observers.contains(&id) {
            self.capture_observers.push(id);
        }
        self.set_enabled(id, self.focus.is_captured())
    }

    fn sync_capture(&mut self) {
        let Some(captured) = self.focus.take_capture_change() else {
            return;
        };
        log::debug!(
            "keyboard capture {}",
            if captured { "acquired" } else { "released" }
        );
        for id in self.capture_observers.clone() {
            if let Err(e) = self.set_enabled(id, captured) {
                log::warn!("capture observer: {e}");
            }
        }
        self.dirty = true;
    }

    // ---- rendering ----

    fn children_changed(&mut self, id: NodeId) {
        let Some(slot) = self.nodes.get(id) else {
            return;
        };
        let rects: SmallVec<[Rect; 8]> = slot
            .children
            .iter()
            .filter_map(|c| self.nodes.get(*c))
            .map(|n| n.bounds)
            .collect();
        if let Some(slot) = self.nodes.get_mut(id) {
            let viewport = slot.bounds.size();
            slot.widget.children_changed(viewport, &rects);
        }
    }

    // Post-order so containers see their children's final sizes.
    fn prepare(&mut self, id: NodeId) {
        let Some(children) = self.nodes.get(id).map(|s| s.children.clone()) else {
            return;
        };
        let mut resized = false;
        for child in children {
            self.prepare(child);
            if let Some(slot) = self.nodes.get_mut(child) {
                if let Some(size) = slot.widget.remeasure() {
                    if size != slot.bounds.size() {
                        slot.bounds = slot.bounds.with_size(size);
                        resized = true;
                    }
                }
            }
        }
        if resized {
            self.children_changed(id);
        }
    }

    /// Re-measure pending nodes and composite the enabled tree into `fb`.
    pub fn render(&mut self, fb: &mut FrameBuffer) {
        self.prepare(self.root);
        let mut canvas = fb.canvas();
        self.draw_node(self.root, &mut canvas);
    }

    fn draw_node(&mut self, id: NodeId, canvas: &mut Canvas<'_>) {
        let Some(slot) = self.nodes.get_mut(id) else {
            return;
        };
        let size = slot.bounds.size();
        let mut cx = DrawCx {
            id,
            size,
            focus: &self.focus,
            redraw: false,
        };
        slot.widget.draw(&mut cx, canvas);
        if cx.redraw {
            self.dirty = true;
        }
        if slot.children.is_empty() {
            return;
        }
        let offset = slot.widget.content_offset();
        let children = slot.children.clone();

        let viewport = Rect::from_origin_size(Vec2::ZERO, size);
        let mut content = canvas.layer_with(viewport, offset);
        for child in children {
            let Some(c) = self.nodes.get(child) else {
                continue;
            };
            if !c.enabled {
                continue;
            }
            let mut layer = content.layer(c.bounds);
            self.draw_node(child, &mut layer);
        }
    }
}

fn short_type_name<T>() -> &'static str {
    let full = type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
