//! Keyboard focus for text fields.
//!
//! At most one node holds focus. Keyboard events only reach it while the
//! capture collaborator has granted capture; focus and capture are taken and
//! released together.

use crate::tree::NodeId;

/// Grants or releases keyboard capture on the hardware.
pub trait KeyboardCapture: Send {
    fn request_capture(&mut self, capture: bool);
}

impl<F> KeyboardCapture for F
where
    F: FnMut(bool) + Send,
{
    fn request_capture(&mut self, capture: bool) {
        self(capture)
    }
}

/// Capture collaborator for setups without a physical keyboard hook.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCapture;

impl KeyboardCapture for NoCapture {
    fn request_capture(&mut self, _capture: bool) {}
}

pub struct FocusManager {
    focused: Option<NodeId>,
    captured: bool,
    // one-shot: the keystroke that moved focus must not reach the new target
    just_transferred: bool,
    capture: Box<dyn KeyboardCapture>,
    capture_change: Option<bool>,
}

impl Default for FocusManager {
    fn default() -> Self {
        Self::new(NoCapture)
    }
}

impl FocusManager {
    pub fn new(capture: impl KeyboardCapture + 'static) -> Self {
        Self {
            focused: None,
            captured: false,
            just_transferred: false,
            capture: Box::new(capture),
            capture_change: None,
        }
    }

    pub fn set_capture(&mut self, capture: impl KeyboardCapture + 'static) {
        self.capture = Box::new(capture);
    }

    /// Focus `id` and take keyboard capture.
    pub fn focus(&mut self, id: NodeId) {
        if self.focused != Some(id) {
            log::debug!("focus -> {id:?}");
        }
        self.focused = Some(id);
        self.set_captured(true);
    }

    /// Move focus from the current field to `id` as the result of a keystroke.
    pub fn transfer(&mut self, id: NodeId) {
        self.focused = Some(id);
        self.just_transferred = true;
        self.set_captured(true);
    }

    /// Drop focus and release capture. Field contents are untouched.
    pub fn release(&mut self) {
        self.focused = None;
        self.just_transferred = false;
        self.set_captured(false);
    }

    pub fn current_focus(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Focused and holding capture, i.e. receiving keys.
    pub fn is_focused(&self, id: NodeId) -> bool {
        self.captured && self.focused == Some(id)
    }

    fn set_captured(&mut self, captured: bool) {
        if self.captured == captured {
            return;
        }
        self.captured = captured;
        self.capture.request_capture(captured);
        self.capture_change = Some(captured);
    }

    pub(crate) fn take_capture_change(&mut self) -> Option<bool> {
        self.capture_change.take()
    }

    /// Called once per key-down: a fresh keystroke closes the suppression
    /// window left by the previous transfer.
    pub(crate) fn begin_keystroke(&mut self) {
        self.just_transferred = false;
    }

    /// True when `c` is the character half of the keystroke that just moved
    /// focus and must be swallowed.
    pub(crate) fn swallow_char(&mut self, c: char) -> bool {
        let swallow = self.just_transferred && c == '\t';
        self.just_transferred = false;
        swallow
    }

    pub(crate) fn forget(&mut self, id: NodeId) {
        if self.focused == Some(id) {
            self.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use slotmap::SlotMap;
    use std::sync::Arc;

    fn ids() -> (NodeId, NodeId) {
        let mut sm: SlotMap<NodeId, ()> = SlotMap::with_key();
        (sm.insert(()), sm.insert(()))
    }

    #[test]
    fn test_capture_requested_once_per_change() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        let mut fm = FocusManager::new(move |c: bool| sink.lock().push(c));
        let (a, b) = ids();

        fm.focus(a);
        fm.focus(b);
        assert_eq!(fm.current_focus(), Some(b));
        assert!(fm.is_focused(b));
        assert!(!fm.is_focused(a));

        fm.release();
        assert_eq!(fm.current_focus(), None);
        assert_eq!(*calls.lock(), vec![true, false]);
    }

    #[test]
    fn test_transfer_swallows_only_tab_char() {
        let (a, b) = ids();
        let mut fm = FocusManager::default();
        fm.focus(a);
        fm.transfer(b);
        assert!(fm.swallow_char('\t'));
        // one-shot
        assert!(!fm.swallow_char('\t'));

        fm.transfer(a);
        assert!(!fm.swallow_char('x'));
    }

    #[test]
    fn test_new_keystroke_clears_suppression() {
        let (a, b) = ids();
        let mut fm = FocusManager::default();
        fm.focus(a);
        fm.transfer(b);
        fm.begin_keystroke();
        assert!(!fm.swallow_char('\t'));
    }

    #[test]
    fn test_capture_change_is_reported_once() {
        let (a, _) = ids();
        let mut fm = FocusManager::default();
        fm.focus(a);
        assert_eq!(fm.take_capture_change(), Some(true));
        assert_eq!(fm.take_capture_change(), None);
        fm.forget(a);
        assert_eq!(fm.take_capture_change(), Some(false));
    }
}
