use std::sync::Arc;

use tactile_core::{Key, Vec2};
use tactile_ui::Tree;

use crate::queue::{Enqueued, EventQueue, PendingEvent};

/// Cheap, cloneable entry point for input sources on any thread.
///
/// Every `notify_*` call only enqueues; dispatch happens later on the redraw
/// thread. Each returns whether the event was accepted.
#[derive(Clone)]
pub struct PadHandle {
    pub(crate) queue: Arc<EventQueue>,
}

impl PadHandle {
    pub fn notify_press(&self, touches: u32, x: f32, y: f32) -> bool {
        self.send(PendingEvent::Press {
            touches,
            position: Vec2::new(x, y),
        })
    }

    pub fn notify_release(&self, touches: u32, x: f32, y: f32) -> bool {
        self.send(PendingEvent::Release {
            touches,
            position: Vec2::new(x, y),
        })
    }

    pub fn notify_tap(&self, x: f32, y: f32) -> bool {
        self.send(PendingEvent::Tap(Vec2::new(x, y)))
    }

    pub fn notify_move(&self, x: f32, y: f32) -> bool {
        self.send(PendingEvent::Move(Vec2::new(x, y)))
    }

    /// The pad came back (e.g. after sleep); repaint the current tree.
    pub fn notify_activated(&self) -> bool {
        self.send(PendingEvent::Redraw)
    }

    pub fn notify_key_down(&self, key: Key) -> bool {
        self.send(PendingEvent::KeyDown(key))
    }

    pub fn notify_char(&self, c: char) -> bool {
        self.send(PendingEvent::Char(c))
    }

    /// Run `f` against the tree on the redraw thread, followed by a frame.
    pub fn invoke(&self, f: impl FnOnce(&mut Tree) + Send + 'static) -> bool {
        self.send(PendingEvent::Invoke(Box::new(f)))
    }

    pub fn send(&self, event: PendingEvent) -> bool {
        self.enqueue(event).accepted()
    }

    pub fn enqueue(&self, event: PendingEvent) -> Enqueued {
        self.queue.push(event)
    }

    pub fn dropped_events(&self) -> u64 {
        self.queue.dropped()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_closed(&self) -> bool {
        self.queue.is_shutdown()
    }
}

impl std::fmt::Debug for PadHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PadHandle")
            .field("pending", &self.pending())
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_reports_closed_queue() {
        let h = PadHandle {
            queue: Arc::new(EventQueue::new(None)),
        };
        assert!(h.notify_tap(1.0, 2.0));
        assert!(h.clone().notify_activated());
        assert_eq!(h.pending(), 1);
        h.queue.shutdown();
        assert!(!h.notify_char('a'));
        assert!(h.is_closed());
    }
}
