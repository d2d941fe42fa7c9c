//! Multi-producer event queue feeding the redraw thread.
//!
//! Producers lock, append, unlock and signal; the consumer takes the whole
//! queue in one go. The `signaled` flag is sticky, so a notification sent
//! while the consumer is busy rendering is picked up by its next wait.

use std::collections::VecDeque;
use std::fmt;
use std::time::Instant;

use parking_lot::{Condvar, Mutex};
use tactile_core::{Gesture, Key, Vec2};
use tactile_ui::Tree;

pub type Invoke = Box<dyn FnOnce(&mut Tree) + Send>;

/// One unit of work for the redraw thread. Gesture positions are in root
/// coordinates.
pub enum PendingEvent {
    /// Nothing to dispatch; only a new frame is wanted.
    Redraw,
    Tap(Vec2),
    Press { touches: u32, position: Vec2 },
    Release { touches: u32, position: Vec2 },
    /// Finger moved over the pad.
    Move(Vec2),
    KeyDown(Key),
    Char(char),
    /// Application code run against the tree.
    Invoke(Invoke),
}

impl PendingEvent {
    pub fn gesture(&self) -> Option<Gesture> {
        match *self {
            PendingEvent::Tap(p) => Some(Gesture::Tap(p)),
            PendingEvent::Press { touches, position } => Some(Gesture::Press { touches, position }),
            PendingEvent::Release { touches, position } => {
                Some(Gesture::Release { touches, position })
            }
            PendingEvent::Move(p) => Some(Gesture::Move(p)),
            _ => None,
        }
    }
}

impl fmt::Debug for PendingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingEvent::Redraw => f.write_str("Redraw"),
            PendingEvent::KeyDown(k) => f.debug_tuple("KeyDown").field(k).finish(),
            PendingEvent::Char(c) => f.debug_tuple("Char").field(c).finish(),
            PendingEvent::Invoke(_) => f.write_str("Invoke(..)"),
            other => match other.gesture() {
                Some(g) => write!(f, "{g:?}"),
                None => f.write_str("?"),
            },
        }
    }
}

/// Outcome of [`EventQueue::push`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Enqueued {
    Queued,
    /// Folded into work already pending.
    Coalesced,
    /// Over the depth cap.
    Dropped,
    /// The compositor has stopped.
    Closed,
}

impl Enqueued {
    pub fn accepted(self) -> bool {
        matches!(self, Enqueued::Queued | Enqueued::Coalesced)
    }
}

#[derive(Default)]
struct State {
    events: VecDeque<PendingEvent>,
    signaled: bool,
    shutdown: bool,
    dropped: u64,
}

pub(crate) struct EventQueue {
    state: Mutex<State>,
    wake: Condvar,
    max_depth: Option<usize>,
}

impl EventQueue {
    pub(crate) fn new(max_depth: Option<usize>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            wake: Condvar::new(),
            max_depth,
        }
    }

    pub(crate) fn push(&self, event: PendingEvent) -> Enqueued {
        let mut st = self.state.lock();
        if st.shutdown {
            return Enqueued::Closed;
        }
        let at_cap = self.max_depth.is_some_and(|max| st.events.len() >= max);
        let outcome = match event {
            // any pending batch ends in a render anyway
            PendingEvent::Redraw if !st.events.is_empty() => Enqueued::Coalesced,
            event if !at_cap || matches!(event, PendingEvent::Invoke(_)) => {
                st.events.push_back(event);
                Enqueued::Queued
            }
            PendingEvent::Move(p) if matches!(st.events.back(), Some(PendingEvent::Move(_))) => {
                if let Some(last) = st.events.back_mut() {
                    *last = PendingEvent::Move(p);
                }
                Enqueued::Coalesced
            }
            event => {
                st.dropped += 1;
                log::warn!(
                    "event queue full ({} pending); dropping {event:?} ({} dropped so far)",
                    st.events.len(),
                    st.dropped
                );
                return Enqueued::Dropped;
            }
        };
        st.signaled = true;
        drop(st);
        self.wake.notify_one();
        outcome
    }

    /// Block until work is signaled, then take everything queued. `None`
    /// once shut down.
    pub(crate) fn wait_batch(&self) -> Option<Vec<PendingEvent>> {
        let mut st = self.state.lock();
        while !st.shutdown && !st.signaled && st.events.is_empty() {
            self.wake.wait(&mut st);
        }
        if st.shutdown {
            return None;
        }
        st.signaled = false;
        Some(st.events.drain(..).collect())
    }

    /// Take whatever is queued without waiting.
    pub(crate) fn drain(&self) -> Vec<PendingEvent> {
        let mut st = self.state.lock();
        st.signaled = false;
        st.events.drain(..).collect()
    }

    /// Sleep until `deadline` unless shut down first. Returns true when shut
    /// down.
    pub(crate) fn sleep_until(&self, deadline: Instant) -> bool {
        let mut st = self.state.lock();
        while !st.shutdown {
            if self.wake.wait_until(&mut st, deadline).timed_out() {
                break;
            }
        }
        st.shutdown
    }

    pub(crate) fn shutdown(&self) {
        let mut st = self.state.lock();
        st.shutdown = true;
        st.events.clear();
        drop(st);
        self.wake.notify_all();
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.state.lock().shutdown
    }

    pub(crate) fn dropped(&self) -> u64 {
        self.state.lock().dropped
    }

    pub(crate) fn len(&self) -> usize {
        self.state.lock().events.len()
    }
}
