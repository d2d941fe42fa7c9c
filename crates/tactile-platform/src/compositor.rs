//! The root panel: owns the tree on a dedicated redraw thread.
//!
//! Input sources enqueue through a [`PadHandle`]. The redraw thread sleeps
//! until signaled, replays everything pending in arrival order, composites
//! the tree once and pushes that single frame to the display. A burst of
//! events that lands while a frame is being produced therefore costs exactly
//! one more frame.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, mpsc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, anyhow};
use tactile_core::{Color, DisplaySink, FrameBuffer, KeyInput};
use tactile_devtools::{Hud, Metrics};
use tactile_ui::{KeyboardCapture, Tree};
use web_time::Instant;

use crate::config::CompositorConfig;
use crate::handle::PadHandle;
use crate::queue::{EventQueue, PendingEvent};

pub struct RootPanel {
    handle: PadHandle,
    running: Arc<AtomicBool>,
    pushed: Arc<AtomicU64>,
    thread: Option<JoinHandle<()>>,
}

impl RootPanel {
    /// Spawn the redraw thread, build the tree on it with `build`, and push
    /// the first frame.
    ///
    /// Returns once `build` has finished. If it fails or panics the thread
    /// is joined and the error comes back here.
    pub fn start<S, C, B>(
        config: CompositorConfig,
        sink: S,
        capture: C,
        build: B,
    ) -> anyhow::Result<Self>
    where
        S: DisplaySink,
        C: KeyboardCapture + 'static,
        B: FnOnce(&mut Tree) -> anyhow::Result<()> + Send + 'static,
    {
        let queue = Arc::new(EventQueue::new(config.max_queue_depth));
        let running = Arc::new(AtomicBool::new(true));
        let pushed = Arc::new(AtomicU64::new(0));
        let (ready_tx, ready_rx) = mpsc::channel::<anyhow::Result<()>>();

        let thread = {
            let queue = queue.clone();
            let running = running.clone();
            let pushed = pushed.clone();
            thread::Builder::new()
                .name(config.thread_name.clone())
                .spawn(move || {
                    let mut tree = Tree::new(config.display_size)
                        .with_capture(capture)
                        .with_hit_order(config.hit_order);
                    tree.set_release_capture_on_press(config.release_capture_on_press);

                    let built = catch_unwind(AssertUnwindSafe(|| build(&mut tree)))
                        .unwrap_or_else(|p| {
                            Err(anyhow!("tree builder panicked: {}", panic_message(&*p)))
                        });
                    let ok = built.is_ok();
                    let _ = ready_tx.send(built);
                    if ok {
                        Redraw::new(config, tree, sink, queue, running, pushed).run();
                    }
                })
                .context("spawning the redraw thread")?
        };

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                handle: PadHandle { queue },
                running,
                pushed,
                thread: Some(thread),
            }),
            Ok(Err(e)) => {
                let _ = thread.join();
                Err(e.context("building the touchpad tree"))
            }
            Err(_) => {
                let _ = thread.join();
                Err(anyhow!("redraw thread exited before the tree was built"))
            }
        }
    }

    pub fn handle(&self) -> PadHandle {
        self.handle.clone()
    }

    /// Frames handed to the sink without error so far.
    pub fn frames_pushed(&self) -> u64 {
        self.pushed.load(Ordering::Acquire)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the redraw thread and wait for it. Pending events are discarded
    /// and no frame is pushed afterwards. Calling it twice is harmless.
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::Release);
        self.handle.queue.shutdown();
        if let Some(t) = self.thread.take() {
            if t.join().is_err() {
                log::error!("redraw thread panicked during shutdown");
            }
        }
    }
}

impl Drop for RootPanel {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct Redraw<S> {
    tree: Tree,
    fb: FrameBuffer,
    sink: S,
    hud: Option<Hud>,
    clear_color: Color,
    min_frame_interval: Option<Duration>,
    last_push: Option<Instant>,
    queue: Arc<EventQueue>,
    running: Arc<AtomicBool>,
    pushed: Arc<AtomicU64>,
}

impl<S: DisplaySink> Redraw<S> {
    fn new(
        config: CompositorConfig,
        tree: Tree,
        sink: S,
        queue: Arc<EventQueue>,
        running: Arc<AtomicBool>,
        pushed: Arc<AtomicU64>,
    ) -> Self {
        let (w, h) = config.frame_dims();
        Self {
            tree,
            fb: FrameBuffer::new(w, h),
            sink,
            hud: config.show_hud.then(Hud::new),
            clear_color: config.clear_color,
            min_frame_interval: config.min_frame_interval,
            last_push: None,
            queue,
            running,
            pushed,
        }
    }

    fn run(mut self) {
        log::info!(
            "redraw thread started ({}x{}, {} nodes)",
            self.fb.width(),
            self.fb.height(),
            self.tree.len()
        );
        self.tree.take_dirty();
        self.frame(0);
        while let Some(mut batch) = self.queue.wait_batch() {
            if let Some(deadline) = self.throttle_deadline() {
                if self.queue.sleep_until(deadline) {
                    break;
                }
                batch.extend(self.queue.drain());
            }
            if !self.running.load(Ordering::Acquire) {
                break;
            }
            let events = batch.len();
            self.tree.take_dirty();
            for event in batch {
                self.replay(event);
            }
            self.tree.take_dirty();
            self.frame(events);
        }
        log::info!("redraw thread stopped");
    }

    fn throttle_deadline(&self) -> Option<Instant> {
        let deadline = self.last_push? + self.min_frame_interval?;
        (Instant::now() < deadline).then_some(deadline)
    }

    fn replay(&mut self, event: PendingEvent) {
        log::trace!("replay {event:?}");
        let tree = &mut self.tree;
        let outcome = catch_unwind(AssertUnwindSafe(|| match event {
            PendingEvent::Redraw => {}
            PendingEvent::KeyDown(key) => tree.key_input(KeyInput::Down(key)),
            PendingEvent::Char(c) => tree.key_input(KeyInput::Char(c)),
            PendingEvent::Invoke(f) => f(tree),
            gesture => {
                if let Some(g) = gesture.gesture() {
                    tree.dispatch_gesture(g);
                }
            }
        }));
        if let Err(p) = outcome {
            log::error!("event handler panicked: {}", panic_message(&*p));
        }
    }

    fn frame(&mut self, events: usize) {
        let started = Instant::now();
        self.fb.clear(self.clear_color);
        let (tree, fb) = (&mut self.tree, &mut self.fb);
        if let Err(p) = catch_unwind(AssertUnwindSafe(|| tree.render(fb))) {
            log::error!("render panicked: {}", panic_message(&*p));
        }
        // something asked for another frame while drawing
        if self.tree.take_dirty() {
            self.queue.push(PendingEvent::Redraw);
        }
        if !self.running.load(Ordering::Acquire) {
            return;
        }
        if !self.tree.is_enabled(self.tree.root()) {
            log::trace!("root disabled; frame not pushed");
            return;
        }
        let render_ms = started.elapsed().as_secs_f32() * 1000.0;
        if let Some(hud) = &mut self.hud {
            hud.metrics = Some(Metrics {
                batch_events: events,
                render_ms,
                nodes: self.tree.len(),
                dropped_events: self.queue.dropped(),
            });
            hud.overlay(&mut self.fb);
        }
        self.present();
        log::debug!("frame: {events} events, rendered in {render_ms:.2}ms");
    }

    fn present(&mut self) {
        // shutdown may land while the frame is being finished
        if !self.running.load(Ordering::Acquire) {
            return;
        }
        match self.sink.push_frame(&self.fb) {
            Ok(()) => {
                self.pushed.fetch_add(1, Ordering::AcqRel);
                self.last_push = Some(Instant::now());
            }
            Err(e) => log::warn!("display push failed: {e:#}"),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    }
}
