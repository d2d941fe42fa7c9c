//! Touchpad compositor.
//!
//! [`RootPanel::start`] moves the node tree onto its own redraw thread and
//! hands back a [`PadHandle`] that any thread (the pad's input callback, a
//! keyboard hook, a worker reporting progress) can use to enqueue input or
//! run code against the tree. Frames go to a [`tactile_core::DisplaySink`].
//!
//! ```no_run
//! use tactile_core::{NullSink, Rect};
//! use tactile_platform::{CompositorConfig, RootPanel};
//! use tactile_ui::{Label, NoCapture};
//!
//! let mut pad = RootPanel::start(CompositorConfig::default(), NullSink, NoCapture, |tree| {
//!     let root = tree.root();
//!     tree.spawn(root, Rect::new(20.0, 20.0, 0.0, 0.0), Label::new("Ready"))?;
//!     Ok(())
//! })?;
//! let pad_input = pad.handle();
//! pad_input.notify_tap(30.0, 30.0);
//! pad.shutdown();
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod compositor;
pub mod config;
pub mod handle;
pub mod queue;

pub use compositor::RootPanel;
pub use config::CompositorConfig;
pub use handle::PadHandle;
pub use queue::{Enqueued, PendingEvent};
