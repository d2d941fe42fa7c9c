//! Scene graph for the touchpad: the node arena, hit-testing and dispatch,
//! keyboard focus, and the stock widgets.
//!
//! ```no_run
//! use tactile_core::{Rect, Size};
//! use tactile_ui::{Label, Panel, Tree};
//!
//! let mut tree = Tree::new(Size::new(800.0, 480.0));
//! let panel = tree.spawn(tree.root(), Rect::new(0.0, 0.0, 400.0, 240.0), Panel::new())?;
//! let label = tree.spawn(panel, Rect::new(10.0, 10.0, 0.0, 0.0), Label::new("Ready"))?;
//! tree.on_tap(label, |_, _, g| log::info!("tapped at {:?}", g.position()))?;
//! # Ok::<(), tactile_ui::TreeError>(())
//! ```

pub mod debug;
pub mod error;
pub mod focus;
pub mod indicator;
pub mod label;
pub mod panel;
pub mod progress;
pub mod scroll;
pub mod text;
pub mod textfield;
pub mod tree;
pub mod widget;

pub use debug::DebugSquare;
pub use error::TreeError;
pub use focus::{FocusManager, KeyboardCapture, NoCapture};
pub use indicator::KeyboardIndicator;
pub use label::Label;
pub use panel::{Border, Panel};
pub use progress::ProgressBar;
pub use scroll::ScrollPanel;
pub use text::{TextAlignment, draw_text, draw_text_in};
pub use textfield::TextField;
pub use tree::{GestureHandler, HitOrder, NodeHandler, NodeId, SubmitHandler, Tree};
pub use widget::{DrawCx, EventCx, Route, Widget};
