//! # Core types for the touchpad display
//!
//! Everything here is independent of the scene graph: geometry, colors,
//! input events, the software frame buffer and the sink frames are pushed to.
//!
//! ## Drawing
//!
//! Widgets never see the frame buffer directly. They receive a [`Canvas`]
//! whose origin is already their own top-left corner:
//!
//! ```rust
//! use tactile_core::*;
//!
//! let mut fb = FrameBuffer::new(800, 480);
//! let mut canvas = fb.canvas();
//! {
//!     let mut child = canvas.layer(Rect::new(10.0, 10.0, 50.0, 20.0));
//!     // (0,0) here is (10,10) on screen; nothing outside 50x20 is touched.
//!     child.fill_rect(Rect::new(0.0, 0.0, 500.0, 500.0), &Brush::Solid(Color::WHITE));
//! }
//! drop(canvas);
//! assert_eq!(fb.pixel(10, 10), Some(Color::WHITE));
//! assert_eq!(fb.pixel(60, 10), Some(Color::BLACK));
//! ```
//!
//! ## Input
//!
//! Gestures arrive as [`Gesture`] values in root coordinates and are
//! re-expressed with [`Gesture::at`] as they descend into children.

pub mod canvas;
pub mod color;
pub mod error;
pub mod geometry;
pub mod input;
pub mod render_api;
pub mod tests;

pub use canvas::*;
pub use color::*;
pub use error::*;
pub use geometry::*;
pub use input::*;
pub use render_api::*;

/// Touchpad resolution in pixels.
pub const TOUCHPAD_WIDTH: u32 = 800;
pub const TOUCHPAD_HEIGHT: u32 = 480;
