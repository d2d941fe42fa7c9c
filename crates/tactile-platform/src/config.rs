use std::time::Duration;

use tactile_core::{Color, Size, TOUCHPAD_HEIGHT, TOUCHPAD_WIDTH};
use tactile_ui::HitOrder;

/// Compositor settings. `Default` matches the touchpad hardware.
#[derive(Clone, Debug)]
pub struct CompositorConfig {
    pub display_size: Size,
    /// Pending events allowed before new ones are dropped. `None` is
    /// unbounded.
    pub max_queue_depth: Option<usize>,
    /// Lower bound between two pushes; events arriving meanwhile are
    /// folded into the next batch.
    pub min_frame_interval: Option<Duration>,
    pub thread_name: String,
    pub show_hud: bool,
    pub hit_order: HitOrder,
    pub release_capture_on_press: bool,
    /// Frame buffer fill before the tree is drawn.
    pub clear_color: Color,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            display_size: Size::new(TOUCHPAD_WIDTH as f32, TOUCHPAD_HEIGHT as f32),
            max_queue_depth: None,
            min_frame_interval: None,
            thread_name: "tactile-redraw".to_string(),
            show_hud: false,
            hit_order: HitOrder::FirstAdded,
            release_capture_on_press: true,
            clear_color: Color::DEFAULT_BACKGROUND,
        }
    }
}

impl CompositorConfig {
    pub fn with_display_size(mut self, size: Size) -> Self {
        self.display_size = size;
        self
    }

    pub fn with_max_queue_depth(mut self, depth: usize) -> Self {
        self.max_queue_depth = Some(depth.max(1));
        self
    }

    pub fn with_min_frame_interval(mut self, interval: Duration) -> Self {
        self.min_frame_interval = Some(interval);
        self
    }

    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    pub fn with_hud(mut self, show: bool) -> Self {
        self.show_hud = show;
        self
    }

    pub fn with_hit_order(mut self, order: HitOrder) -> Self {
        self.hit_order = order;
        self
    }

    pub fn with_release_capture_on_press(mut self, release: bool) -> Self {
        self.release_capture_on_press = release;
        self
    }

    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub(crate) fn frame_dims(&self) -> (u32, u32) {
        (
            self.display_size.width.round().max(1.0) as u32,
            self.display_size.height.round().max(1.0) as u32,
        )
    }
}
