//! Frame statistics drawn on top of the composited touchpad frame.

use web_time::Instant;

use tactile_core::{Brush, Color, FrameBuffer, Rect, Vec2};
use tactile_text::FontSpec;

const HUD_FONT_PX: f32 = 14.0;
const HUD_MARGIN: f32 = 8.0;

pub struct Hud {
    /// Outline drawn around a rect in root coordinates, e.g. a node under
    /// investigation.
    pub highlight: Option<Rect>,
    frame_count: u64,
    last_frame: Option<Instant>,
    fps_smooth: f32,
    pub metrics: Option<Metrics>,
    font: FontSpec,
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}

impl Hud {
    pub fn new() -> Self {
        Self {
            highlight: None,
            frame_count: 0,
            last_frame: None,
            fps_smooth: 0.0,
            metrics: None,
            font: FontSpec::default().with_px(HUD_FONT_PX),
        }
    }

    pub fn set_highlight(&mut self, r: Option<Rect>) {
        self.highlight = r;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn fps(&self) -> f32 {
        self.fps_smooth
    }

    /// Count a frame and update the smoothed rate.
    pub fn tick(&mut self) {
        self.frame_count += 1;
        let now = Instant::now();
        if let Some(prev) = self.last_frame.replace(now) {
            let dt = (now - prev).as_secs_f32();
            if dt > 0.0 {
                let fps = 1.0 / dt;
                // simple EMA
                let a = 0.2;
                self.fps_smooth = if self.fps_smooth == 0.0 {
                    fps
                } else {
                    (1.0 - a) * self.fps_smooth + a * fps
                };
            }
        }
    }

    pub fn status_line(&self) -> String {
        let mut parts = vec![
            format!("frame: {}", self.frame_count),
            format!("fps: {:.1}", self.fps_smooth),
        ];
        if let Some(m) = &self.metrics {
            parts.push(format!("batch: {}", m.batch_events));
            parts.push(format!("render: {:.2} ms", m.render_ms));
            parts.push(format!("nodes: {}", m.nodes));
            if m.dropped_events > 0 {
                parts.push(format!("dropped: {}", m.dropped_events));
            }
        }
        parts.join("  |  ")
    }

    /// Tick and draw the status line (and highlight) into `fb`.
    pub fn overlay(&mut self, fb: &mut FrameBuffer) {
        self.tick();
        let text = self.status_line();
        let size = tactile_text::measure(&text, &self.font);
        let color = Color::from_hex("#AAAAAA");

        let mut canvas = fb.canvas();
        let backdrop = Rect::new(
            HUD_MARGIN - 2.0,
            HUD_MARGIN - 2.0,
            size.width + 4.0,
            size.height + 4.0,
        );
        canvas.fill_rect(backdrop, &Brush::Solid(Color::BLACK.with_alpha(160)));
        let at = Vec2::new(HUD_MARGIN, HUD_MARGIN);
        tactile_text::rasterize(&text, &self.font, |x, y, coverage| {
            canvas.blend_pixel(at.x + x, at.y + y, color, coverage);
        });

        if let Some(r) = self.highlight {
            canvas.stroke_rect(r, Color::from_hex("#44AAFF"), 2.0);
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Metrics {
    /// Events replayed in the last batch.
    pub batch_events: usize,
    pub render_ms: f32,
    pub nodes: usize,
    pub dropped_events: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_counts_frames() {
        let mut hud = Hud::new();
        hud.tick();
        hud.tick();
        assert_eq!(hud.frame_count(), 2);
        assert!(hud.fps() >= 0.0);
    }

    #[test]
    fn test_status_line_includes_metrics() {
        let mut hud = Hud::new();
        hud.metrics = Some(Metrics {
            batch_events: 5,
            render_ms: 1.5,
            nodes: 12,
            dropped_events: 0,
        });
        let line = hud.status_line();
        assert!(line.contains("batch: 5"));
        assert!(line.contains("nodes: 12"));
        assert!(!line.contains("dropped"));
    }

    #[test]
    fn test_overlay_draws_highlight() {
        let mut fb = FrameBuffer::new(200, 100);
        let mut hud = Hud::new();
        hud.set_highlight(Some(Rect::new(100.0, 50.0, 20.0, 20.0)));
        hud.overlay(&mut fb);
        assert_eq!(fb.pixel(100, 60), Some(Color::from_hex("#44AAFF")));
        assert_eq!(fb.pixel(110, 60), Some(Color::BLACK));
    }
}
