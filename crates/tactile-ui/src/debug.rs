use tactile_core::{Brush, Canvas, Color, Gesture};

use crate::widget::{DrawCx, EventCx, Widget};

/// Solid square that swaps its two colors every time a finger moves over it.
/// Handy for checking hit-testing on the device.
#[derive(Clone, Copy, Debug)]
pub struct DebugSquare {
    pub primary: Color,
    pub secondary: Color,
}

impl Default for DebugSquare {
    fn default() -> Self {
        Self::new(Color::DEFAULT_BACKGROUND, Color::DEFAULT_FOREGROUND)
    }
}

impl DebugSquare {
    pub fn new(primary: Color, secondary: Color) -> Self {
        Self { primary, secondary }
    }
}

impl Widget for DebugSquare {
    fn kind(&self) -> &'static str {
        "DebugSquare"
    }

    fn draw(&mut self, cx: &mut DrawCx<'_>, canvas: &mut Canvas<'_>) {
        canvas.fill_rect(cx.local_bounds(), &Brush::Solid(self.primary));
    }

    fn on_gesture(&mut self, gesture: &Gesture, cx: &mut EventCx<'_>) {
        if let Gesture::Move(_) = gesture {
            std::mem::swap(&mut self.primary, &mut self.secondary);
            cx.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tree;
    use tactile_core::{Rect, Size, Vec2};

    #[test]
    fn test_swaps_on_finger_over_only() {
        let mut t = Tree::new(Size::new(100.0, 100.0));
        let sq = t
            .spawn(t.root(), Rect::new(0.0, 0.0, 10.0, 10.0), DebugSquare::default())
            .unwrap();

        t.dispatch_gesture(Gesture::Tap(Vec2::new(5.0, 5.0)));
        assert_eq!(t.widget::<DebugSquare>(sq).unwrap().primary, Color::DEFAULT_BACKGROUND);

        t.take_dirty();
        t.dispatch_gesture(Gesture::Move(Vec2::new(5.0, 5.0)));
        assert_eq!(t.widget::<DebugSquare>(sq).unwrap().primary, Color::DEFAULT_FOREGROUND);
        assert!(t.take_dirty());

        t.dispatch_gesture(Gesture::Move(Vec2::new(50.0, 50.0)));
        assert_eq!(t.widget::<DebugSquare>(sq).unwrap().primary, Color::DEFAULT_FOREGROUND);
    }
}
