#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex("#FF5733");
        assert_eq!(c, Color(255, 87, 51, 255));

        let c_alpha = Color::from_hex("#FF5733AA");
        assert_eq!(c_alpha, Color(255, 87, 51, 170));
    }

    #[test]
    fn test_color_from_hex_rejects_non_ascii() {
        // six bytes, but a char boundary falls inside the first pair
        assert_eq!(Color::from_hex("#\u{e9}\u{e9}ab"), Color(0, 0, 0, 255));
        assert_eq!(Color::from_hex("a\u{e9}\u{e9}0"), Color(0, 0, 0, 255));
    }

    #[test]
    fn test_rgb565_packing() {
        assert_eq!(Color::WHITE.to_rgb565(), 0xFFFF);
        assert_eq!(Color::BLACK.to_rgb565(), 0x0000);
        assert_eq!(Color::from_rgb(255, 0, 0).to_rgb565(), 0xF800);
        assert_eq!(Color::from_rgb(0, 255, 0).to_rgb565(), 0x07E0);
        assert_eq!(Color::from_rgb(0, 0, 255).to_rgb565(), 0x001F);
    }

    #[test]
    fn test_blend_half_alpha() {
        let src = Color::WHITE.with_alpha(128);
        let out = src.blend_over(Color::BLACK, 1.0);
        assert!((out.0 as i32 - 128).abs() <= 1);
        assert_eq!(out.3, 255);
        assert_eq!(src.blend_over(Color::BLACK, 0.0), Color::BLACK);
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect {
            x: 10.0,
            y: 10.0,
            w: 100.0,
            h: 50.0,
        };

        assert!(rect.contains(Vec2 { x: 50.0, y: 30.0 }));
        assert!(rect.contains(Vec2 { x: 10.0, y: 10.0 }));
        assert!(!rect.contains(Vec2 { x: 5.0, y: 30.0 }));
        assert!(!rect.contains(Vec2 { x: 50.0, y: 70.0 }));
        // right/bottom edges are exclusive
        assert!(!rect.contains(Vec2 { x: 110.0, y: 30.0 }));
        assert!(!rect.contains(Vec2 { x: 50.0, y: 60.0 }));
    }

    #[test]
    fn test_rect_intersect_and_union() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 80.0, 100.0, 100.0);
        assert_eq!(a.intersect(&b), Rect::new(50.0, 80.0, 50.0, 20.0));
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 150.0, 180.0));

        let far = Rect::new(500.0, 500.0, 10.0, 10.0);
        assert!(a.intersect(&far).is_empty());
    }

    #[test]
    fn test_gesture_relocation_keeps_touches() {
        let g = Gesture::Press {
            touches: 2,
            position: Vec2::new(30.0, 40.0),
        };
        let moved = g.at(Vec2::new(5.0, 6.0));
        assert_eq!(moved.touches(), 2);
        assert_eq!(moved.position(), Vec2::new(5.0, 6.0));
        assert_eq!(moved.kind(), GestureKind::Press);
    }

    #[test]
    fn test_key_from_vk() {
        assert_eq!(Key::from_vk(0x08), Key::Backspace);
        assert_eq!(Key::from_vk(0x09), Key::Tab);
        assert_eq!(Key::from_vk(0x0D), Key::Return);
        assert_eq!(Key::from_vk(0x41), Key::Other(0x41));
    }

    #[test]
    fn test_layer_clips_and_restores() {
        let mut fb = FrameBuffer::new(20, 20);
        let mut canvas = fb.canvas();
        {
            let mut layer = canvas.layer(Rect::new(5.0, 5.0, 4.0, 4.0));
            assert_eq!(layer.depth(), 1);
            assert_eq!(layer.clip_bounds(), Rect::new(0.0, 0.0, 4.0, 4.0));
            layer.fill_rect(
                Rect::new(-10.0, -10.0, 100.0, 100.0),
                &Brush::Solid(Color::WHITE),
            );
        }
        assert_eq!(canvas.depth(), 0);
        assert_eq!(canvas.origin(), Vec2::ZERO);
        // sibling drawn after the layer is unclipped again
        canvas.fill_rect(Rect::new(15.0, 15.0, 2.0, 2.0), &Brush::Solid(Color::GREEN));
        drop(canvas);

        assert_eq!(fb.pixel(5, 5), Some(Color::WHITE));
        assert_eq!(fb.pixel(8, 8), Some(Color::WHITE));
        assert_eq!(fb.pixel(9, 9), Some(Color::BLACK));
        assert_eq!(fb.pixel(4, 5), Some(Color::BLACK));
        assert_eq!(fb.pixel(16, 16), Some(Color::GREEN));
    }

    #[test]
    fn test_nested_layer_intersects_parent_clip() {
        let mut fb = FrameBuffer::new(20, 20);
        let mut canvas = fb.canvas();
        {
            let mut outer = canvas.layer(Rect::new(0.0, 0.0, 10.0, 10.0));
            let mut inner = outer.layer(Rect::new(8.0, 8.0, 10.0, 10.0));
            assert_eq!(inner.clip_bounds(), Rect::new(0.0, 0.0, 2.0, 2.0));
            inner.clear(Color::WHITE);
        }
        drop(canvas);
        assert_eq!(fb.pixel(9, 9), Some(Color::WHITE));
        assert_eq!(fb.pixel(10, 10), Some(Color::BLACK));
    }

    #[test]
    fn test_scrolled_layer_shifts_origin_not_clip() {
        let mut fb = FrameBuffer::new(20, 20);
        let mut canvas = fb.canvas();
        {
            let mut view = canvas.layer_with(Rect::new(0.0, 0.0, 10.0, 10.0), Vec2::new(0.0, -5.0));
            // content at y=5 lands at screen y=0
            view.fill_rect(Rect::new(0.0, 5.0, 1.0, 1.0), &Brush::Solid(Color::WHITE));
        }
        drop(canvas);
        assert_eq!(fb.pixel(0, 0), Some(Color::WHITE));
        assert_eq!(fb.pixel(0, 5), Some(Color::BLACK));
    }

    #[test]
    fn test_stroke_rect_leaves_interior() {
        let mut fb = FrameBuffer::new(10, 10);
        fb.canvas()
            .stroke_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE, 1.0);
        assert_eq!(fb.pixel(0, 0), Some(Color::WHITE));
        assert_eq!(fb.pixel(9, 9), Some(Color::WHITE));
        assert_eq!(fb.pixel(0, 5), Some(Color::WHITE));
        assert_eq!(fb.pixel(5, 5), Some(Color::BLACK));
    }

    #[test]
    fn test_vertical_gradient_endpoints() {
        let mut fb = FrameBuffer::new(1, 11);
        fb.canvas().fill_rect(
            Rect::new(0.0, 0.0, 1.0, 10.0),
            &LinearGradient::vertical(Color::BLACK, Color::WHITE),
        );
        assert_eq!(fb.pixel(0, 0), Some(Color::BLACK));
        let bottom = fb.pixel(0, 9).unwrap();
        assert!(bottom.0 > 200);
        assert_eq!(fb.pixel(0, 10), Some(Color::BLACK));
    }

    #[test]
    fn test_frame_buffer_size_mismatch() {
        let err = FrameBuffer::from_pixels(2, 2, vec![Color::BLACK; 3]).unwrap_err();
        assert_eq!(
            err,
            FrameError::SizeMismatch {
                width: 2,
                height: 2,
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_rgb565_bytes_are_little_endian() {
        let fb = FrameBuffer::from_pixels(1, 1, vec![Color::from_rgb(255, 0, 0)]).unwrap();
        assert_eq!(fb.to_rgb565_bytes(), vec![0x00, 0xF8]);
    }
}
