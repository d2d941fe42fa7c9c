//! Text measurement and glyph rasterization for the touchpad.
//!
//! Faces come from the system font database; a family that cannot be found
//! falls back to any sans-serif face, and when no face exists at all (bare
//! CI machines) fixed advance metrics and block glyphs keep layout working.

use std::collections::HashMap;

use ab_glyph::{Font, FontArc, FontVec, PxScale, ScaleFont, point};
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tactile_core::Size;

pub const DEFAULT_FONT_FAMILY: &str = "Arial";
/// 12pt at 96 dpi.
pub const DEFAULT_FONT_PX: f32 = 16.0;

const FALLBACK_ADVANCE: f32 = 0.6;
const FALLBACK_LINE_HEIGHT: f32 = 1.2;

#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub px: f32,
    pub bold: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_string(),
            px: DEFAULT_FONT_PX,
            bold: false,
        }
    }
}

impl FontSpec {
    pub fn new(family: impl Into<String>, px: f32) -> Self {
        Self {
            family: family.into(),
            px,
            bold: false,
        }
    }
    pub fn with_px(mut self, px: f32) -> Self {
        self.px = px;
        self
    }
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

struct Engine {
    db: Database,
    faces: HashMap<(String, bool), Option<FontArc>>,
}

impl Engine {
    fn face(&mut self, spec: &FontSpec) -> Option<FontArc> {
        let key = (spec.family.clone(), spec.bold);
        if let Some(f) = self.faces.get(&key) {
            return f.clone();
        }
        let families = [Family::Name(&spec.family), Family::SansSerif];
        let query = Query {
            families: &families,
            weight: if spec.bold { Weight::BOLD } else { Weight::NORMAL },
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let face = self.db.query(&query).and_then(|id| {
            self.db
                .with_face_data(id, |data, index| {
                    FontVec::try_from_vec_and_index(data.to_vec(), index).ok()
                })
                .flatten()
                .map(FontArc::new)
        });
        if face.is_none() {
            log::warn!(
                "no font face for '{}' (bold={}); using fallback metrics",
                spec.family,
                spec.bold
            );
        }
        self.faces.insert(key, face.clone());
        face
    }
}

static ENGINE: OnceCell<Mutex<Engine>> = OnceCell::new();

fn engine() -> &'static Mutex<Engine> {
    ENGINE.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        log::debug!("font database loaded {} faces", db.len());
        Mutex::new(Engine {
            db,
            faces: HashMap::new(),
        })
    })
}

fn resolve(spec: &FontSpec) -> Option<FontArc> {
    engine().lock().face(spec)
}

/// Whether a real face backs `spec` (otherwise fallback metrics are used).
pub fn has_face(spec: &FontSpec) -> bool {
    resolve(spec).is_some()
}

pub fn line_height(spec: &FontSpec) -> f32 {
    match resolve(spec) {
        Some(font) => {
            let sf = font.as_scaled(PxScale::from(spec.px));
            (sf.ascent() - sf.descent() + sf.line_gap()).ceil()
        }
        None => (spec.px * FALLBACK_LINE_HEIGHT).ceil(),
    }
}

/// Size of the text block; lines are split on `\n`.
pub fn measure(text: &str, spec: &FontSpec) -> Size {
    let font = resolve(spec);
    let lh = line_height(spec);
    let mut width: f32 = 0.0;
    let mut lines = 0usize;
    for line in text.split('\n') {
        lines += 1;
        let w = match &font {
            Some(font) => line_advance(font, spec.px, line),
            None => line.chars().count() as f32 * spec.px * FALLBACK_ADVANCE,
        };
        width = width.max(w);
    }
    Size::new(width.ceil(), lh * lines as f32)
}

fn line_advance(font: &FontArc, px: f32, line: &str) -> f32 {
    let sf = font.as_scaled(PxScale::from(px));
    let mut x = 0.0;
    let mut prev = None;
    for c in line.chars() {
        let id = sf.glyph_id(c);
        if let Some(p) = prev {
            x += sf.kern(p, id);
        }
        x += sf.h_advance(id);
        prev = Some(id);
    }
    x
}

/// Rasterize `text` with its top-left at (0,0). `plot(x, y, coverage)` is
/// called for every touched pixel.
pub fn rasterize(text: &str, spec: &FontSpec, mut plot: impl FnMut(f32, f32, f32)) {
    let lh = line_height(spec);
    let Some(font) = resolve(spec) else {
        rasterize_blocks(text, spec, lh, &mut plot);
        return;
    };
    let sf = font.as_scaled(PxScale::from(spec.px));
    for (row, line) in text.split('\n').enumerate() {
        let baseline = row as f32 * lh + sf.ascent();
        let mut caret = 0.0;
        let mut prev = None;
        for c in line.chars() {
            let id = sf.glyph_id(c);
            if let Some(p) = prev {
                caret += sf.kern(p, id);
            }
            let glyph = id.with_scale_and_position(PxScale::from(spec.px), point(caret, baseline));
            caret += sf.h_advance(id);
            prev = Some(id);
            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|x, y, cov| {
                    plot(bounds.min.x + x as f32, bounds.min.y + y as f32, cov);
                });
            }
        }
    }
}

// One solid box per visible char so text stays legible without fonts.
fn rasterize_blocks(text: &str, spec: &FontSpec, lh: f32, plot: &mut impl FnMut(f32, f32, f32)) {
    let advance = spec.px * FALLBACK_ADVANCE;
    let box_w = (advance * 0.8).floor().max(1.0) as u32;
    let box_h = (spec.px * 0.7).floor().max(1.0) as u32;
    for (row, line) in text.split('\n').enumerate() {
        let top = row as f32 * lh + (lh - box_h as f32) / 2.0;
        for (col, c) in line.chars().enumerate() {
            if c.is_whitespace() {
                continue;
            }
            let left = col as f32 * advance;
            for dy in 0..box_h {
                for dx in 0..box_w {
                    plot(left + dx as f32, top + dy as f32, 1.0);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_one_line() {
        let spec = FontSpec::default();
        let s = measure("", &spec);
        assert_eq!(s.width, 0.0);
        assert_eq!(s.height, line_height(&spec));
    }

    #[test]
    fn test_multiline_height_scales_with_lines() {
        let spec = FontSpec::default();
        let one = measure("abc", &spec);
        let three = measure("abc\nabc\nabc", &spec);
        assert_eq!(three.height, one.height * 3.0);
        assert_eq!(three.width, one.width);
    }

    #[test]
    fn test_longer_text_is_wider() {
        let spec = FontSpec::default();
        assert!(measure("WWWW", &spec).width > measure("W", &spec).width);
    }

    #[test]
    fn test_rasterize_stays_inside_measured_box() {
        let spec = FontSpec::default();
        let text = "Hi";
        let size = measure(text, &spec);
        let mut touched = 0;
        rasterize(text, &spec, |x, y, _| {
            touched += 1;
            assert!(x >= -2.0 && x <= size.width + 2.0);
            assert!(y >= -2.0 && y <= size.height + 2.0);
        });
        assert!(touched > 0);
    }
}
