use tactile_core::{Brush, Canvas, Color, Rect, Size};
use tactile_text::{DEFAULT_FONT_FAMILY, FontSpec};

use crate::error::TreeError;
use crate::text::{TextAlignment, draw_text_in};
use crate::tree::{NodeId, Tree};
use crate::widget::{DrawCx, Widget};

pub const BAR_WIDTH: f32 = 650.0;
pub const BAR_HEIGHT: f32 = 50.0;
const TITLE_PX: f32 = 20.0 * 4.0 / 3.0;
const DESCRIPTION_PX: f32 = 15.0 * 4.0 / 3.0;
const INNER_INSET: f32 = 2.0;
const DESCRIPTION_GAP: f32 = 3.0;

/// Item counter drawn as a centered bar with a title above and a
/// description below. Usually fills the whole pad.
#[derive(Clone, Debug)]
pub struct ProgressBar {
    items: u32,
    completed: u32,
    title: String,
    description: String,
    title_font: FontSpec,
    description_font: FontSpec,
    pub foreground: Color,
    pub background: Color,
    pub disable_on_complete: bool,
}

impl ProgressBar {
    pub fn new(items: u32, title: impl Into<String>) -> Self {
        Self {
            items,
            completed: 0,
            title: title.into(),
            description: String::new(),
            title_font: FontSpec::new(DEFAULT_FONT_FAMILY, TITLE_PX),
            description_font: FontSpec::new(DEFAULT_FONT_FAMILY, DESCRIPTION_PX),
            foreground: Color::DEFAULT_FOREGROUND,
            background: Color::DEFAULT_BACKGROUND,
            disable_on_complete: true,
        }
    }

    pub fn keep_on_complete(mut self) -> Self {
        self.disable_on_complete = false;
        self
    }

    pub fn items(&self) -> u32 {
        self.items
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Completed share in `0.0..=1.0`; an empty job counts as done.
    pub fn fraction(&self) -> f32 {
        if self.items == 0 {
            1.0
        } else {
            (self.completed as f32 / self.items as f32).min(1.0)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed >= self.items
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_completed(&mut self, completed: u32) {
        self.completed = completed;
    }

    /// Count one more item and show `description`. Returns whether the job
    /// is now complete.
    pub fn increment(&mut self, description: impl Into<String>) -> bool {
        self.description = description.into();
        self.completed = self.completed.saturating_add(1);
        self.is_complete()
    }

    /// [`ProgressBar::increment`] on the node `id`, disabling it once
    /// complete when `disable_on_complete` is set.
    pub fn advance(
        tree: &mut Tree,
        id: NodeId,
        description: impl Into<String>,
    ) -> Result<bool, TreeError> {
        let (done, disable) = tree.update::<ProgressBar, _>(id, |bar| {
            (bar.increment(description), bar.disable_on_complete)
        })?;
        if done && disable {
            log::debug!("progress {id:?} complete");
            tree.set_enabled(id, false)?;
        }
        Ok(done)
    }

    fn outline(size: Size) -> Rect {
        let w = BAR_WIDTH.min(size.width);
        let h = BAR_HEIGHT.min(size.height);
        Rect::new(
            ((size.width - w) / 2.0).floor(),
            ((size.height - h) / 2.0).floor(),
            w,
            h,
        )
    }
}

impl Widget for ProgressBar {
    fn kind(&self) -> &'static str {
        "ProgressBar"
    }

    fn draw(&mut self, cx: &mut DrawCx<'_>, canvas: &mut Canvas<'_>) {
        let local = cx.local_bounds();
        canvas.fill_rect(local, &Brush::Solid(self.background));

        let outline = Self::outline(local.size());
        canvas.stroke_rect(outline, self.foreground, 1.0);
        let inner = outline.inset(INNER_INSET);
        let filled = inner.with_size(Size::new(
            (inner.w * self.fraction()).round(),
            inner.h,
        ));
        canvas.fill_rect(filled, &Brush::Solid(self.foreground));

        let title_h = tactile_text::line_height(&self.title_font);
        let title_area = Rect::new(0.0, outline.y - title_h, local.w, title_h);
        draw_text_in(
            canvas,
            &self.title,
            &self.title_font,
            self.foreground,
            title_area,
            TextAlignment::HORIZ_CENTER | TextAlignment::TOP,
        );

        let desc_y = outline.bottom() + DESCRIPTION_GAP;
        let desc_area = Rect::new(0.0, desc_y, local.w, (local.h - desc_y).max(0.0));
        draw_text_in(
            canvas,
            &self.description,
            &self.description_font,
            self.foreground,
            desc_area,
            TextAlignment::HORIZ_CENTER | TextAlignment::TOP,
        );
    }
}
