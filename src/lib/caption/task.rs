//! Module implementing the actual captioning task.
//! Most if not all rendering logic lives here.

use std::ops::Deref;
use std::sync::Arc;

use rand::Rng;

use crate::model::Meme;
use crate::model::constants::{BOTTOM_TEXT_CENTER, FONT_SIZE_RATIO, HORIZONTAL_PADDING,
                              MIN_STROKE_WIDTH, OUTLINE_COLOR, TEXT_COLOR, TOP_TEXT_CENTER};
use super::background;
use super::canvas::{Canvas, FontSpec, RasterCanvas, Stroke, TextStyle};
use super::engine;
use super::error::CaptionError;
use super::output::CaptionOutput;
use super::text::{self, LayoutBlock};


/// Represents a single captioning task and contains all the relevant logic.
///
/// All the code here is executed in a background thread,
/// and so it can be synchronous.
pub(super) struct CaptionTask<'m> {
    meme: &'m Meme,
    engine: Arc<engine::Inner>,
}

impl<'m> Deref for CaptionTask<'m> {
    type Target = Meme;
    fn deref(&self) -> &Self::Target {
        self.meme  // makes the rendering code a little terser
    }
}

impl<'m> CaptionTask<'m> {
    #[inline]
    pub fn new(meme: &'m Meme, engine: Arc<engine::Inner>) -> Self {
        CaptionTask{meme, engine}
    }
}

impl<'m> CaptionTask<'m> {
    /// Perform the captioning task.
    pub fn perform<R: Rng + ?Sized>(self, rng: &mut R) -> Result<CaptionOutput, CaptionError> {
        debug!("Rendering {:?}", self.meme);

        let mut canvas = RasterCanvas::new(self.width, self.height, &self.engine.font);
        compose(&mut canvas, self.meme, rng);

        trace!("Encoding final image as PNG...");
        let bytes = canvas.into_png().map_err(CaptionError::Encode)?;
        debug!("Rendered {}x{} meme into {} bytes of PNG", self.width, self.height, bytes.len());
        Ok(CaptionOutput::new(bytes))
    }
}


/// Draw the complete meme onto the canvas.
///
/// The canvas is expected to have the meme's size.
pub(super) fn compose<C, R>(canvas: &mut C, meme: &Meme, rng: &mut R)
    where C: Canvas + ?Sized, R: Rng + ?Sized
{
    background::paint(canvas, meme.background.as_ref().map(|bg| &bg[..]), rng);
    if meme.has_text() {
        draw_texts(canvas, meme);
    } else {
        debug!("No text to draw");
    }
}

/// Draw the top & bottom text of the meme.
fn draw_texts<C: Canvas + ?Sized>(canvas: &mut C, meme: &Meme) {
    let width = canvas.width() as f32;
    let height = canvas.height() as f32;

    let font_size = (canvas.width() as f64 * FONT_SIZE_RATIO).floor() as f32;
    let stroke_width = MIN_STROKE_WIDTH.max((font_size / 12.0).floor());
    trace!("Font size computed as {}, stroke width as {}", font_size, stroke_width);
    let style = TextStyle{
        font: FontSpec::new(font_size),
        fill: TEXT_COLOR,
        stroke: Some(Stroke{color: OUTLINE_COLOR, width: stroke_width}),
    };
    let max_width = width - HORIZONTAL_PADDING;

    for &(caption, center) in [(&meme.top_text, TOP_TEXT_CENTER),
                               (&meme.bottom_text, BOTTOM_TEXT_CENTER)].iter() {
        if caption.is_empty() {
            continue;
        }
        let caption = caption.to_uppercase();
        let lines = text::wrap(&caption, max_width, |s| canvas.measure_text(s, &style.font));
        let block = LayoutBlock::new(lines, font_size, height * center);
        debug!("Drawing {} line(s) of text centered at y={}", block.lines.len(), block.center_y);

        for (line, y) in block.positioned_lines() {
            if line.is_empty() {
                continue;
            }
            canvas.draw_text(line, width / 2.0, y, &style);
        }
    }
}
