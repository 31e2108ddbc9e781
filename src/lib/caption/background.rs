//! Module for compositing the background of a meme.

use image::{self, DynamicImage, GenericImageView};
use rand::Rng;

use crate::model::{Color, ColorPair};
use crate::model::constants::{STRIPE_ALPHA, STRIPE_COUNT};
use super::canvas::{Canvas, ColorStop, Rect};


/// Placement of an image that makes it cover the whole canvas,
/// keeping its aspect ratio and cropping the excess symmetrically.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverFit {
    pub scale: f32,
    /// Size of the scaled image.
    pub width: f32,
    pub height: f32,
    /// Offset of the scaled image (non-positive).
    pub x: f32,
    pub y: f32,
}

impl CoverFit {
    pub fn new((image_width, image_height): (u32, u32),
               (canvas_width, canvas_height): (u32, u32)) -> Self {
        let (iw, ih) = (image_width as f32, image_height as f32);
        let (cw, ch) = (canvas_width as f32, canvas_height as f32);
        let (scale_x, scale_y) = (cw / iw, ch / ih);

        // The dimension that determined the scale matches the canvas exactly.
        let (scale, width, height) = if scale_x >= scale_y {
            (scale_x, cw, ih * scale_x)
        } else {
            (scale_y, iw * scale_y, ch)
        };
        CoverFit{
            scale, width, height,
            x: (cw - width) / 2.0,
            y: (ch - height) / 2.0,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}


/// Paint the background, either from the encoded image or as a random gradient,
/// and then apply the stripe overlay.
///
/// An image that cannot be decoded is treated as if it wasn't given.
pub fn paint<C, R>(canvas: &mut C, background: Option<&[u8]>, rng: &mut R)
    where C: Canvas + ?Sized, R: Rng + ?Sized
{
    let decoded = background.and_then(|bytes| match image::load_from_memory(bytes) {
        Ok(img) => Some(img),
        Err(e) => {
            warn!("Cannot decode background image ({} bytes), using gradient instead: {}",
                bytes.len(), e);
            None
        }
    });
    match decoded {
        Some(ref img) => paint_image(canvas, img),
        None => {
            let colors = ColorPair::random(rng);
            paint_gradient(canvas, &colors);
        }
    }
    paint_stripes(canvas);
}

/// Draw the image so that it covers the whole canvas.
pub fn paint_image<C: Canvas + ?Sized>(canvas: &mut C, image: &DynamicImage) {
    let size = (image.width(), image.height());
    if size.0 == 0 || size.1 == 0 {
        warn!("Background image is empty");
        return;
    }
    let fit = CoverFit::new(size, (canvas.width(), canvas.height()));
    debug!("Drawing {}x{} background image scaled by {} to {}x{} at ({}, {})",
        size.0, size.1, fit.scale, fit.width, fit.height, fit.x, fit.y);
    canvas.draw_image_scaled(image, fit.rect());
}

/// Fill the canvas with a diagonal gradient of the two colors.
pub fn paint_gradient<C: Canvas + ?Sized>(canvas: &mut C, colors: &ColorPair) {
    debug!("Drawing gradient background from {} to {}", colors.primary, colors.secondary);
    let rect = Rect::full(canvas.width(), canvas.height());
    canvas.fill_gradient(rect, &[
        ColorStop::new(0.0, Color::from(colors.primary)),
        ColorStop::new(1.0, Color::from(colors.secondary)),
    ]);
}

/// Overlay faint horizontal stripes that give the background some texture.
pub fn paint_stripes<C: Canvas + ?Sized>(canvas: &mut C) {
    let width = canvas.width() as f32;
    let stripe_height = canvas.height() as f32 / STRIPE_COUNT as f32;
    trace!("Drawing {} stripes of height {}", STRIPE_COUNT, stripe_height);
    for i in 0..STRIPE_COUNT {
        let alpha = if i % 2 == 1 { 0.02 } else { 0.01 };
        let rect = Rect::new(0.0, i as f32 * stripe_height, width, stripe_height);
        canvas.fill_rect(rect, Color::black(), alpha * STRIPE_ALPHA);
    }
}
