//! Module defining the drawing surface that memes are rendered onto.

use std::fmt;

use image::{self, imageops, DynamicImage, GenericImageView, GrayImage, ImageEncoder, ImageResult,
            Luma, Rgba, RgbaImage};
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use imageproc::distance_transform::euclidean_squared_distance_transform;
use rusttype::{point, PositionedGlyph, Scale};

use crate::model::Color;
use crate::resources::Font;


/// Rectangle in canvas coordinates.
///
/// Unlike pixel rectangles, it may extend outside of the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect{x, y, width, height}
    }

    /// Rectangle covering a whole canvas of given size.
    #[inline]
    pub fn full(width: u32, height: u32) -> Self {
        Rect::new(0.0, 0.0, width as f32, height as f32)
    }

    /// Part of the rectangle that lies within the canvas of given size,
    /// rounded to whole pixels.
    /// Returns `None` if the two don't overlap.
    fn clip(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let left = self.x.max(0.0).round();
        let top = self.y.max(0.0).round();
        let right = (self.x + self.width).min(width as f32).round();
        let bottom = (self.y + self.height).min(height as f32).round();
        if right <= left || bottom <= top {
            return None;
        }
        Some((left as u32, top as u32, (right - left) as u32, (bottom - top) as u32))
    }
}


/// Color at a given position (between 0 and 1) of a gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Color,
}

impl ColorStop {
    #[inline]
    pub fn new(offset: f32, color: Color) -> Self {
        ColorStop{offset, color}
    }
}

/// Color of the gradient with given stops at position `t`.
fn gradient_color(stops: &[ColorStop], t: f32) -> Color {
    let first = match stops.first() {
        Some(stop) => stop,
        None => return Color::black(),
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            if span <= 0.0 {
                return b.color;
            }
            return a.color.lerp(b.color, (t - a.offset) / span);
        }
    }
    stops[stops.len() - 1].color
}


/// Font parameters for measuring & drawing text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSpec {
    /// Font size in pixels.
    pub size: f32,
}

impl FontSpec {
    #[inline]
    pub fn new(size: f32) -> Self {
        FontSpec{size}
    }
}

/// Outline drawn around text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Color,
    /// Total width of the outline, in pixels.
    pub width: f32,
}

/// Style of the text drawn by `Canvas::draw_text`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font: FontSpec,
    pub fill: Color,
    pub stroke: Option<Stroke>,
}


/// Drawing surface that memes are rendered onto.
///
/// All coordinates are in pixels, with the origin at the top-left corner.
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Width of a line of text when drawn with given font.
    fn measure_text(&self, text: &str, font: &FontSpec) -> f32;

    /// Draw a single line of text, centered horizontally at `x`
    /// and vertically at `y`.
    ///
    /// If the style includes a stroke, it must be painted before the fill.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle);

    /// Draw the image scaled to fill the destination rectangle.
    /// Parts of the rectangle outside of the canvas are clipped.
    fn draw_image_scaled(&mut self, image: &DynamicImage, dest: Rect);

    /// Fill the rectangle with a linear gradient
    /// running from its top-left to its bottom-right corner.
    fn fill_gradient(&mut self, rect: Rect, stops: &[ColorStop]);

    /// Fill the rectangle with a solid color of given opacity.
    fn fill_rect(&mut self, rect: Rect, color: Color, alpha: f32);
}


/// Canvas backed by an in-memory RGBA image.
pub struct RasterCanvas<'f> {
    image: RgbaImage,
    font: &'f Font,
}

impl<'f> RasterCanvas<'f> {
    /// Create a transparent canvas of given size.
    pub fn new(width: u32, height: u32, font: &'f Font) -> Self {
        RasterCanvas{image: RgbaImage::new(width, height), font}
    }

    #[inline]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    #[inline]
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Encode the canvas content as PNG.
    pub fn into_png(self) -> ImageResult<Vec<u8>> {
        let (width, height) = self.image.dimensions();
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes)
            .write_image(self.image.as_raw(), width, height, image::ColorType::Rgba8)?;
        Ok(bytes)
    }
}

impl<'f> fmt::Debug for RasterCanvas<'f> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("RasterCanvas")
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .field("font", self.font)
            .finish()
    }
}

impl<'f> Canvas for RasterCanvas<'f> {
    #[inline]
    fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    fn height(&self) -> u32 {
        self.image.height()
    }

    fn measure_text(&self, text: &str, font: &FontSpec) -> f32 {
        // Width is the final X position of the "caret"
        // after laying out the glyphs starting from X=0.
        self.font.layout(text, Scale::uniform(font.size), point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) {
        let coverage = match self.text_mask(text, x, y, style) {
            Some(mask) => mask,
            None => return,
        };
        trace!("Drawing {:?} within a {}x{} mask at ({}, {})",
            text, coverage.width, coverage.height, coverage.left, coverage.top);

        if let Some(stroke) = style.stroke {
            let outline = coverage.dilate(stroke.width / 2.0);
            self.paint_mask(&outline, stroke.color);
        }
        self.paint_mask(&coverage, style.fill);
    }

    fn draw_image_scaled(&mut self, image: &DynamicImage, dest: Rect) {
        let (src_width, src_height) = (image.width(), image.height());
        if src_width == 0 || src_height == 0 || dest.width <= 0.0 || dest.height <= 0.0 {
            return;
        }
        let (x, y, width, height) = match dest.clip(self.width(), self.height()) {
            Some(visible) => visible,
            None => return,
        };

        // Map the visible part back onto the source image, so that only
        // the pixels which end up on the canvas are resampled.
        let scale_x = src_width as f32 / dest.width;
        let scale_y = src_height as f32 / dest.height;
        let src_left = ((x as f32 - dest.x) * scale_x).max(0.0).floor() as u32;
        let src_top = ((y as f32 - dest.y) * scale_y).max(0.0).floor() as u32;
        let src_left = src_left.min(src_width - 1);
        let src_top = src_top.min(src_height - 1);
        let src_right = (((x + width) as f32 - dest.x) * scale_x).ceil() as u32;
        let src_bottom = (((y + height) as f32 - dest.y) * scale_y).ceil() as u32;
        let src_w = (src_right.min(src_width).max(src_left + 1)) - src_left;
        let src_h = (src_bottom.min(src_height).max(src_top + 1)) - src_top;

        trace!("Scaling {}x{} region at ({}, {}) of the image to {}x{} at ({}, {})",
            src_w, src_h, src_left, src_top, width, height, x, y);
        let region = image.crop_imm(src_left, src_top, src_w, src_h);
        let scaled = imageops::resize(&region, width, height, FilterType::Triangle);
        imageops::overlay(&mut self.image, &scaled, x as i64, y as i64);
    }

    fn fill_gradient(&mut self, rect: Rect, stops: &[ColorStop]) {
        let (left, top, width, height) = match rect.clip(self.width(), self.height()) {
            Some(visible) => visible,
            None => return,
        };
        // Project each pixel center onto the diagonal of the rectangle.
        let length_sq = rect.width * rect.width + rect.height * rect.height;
        if length_sq <= 0.0 {
            return;
        }
        for py in top..top + height {
            for px in left..left + width {
                let dx = px as f32 + 0.5 - rect.x;
                let dy = py as f32 + 0.5 - rect.y;
                let t = (dx * rect.width + dy * rect.height) / length_sq;
                let color = gradient_color(stops, t);
                blend(self.image.get_pixel_mut(px, py), color, 1.0);
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        let (left, top, width, height) = match rect.clip(self.width(), self.height()) {
            Some(visible) => visible,
            None => return,
        };
        for py in top..top + height {
            for px in left..left + width {
                blend(self.image.get_pixel_mut(px, py), color, alpha);
            }
        }
    }
}

impl<'f> RasterCanvas<'f> {
    /// Rasterize a line of text into a coverage mask, clipped to the canvas
    /// (plus the room needed for the outline).
    ///
    /// Returns `None` if nothing of the text would be visible.
    fn text_mask(&self, text: &str, x: f32, y: f32, style: &TextStyle) -> Option<Mask> {
        if text.is_empty() {
            return None;
        }
        let scale = Scale::uniform(style.font.size);
        let v_metrics = self.font.v_metrics(scale);
        let margin = style.stroke.map(|s| (s.width / 2.0).ceil() as i32 + 1).unwrap_or(0);

        // Put the middle of the ascent-descent span at `y`
        // (descent is negative).
        let baseline = y + (v_metrics.ascent + v_metrics.descent) / 2.0;
        let (span_top, span_bottom) = (baseline - v_metrics.ascent, baseline - v_metrics.descent);
        if span_bottom + (margin as f32) < 0.0 || span_top - (margin as f32) > self.height() as f32 {
            trace!("Skipping {:?} at y={} as it lies outside of the canvas", text, y);
            return None;
        }

        let text_width = self.measure_text(text, &style.font);
        let origin = point(x - text_width / 2.0, baseline);
        let glyphs: Vec<_> = self.font.layout(text, scale, origin).collect();

        let clip = (-margin, -margin,
                    self.width() as i32 + margin, self.height() as i32 + margin);
        Mask::for_glyphs(&glyphs, margin, clip)
    }

    fn paint_mask(&mut self, mask: &Mask, color: Color) {
        let (width, height) = self.image.dimensions();
        for my in 0..mask.height {
            let y = mask.top + my as i32;
            if y < 0 || y >= height as i32 {
                continue;
            }
            for mx in 0..mask.width {
                let x = mask.left + mx as i32;
                if x < 0 || x >= width as i32 {
                    continue;
                }
                let alpha = mask.values[(my * mask.width + mx) as usize];
                if alpha > 0.0 {
                    blend(self.image.get_pixel_mut(x as u32, y as u32), color, alpha);
                }
            }
        }
    }
}


/// Alpha-composite a color of given opacity over the pixel.
fn blend(pixel: &mut Rgba<u8>, color: Color, alpha: f32) {
    let alpha = alpha.max(0.0).min(1.0);
    let Rgba([r, g, b, a]) = *pixel;
    let dst_alpha = a as f32 / 255.0;
    let out_alpha = alpha + dst_alpha * (1.0 - alpha);
    if out_alpha <= 0.0 {
        return;
    }
    let Color(cr, cg, cb) = color;
    let mix = |src: u8, dst: u8| {
        let value = (src as f32 * alpha + dst as f32 * dst_alpha * (1.0 - alpha)) / out_alpha;
        value.round().max(0.0).min(255.0) as u8
    };
    *pixel = Rgba([mix(cr, r), mix(cg, g), mix(cb, b), (out_alpha * 255.0).round() as u8]);
}


/// Grayscale coverage map of a piece of text, positioned on the canvas.
#[derive(Clone, Debug)]
struct Mask {
    left: i32,
    top: i32,
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl Mask {
    /// Rasterize the glyphs into a mask,
    /// leaving a margin of given size around them.
    ///
    /// The mask never extends beyond the `(left, top, right, bottom)` clip area;
    /// glyph pixels outside of it are dropped.
    fn for_glyphs(glyphs: &[PositionedGlyph], margin: i32,
                  clip: (i32, i32, i32, i32)) -> Option<Mask> {
        let boxes: Vec<_> = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).collect();
        let left = (boxes.iter().map(|bb| bb.min.x).min()? - margin).max(clip.0);
        let top = (boxes.iter().map(|bb| bb.min.y).min()? - margin).max(clip.1);
        let right = (boxes.iter().map(|bb| bb.max.x).max()? + margin).min(clip.2);
        let bottom = (boxes.iter().map(|bb| bb.max.y).max()? + margin).min(clip.3);
        if right <= left || bottom <= top {
            return None;
        }

        let (width, height) = ((right - left) as u32, (bottom - top) as u32);
        let mut mask = Mask{left, top, width, height,
                            values: vec![0.0; (width * height) as usize]};
        for glyph in glyphs {
            let bb = match glyph.pixel_bounding_box() {
                Some(bb) => bb,
                None => continue,
            };
            if bb.max.x <= left || bb.min.x >= right || bb.max.y <= top || bb.min.y >= bottom {
                continue;
            }
            glyph.draw(|x, y, v| {
                let mx = bb.min.x + x as i32 - left;
                let my = bb.min.y + y as i32 - top;
                if mx < 0 || my < 0 || mx >= width as i32 || my >= height as i32 {
                    return;
                }
                let idx = (my as u32 * width + mx as u32) as usize;
                // Glyphs may overlap slightly with kerning.
                mask.values[idx] = mask.values[idx].max(v);
            });
        }
        Some(mask)
    }

    /// Grow the covered area outwards by given radius.
    ///
    /// Pixels within the radius of the solid (at least half covered) part
    /// become fully covered, with a one pixel wide antialiased edge.
    /// Runs in time linear to the size of the mask.
    fn dilate(&self, radius: f32) -> Mask {
        if radius <= 0.0 {
            return self.clone();
        }
        let width = self.width;
        let solid = GrayImage::from_fn(self.width, self.height, |x, y| {
            let covered = self.values[(y * width + x) as usize] >= 0.5;
            Luma([if covered { 255 } else { 0 }])
        });
        let distances = euclidean_squared_distance_transform(&solid);
        let values = self.values.iter().zip(distances.pixels())
            .map(|(&coverage, &Luma([dist_sq]))| {
                let edge = (radius + 0.5 - dist_sq.sqrt() as f32).max(0.0).min(1.0);
                coverage.max(edge)
            })
            .collect();
        Mask{values, ..*self}
    }
}
