//! Module which defines the captioning engine.

mod builder;

pub use self::builder::{Builder, Error as BuildError};


use std::sync::Arc;

use rand::{self, Rng};

use crate::model::Meme;
use crate::resources::Font;
use super::error::CaptionError;
use super::output::CaptionOutput;
use super::task::CaptionTask;


/// Meme rendering engine.
///
/// The engine is thread-safe (`Sync`) since normally you'd want the rendering
/// to be performed in a background thread.
///
/// *Note*: `Engine` implements `Clone`
/// by merely cloning a shared reference to the underlying object.
#[derive(Clone, Debug)]
pub struct Engine {
    inner: Arc<Inner>,
}

/// Shared state of the engine that caption tasks have access to.
#[derive(Debug)]
pub(super) struct Inner {
    pub font: Font,
}

impl From<Inner> for Engine {
    fn from(inner: Inner) -> Self {
        Engine{inner: Arc::new(inner)}
    }
}

// Constructors.
impl Engine {
    /// Create an `Engine` which renders text with the bundled font.
    ///
    /// For other ways of creating `Engine`, see the `EngineBuilder`.
    #[inline]
    pub fn new() -> Result<Self, BuildError> {
        Builder::new().build()
    }

    /// Create an `Engine` that uses given font.
    #[inline]
    pub fn with_font(font: Font) -> Self {
        Engine::from(Inner{font})
    }
}

// Meme rendering.
impl Engine {
    /// Render the meme as a PNG image.
    ///
    /// Note that rendering is a CPU-intensive process and can be relatively lengthy.
    /// It is recommended to execute it in a separate thread.
    #[inline]
    pub fn render(&self, meme: &Meme) -> Result<CaptionOutput, CaptionError> {
        self.render_with_rng(meme, &mut rand::thread_rng())
    }

    /// Render the meme as a PNG image,
    /// using given source of randomness for the generated background.
    #[inline]
    pub fn render_with_rng<R: Rng + ?Sized>(&self, meme: &Meme,
                                            rng: &mut R) -> Result<CaptionOutput, CaptionError> {
        CaptionTask::new(meme, self.inner.clone()).perform(rng)
    }

    /// The font used for captions.
    #[inline]
    pub fn font(&self) -> &Font {
        &self.inner.font
    }
}


#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use image::{self, DynamicImage, GenericImageView, ImageOutputFormat, Rgba, RgbaImage};
    use rand::rngs::mock::StepRng;
    use spectral::prelude::*;
    use crate::model::{Meme, MemeBuilder};
    use super::Engine;

    lazy_static! {
        static ref ENGINE: Engine = Engine::new().unwrap();
    }

    const PNG_SIGNATURE: &[u8] = &[0x89, 0x50, 0x4e, 0x47];

    #[test]
    fn thread_safe() {
        fn assert_sync<T: Sync>() {}
        fn assert_send<T: Send>() {}

        assert_sync::<Engine>();
        assert_send::<Engine>();
    }

    #[test]
    fn hello_world() {
        let output = ENGINE.render(&Meme::new("Hello", "World")).unwrap();
        assert_that!(output.len()).is_greater_than(0);
        assert_eq!(PNG_SIGNATURE, &output[..4]);

        let image = image::load_from_memory(&output).unwrap();
        assert_eq!((1200, 675), image.dimensions());
    }

    #[test]
    fn always_png() {
        let memes = vec![
            Meme::new("", ""),
            MemeBuilder::new().top_text("x").width(800).height(2400).build().unwrap(),
            MemeBuilder::new().bottom_text("y").width(2400).height(800).build().unwrap(),
            MemeBuilder::new().top_text("bad background").background(vec![1, 2, 3])
                .build().unwrap(),
        ];
        for meme in &memes {
            let output = ENGINE.render(meme).unwrap();
            assert_eq!(PNG_SIGNATURE, &output[..4], "{:?}", meme);
        }
    }

    #[test]
    fn deterministic_with_fixed_rng() {
        let meme = Meme::new("Same", "Meme");
        let first = ENGINE.render_with_rng(&meme, &mut StepRng::new(0, 0)).unwrap();
        let second = ENGINE.render_with_rng(&meme, &mut StepRng::new(0, 0)).unwrap();
        assert_eq!(first.bytes(), second.bytes());
    }

    #[test]
    fn image_background_covers_canvas() {
        let background = DynamicImage::ImageRgba8(
            RgbaImage::from_pixel(300, 100, Rgba([0, 0, 250, 255])));
        let mut bytes = Cursor::new(vec![]);
        background.write_to(&mut bytes, ImageOutputFormat::Png).unwrap();

        let meme = MemeBuilder::new().width(800).height(800)
            .background(bytes.into_inner()).build().unwrap();
        let output = ENGINE.render(&meme).unwrap();
        let image = image::load_from_memory(&output).unwrap().to_rgba8();
        for &(x, y) in &[(0, 0), (799, 0), (0, 799), (799, 799), (400, 400)] {
            let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
            assert!(r < 5 && g < 5 && b > 240 && a == 255, "pixel at ({}, {})", x, y);
        }
    }
}
