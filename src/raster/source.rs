//! Flattened, read-only source raster and channel extraction

use crate::io::configuration::{BACKGROUND_COLOR, SOURCE_LAYER_NAME};
use crate::io::error::Result;
use crate::raster::blend::composite_over;
use crate::raster::layer::{Canvas, Layer};
use image::{Rgba, RgbaImage};
use ndarray::Array2;

/// Intensity channel read from the source when thresholding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Channel {
    /// Maximum of red, green and blue
    Value,
    /// Red component
    #[default]
    Red,
    /// Green component
    Green,
    /// Blue component
    Blue,
    /// Rec. 601 luma
    Luminance,
}

impl Channel {
    /// Intensity of one pixel in this channel
    pub fn intensity(self, pixel: Rgba<u8>) -> u8 {
        let [r, g, b, _] = pixel.0;
        match self {
            Self::Value => r.max(g).max(b),
            Self::Red => r,
            Self::Green => g,
            Self::Blue => b,
            Self::Luminance => {
                let luma = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
                luma.round().clamp(0.0, 255.0) as u8
            }
        }
    }
}

/// Opaque input raster, flattened once and never modified afterwards
#[derive(Debug, Clone)]
pub struct SourceImage {
    canvas: Canvas,
    pixels: RgbaImage,
}

impl SourceImage {
    /// Flatten a single RGBA buffer onto the default background
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` if the buffer is empty or too large
    pub fn new(pixels: RgbaImage) -> Result<Self> {
        let canvas = Canvas::new(pixels.width(), pixels.height())?;
        Ok(Self::flatten(
            &[Layer::new(SOURCE_LAYER_NAME, pixels)],
            canvas,
            Rgba(BACKGROUND_COLOR),
        ))
    }

    /// Flatten visible layers, bottom first, onto an opaque background
    ///
    /// Hidden layers are dropped and content outside the canvas is clipped.
    /// The background is forced opaque so the result has no transparency.
    pub fn flatten(layers: &[Layer], canvas: Canvas, background: Rgba<u8>) -> Self {
        let [r, g, b, _] = background.0;
        let mut pixels = canvas.filled(Rgba([r, g, b, u8::MAX]));

        for layer in layers.iter().filter(|layer| layer.visible) {
            composite_over(&mut pixels, &layer.pixels, layer.offset);
        }

        Self { canvas, pixels }
    }

    /// Canvas bounds of the image
    pub const fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Width in pixels
    pub const fn width(&self) -> u32 {
        self.canvas.width()
    }

    /// Height in pixels
    pub const fn height(&self) -> u32 {
        self.canvas.height()
    }

    /// Read-only pixel access
    pub const fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Intensity of one channel as a (row, col) array
    pub fn channel(&self, channel: Channel) -> Array2<u8> {
        let (width, height) = self.canvas.dimensions();
        Array2::from_shape_fn((height as usize, width as usize), |(row, col)| {
            self.pixels
                .get_pixel_checked(col as u32, row as u32)
                .map_or(0, |&pixel| channel.intensity(pixel))
        })
    }
}
