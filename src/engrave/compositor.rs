//! Band mask application and crop to the canvas

use crate::engrave::tiles::PatternTile;
use crate::raster::blend::Overlap;
use crate::raster::{BandMask, Canvas, Layer};
use image::RgbaImage;

/// Pattern tile gated by a band mask, cropped to the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedLayer {
    pixels: RgbaImage,
}

impl MaskedLayer {
    /// Wrap an already masked, canvas-sized buffer
    pub const fn from_pixels(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Masked pixel content
    pub const fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Number of pixels with any opacity
    pub fn visible_pixels(&self) -> usize {
        self.pixels
            .pixels()
            .filter(|pixel| {
                let [_, _, _, alpha] = pixel.0;
                alpha > 0
            })
            .count()
    }

    /// Convert into a named layer at the canvas origin
    pub fn into_layer(self, name: impl Into<String>) -> Layer {
        Layer::new(name, self.pixels)
    }
}

/// Applies band masks to placed pattern tiles
#[derive(Debug, Clone, Copy, Default)]
pub struct MaskCompositor;

impl MaskCompositor {
    /// Multiply the tile's alpha by the mask and crop to `canvas`
    ///
    /// The tile is read at its placement offset. Tile and mask content
    /// outside the canvas is dropped; canvas pixels the tile does not reach,
    /// or the mask does not select, are fully transparent. Neither input is
    /// modified.
    pub fn composite(tile: &PatternTile, mask: &BandMask, canvas: Canvas) -> MaskedLayer {
        let mut pixels = canvas.transparent();
        let [ox, oy] = tile.offset();
        let source = tile.pixels();

        if let Some(overlap) = Overlap::of(canvas.dimensions(), source.dimensions(), [ox, oy]) {
            for y in overlap.y_start..overlap.y_end {
                let ty = (i64::from(y) - oy) as u32;
                for x in overlap.x_start..overlap.x_end {
                    // Binary mask: alpha * 0 clears the pixel, alpha * 1 keeps it
                    if !mask.get(x, y) {
                        continue;
                    }
                    let tx = (i64::from(x) - ox) as u32;
                    if let (Some(&value), Some(target)) = (
                        source.get_pixel_checked(tx, ty),
                        pixels.get_pixel_mut_checked(x, y),
                    ) {
                        *target = value;
                    }
                }
            }
        }

        MaskedLayer { pixels }
    }
}
