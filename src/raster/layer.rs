//! Canvas bounds and named pixel layers

use crate::io::configuration::MAX_CANVAS_DIMENSION;
use crate::io::error::{EngravingError, Result};
use image::{Rgba, RgbaImage};

/// Validated pixel extent of the source canvas, anchored at the origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
}

impl Canvas {
    /// Create canvas bounds
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` if either side is zero or larger than
    /// `MAX_CANVAS_DIMENSION`
    pub const fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 || width > MAX_CANVAS_DIMENSION || height > MAX_CANVAS_DIMENSION
        {
            return Err(EngravingError::InvalidDimensions {
                width: width as u64,
                height: height as u64,
            });
        }
        Ok(Self { width, height })
    }

    /// Canvas width in pixels
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as (width, height)
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Larger of the two sides
    pub const fn max_dimension(&self) -> u32 {
        if self.width > self.height {
            self.width
        } else {
            self.height
        }
    }

    /// Check whether a buffer has exactly the canvas dimensions
    pub fn matches(&self, pixels: &RgbaImage) -> bool {
        pixels.dimensions() == self.dimensions()
    }

    /// Fresh buffer of canvas size filled with one colour
    pub fn filled(&self, color: Rgba<u8>) -> RgbaImage {
        RgbaImage::from_pixel(self.width, self.height, color)
    }

    /// Fresh fully transparent buffer of canvas size
    pub fn transparent(&self) -> RgbaImage {
        RgbaImage::new(self.width, self.height)
    }
}

/// Named RGBA buffer positioned on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Display name
    pub name: String,
    /// Pixel content
    pub pixels: RgbaImage,
    /// Position of the top-left pixel relative to the canvas origin (x, y)
    pub offset: [i64; 2],
    /// Hidden layers are ignored by flattening
    pub visible: bool,
}

impl Layer {
    /// Visible layer anchored at the canvas origin
    pub fn new(name: impl Into<String>, pixels: RgbaImage) -> Self {
        Self {
            name: name.into(),
            pixels,
            offset: [0, 0],
            visible: true,
        }
    }

    /// Same layer moved to the given offset
    #[must_use]
    pub fn with_offset(mut self, offset: [i64; 2]) -> Self {
        self.offset = offset;
        self
    }

    /// Layer width in pixels
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Layer height in pixels
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}
