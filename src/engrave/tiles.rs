//! Pattern tile generation sized to cover the canvas after rotation
//!
//! A tile is a square of side `max(width, height)` for quarter-turn angles.
//! Any other angle needs the canvas diagonal, `ceil(sqrt(2) * max)`, so the
//! rotated square still covers every canvas pixel, plus the edge margin the
//! interpolation needs to keep its border samples opaque. Rotation happens
//! about the tile's own center; placing it on the canvas is a separate offset.

use crate::io::error::Result;
use crate::io::patterns::PatternRegistry;
use crate::raster::rotation::{edge_margin, rotate_about_center, rotate_into};
use crate::raster::{Canvas, Interpolation, Rotation};
use image::{Rgba, RgbaImage};

// Absorbs float noise so exact products are not rounded up a whole pixel
const SIZE_EPSILON: f64 = 1e-9;

/// Side of the square tile needed for `max_dimension` at `rotation`
///
/// Quarter turns are exact and need no margin.
pub fn tile_size(max_dimension: u32, rotation: Rotation, interpolation: Interpolation) -> u32 {
    if rotation.is_axis_aligned() {
        max_dimension
    } else {
        let diagonal = f64::from(max_dimension) * std::f64::consts::SQRT_2;
        (diagonal - SIZE_EPSILON).ceil() as u32 + edge_margin(interpolation)
    }
}

/// Grow `extent` by at most one pixel per axis to share the canvas parity
///
/// With equal parity the centering offset `(canvas - extent) / 2` is exact,
/// so the rotated tile's center lands on the canvas center.
pub const fn parity_matched(extent: (u32, u32), canvas: Canvas) -> (u32, u32) {
    let (width, height) = canvas.dimensions();
    (
        extent.0 + (extent.0 ^ width) % 2,
        extent.1 + (extent.1 ^ height) % 2,
    )
}

/// Offset that places a rotated tile of `tile` dimensions on `canvas`
///
/// Quarter-turn tiles stay at the origin; their side already equals the
/// larger canvas side. Other tiles are centered on the canvas center.
pub fn placement_offset(canvas: Canvas, tile: (u32, u32), rotation: Rotation) -> [i64; 2] {
    if rotation.is_axis_aligned() {
        return [0, 0];
    }
    let (width, height) = canvas.dimensions();
    [
        (i64::from(width) - i64::from(tile.0)).div_euclid(2),
        (i64::from(height) - i64::from(tile.1)).div_euclid(2),
    ]
}

/// Repeat `pattern` across `buffer` from its top-left corner, without scaling
pub fn fill_with_pattern(buffer: &mut RgbaImage, pattern: &RgbaImage) {
    let (pattern_w, pattern_h) = pattern.dimensions();
    if pattern_w == 0 || pattern_h == 0 {
        return;
    }
    for (x, y, pixel) in buffer.enumerate_pixels_mut() {
        if let Some(&source) = pattern.get_pixel_checked(x % pattern_w, y % pattern_h) {
            *pixel = source;
        }
    }
}

/// Rotated pattern buffer and its position relative to the canvas origin
#[derive(Debug, Clone, PartialEq)]
pub struct PatternTile {
    pixels: RgbaImage,
    offset: [i64; 2],
    rotation: Rotation,
    tile_size: u32,
}

impl PatternTile {
    /// Rotated pixel content
    pub const fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Top-left position relative to the canvas origin (x, y)
    pub const fn offset(&self) -> [i64; 2] {
        self.offset
    }

    /// Rotation that was applied
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Side of the square before rotation
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Post-rotation bounding box (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Whether the placed tile's extent contains the whole canvas
    pub fn spans(&self, canvas: Canvas) -> bool {
        let [ox, oy] = self.offset;
        let (width, height) = self.dimensions();
        ox <= 0
            && oy <= 0
            && ox + i64::from(width) >= i64::from(canvas.width())
            && oy + i64::from(height) >= i64::from(canvas.height())
    }
}

/// Builds rotated pattern tiles from a pattern registry
pub struct TileGenerator<'a, R: PatternRegistry + ?Sized> {
    patterns: &'a R,
    interpolation: Interpolation,
}

impl<'a, R: PatternRegistry + ?Sized> TileGenerator<'a, R> {
    /// Generator drawing patterns from `patterns`
    pub const fn new(patterns: &'a R, interpolation: Interpolation) -> Self {
        Self {
            patterns,
            interpolation,
        }
    }

    /// Allocate, fill, rotate and place one tile for a `width` x `height` canvas
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `width` or `height` is zero or exceeds the canvas limit (`InvalidDimensions`)
    /// - `pattern_id` is not registered (`PatternNotFound`)
    pub fn generate(
        &self,
        width: u32,
        height: u32,
        pattern_id: &str,
        rotation_degrees: f64,
    ) -> Result<PatternTile> {
        let canvas = Canvas::new(width, height)?;
        let pattern = self.patterns.require(pattern_id)?;
        let rotation = Rotation::degrees(rotation_degrees);

        let size = tile_size(canvas.max_dimension(), rotation, self.interpolation);
        let mut buffer = RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 0]));
        fill_with_pattern(&mut buffer, pattern);

        let pixels = if rotation.is_axis_aligned() {
            rotate_about_center(&buffer, rotation, self.interpolation)
        } else {
            let extent = parity_matched(rotation.bounding_box(size, size), canvas);
            rotate_into(&buffer, rotation, self.interpolation, extent)
        };
        let offset = placement_offset(canvas, pixels.dimensions(), rotation);
        let [offset_x, offset_y] = offset;

        tracing::debug!(
            pattern_id,
            rotation = rotation_degrees,
            tile_size = size,
            rotated_width = pixels.width(),
            rotated_height = pixels.height(),
            offset_x,
            offset_y,
            "generated pattern tile"
        );

        Ok(PatternTile {
            pixels,
            offset,
            rotation,
            tile_size: size,
        })
    }
}
