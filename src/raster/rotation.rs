//! Rotation about the buffer center with automatic bounding-box growth
//!
//! Angles are in degrees, positive clockwise on screen (y grows downwards).
//! Quarter turns are exact pixel permutations; any other angle is warped
//! through an `imageproc` projection into a buffer large enough to hold every
//! rotated corner, with the uncovered corners left transparent.

use image::{Rgba, RgbaImage, imageops};
use imageproc::geometric_transformations::{Projection, warp_into};

pub use imageproc::geometric_transformations::Interpolation;

// Tolerance for treating an angle as a multiple of 90 degrees and for
// absorbing float noise before rounding extents up
const ANGLE_EPSILON: f64 = 1e-9;

/// Pixels a resampled edge needs beyond the covered area to read as opaque
///
/// Interpolated samples near the border of a buffer mix in the transparent
/// background, so callers that need full coverage grow their source by this
/// much before rotating.
pub const fn edge_margin(interpolation: Interpolation) -> u32 {
    match interpolation {
        Interpolation::Nearest => 0,
        Interpolation::Bilinear => 2,
        Interpolation::Bicubic => 4,
    }
}

/// A rotation angle in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    degrees: f64,
}

impl Rotation {
    /// Rotation by `degrees`, positive clockwise
    pub const fn degrees(degrees: f64) -> Self {
        Self { degrees }
    }

    /// Angle in degrees as given
    pub const fn as_degrees(self) -> f64 {
        self.degrees
    }

    /// Whether the angle is a whole number of quarter turns
    pub fn is_axis_aligned(self) -> bool {
        let remainder = self.degrees.rem_euclid(90.0);
        remainder < ANGLE_EPSILON || 90.0 - remainder < ANGLE_EPSILON
    }

    /// Number of clockwise quarter turns (0 to 3) for axis-aligned angles
    pub fn quarter_turns(self) -> Option<u8> {
        self.is_axis_aligned()
            .then(|| ((self.degrees / 90.0).round() as i64).rem_euclid(4) as u8)
    }

    /// Size of the smallest buffer holding a rotated `width` x `height` buffer
    pub fn bounding_box(self, width: u32, height: u32) -> (u32, u32) {
        match self.quarter_turns() {
            Some(0 | 2) => (width, height),
            Some(_) => (height, width),
            None => {
                let (sin, cos) = self.degrees.to_radians().sin_cos();
                let (w, h) = (f64::from(width), f64::from(height));
                let rotated_w = w.mul_add(cos.abs(), h * sin.abs());
                let rotated_h = w.mul_add(sin.abs(), h * cos.abs());
                (
                    (rotated_w - ANGLE_EPSILON).ceil() as u32,
                    (rotated_h - ANGLE_EPSILON).ceil() as u32,
                )
            }
        }
    }
}

/// Rotate `image` about its own center, growing the buffer to fit
///
/// The returned buffer has the dimensions given by
/// [`Rotation::bounding_box`]; its center coincides with the rotated
/// content's center.
pub fn rotate_about_center(
    image: &RgbaImage,
    rotation: Rotation,
    interpolation: Interpolation,
) -> RgbaImage {
    match rotation.quarter_turns() {
        Some(1) => imageops::rotate90(image),
        Some(2) => imageops::rotate180(image),
        Some(3) => imageops::rotate270(image),
        Some(_) => image.clone(),
        None => {
            let extent = rotation.bounding_box(image.width(), image.height());
            rotate_into(image, rotation, interpolation, extent)
        }
    }
}

/// Rotate `image` about its center into a transparent buffer of `extent`
///
/// Source and output centers coincide. Quarter turns are resampled like any
/// other angle here; [`rotate_about_center`] is the exact path for those.
pub fn rotate_into(
    image: &RgbaImage,
    rotation: Rotation,
    interpolation: Interpolation,
    extent: (u32, u32),
) -> RgbaImage {
    let (src_x, src_y) = pixel_center(image.dimensions());
    let (dst_x, dst_y) = pixel_center(extent);
    let theta = rotation.as_degrees().to_radians() as f32;

    let projection = Projection::translate(dst_x, dst_y)
        * Projection::rotate(theta)
        * Projection::translate(-src_x, -src_y);

    let mut output = RgbaImage::new(extent.0, extent.1);
    warp_into(
        image,
        &projection,
        interpolation,
        Rgba([0, 0, 0, 0]),
        &mut output,
    );
    output
}

// Pixels are addressed by their centers, so the middle of a `w` wide buffer
// sits at (w - 1) / 2
const fn pixel_center((width, height): (u32, u32)) -> (f32, f32) {
    ((width as f32 - 1.0) / 2.0, (height as f32 - 1.0) / 2.0)
}
