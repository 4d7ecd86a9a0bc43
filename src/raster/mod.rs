//! Pixel-level primitives the engraving pipeline is built on
//!
//! This module contains the raster functionality including:
//! - Canvas bounds and named layers
//! - The flattened source image and its channels
//! - Binary band masks
//! - Alpha-over blending and rotation with bounding-box growth

/// Alpha-over blending of pixels and offset layers
pub mod blend;
/// Canvas bounds and named pixel layers
pub mod layer;
/// Bit-packed binary selection masks
pub mod mask;
/// Rotation about the buffer center with automatic bounding-box growth
pub mod rotation;
/// Flattened source raster and channel extraction
pub mod source;

pub use layer::{Canvas, Layer};
pub use mask::BandMask;
pub use rotation::{Interpolation, Rotation};
pub use source::{Channel, SourceImage};
