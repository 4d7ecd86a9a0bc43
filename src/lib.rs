//! Fake engraving effect built from luminance bands and rotated line patterns
//!
//! The source image is thresholded into nested luminance bands. Each band
//! masks a tile filled with its own line pattern, rotated so that the lines
//! run in a different direction, and the masked tiles are stacked bottom to
//! top into one engraving layer above an opaque white backing.

#![forbid(unsafe_code)]

/// Band extraction, tile generation, mask compositing and stack merging
pub mod engrave;
/// Input/output operations, configuration and error handling
pub mod io;
/// Pixel-level primitives: canvas, layers, masks, blending and rotation
pub mod raster;

pub use engrave::{EngravedResult, EngravingPlan, EngravingStep, Pipeline, run};
pub use io::error::{EngravingError, PipelineStage, Result};
pub use io::patterns::{PatternLibrary, PatternRegistry};
pub use raster::SourceImage;
