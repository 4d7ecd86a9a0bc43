//! The engraving effect: band extraction, tiling, masking and merging
//!
//! Control flow per run: bands are extracted once, then each step pairs
//! mask `i` with pattern tile `i`, and the masked layers are merged last.

/// Luminance band extraction by channel thresholding
pub mod bands;
/// Band mask application and crop to the canvas
pub mod compositor;
/// Painter's-order merge of masked layers over an opaque backing
pub mod merger;
/// End-to-end pipeline, plans and the host-facing entry point
pub mod pipeline;
/// Pattern tile generation sized to cover the canvas after rotation
pub mod tiles;

pub use bands::BandExtractor;
pub use compositor::{MaskCompositor, MaskedLayer};
pub use merger::{EngravedResult, StackMerger};
pub use pipeline::{EngravingPlan, EngravingStep, Pipeline, PipelineObserver, PipelineState, run};
pub use tiles::{PatternTile, TileGenerator};
