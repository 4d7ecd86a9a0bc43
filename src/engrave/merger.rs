//! Painter's-order merge of masked layers over an opaque backing

use crate::engrave::compositor::MaskedLayer;
use crate::io::configuration::{BACKING_COLOR, BACKING_LAYER_NAME, ENGRAVING_LAYER_NAME};
use crate::io::error::{EngravingError, Result};
use crate::raster::blend::composite_over;
use crate::raster::{Canvas, Layer};
use image::{Rgba, RgbaImage};

/// Final two-layer output: the merged engraving above an opaque backing
///
/// The layers are kept apart so a consumer can hide or recolour the backing.
#[derive(Debug, Clone, PartialEq)]
pub struct EngravedResult {
    canvas: Canvas,
    engraving: Option<Layer>,
    backing: Layer,
}

impl EngravedResult {
    /// Canvas the result is clipped to
    pub const fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Merged engraving layer; absent when no bands were rendered
    pub const fn engraving(&self) -> Option<&Layer> {
        self.engraving.as_ref()
    }

    /// Opaque backing layer
    pub const fn backing(&self) -> &Layer {
        &self.backing
    }

    /// Mutable backing layer, for toggling visibility or recolouring
    pub const fn backing_mut(&mut self) -> &mut Layer {
        &mut self.backing
    }

    /// All layers, bottom first
    pub fn layers(&self) -> Vec<&Layer> {
        std::iter::once(&self.backing)
            .chain(self.engraving.as_ref())
            .collect()
    }

    /// Number of layers in the result
    pub fn layer_count(&self) -> usize {
        1 + usize::from(self.engraving.is_some())
    }

    /// Composite the visible layers into a single buffer
    pub fn flatten(&self) -> RgbaImage {
        let mut pixels = self.canvas.transparent();
        for layer in self.layers().into_iter().filter(|layer| layer.visible) {
            composite_over(&mut pixels, &layer.pixels, layer.offset);
        }
        pixels
    }
}

/// Merges masked layers into the engraving and adds the backing
#[derive(Debug, Clone, Copy, Default)]
pub struct StackMerger;

impl StackMerger {
    /// Alpha-over every layer onto a transparent canvas, first layer at the bottom
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` for the first layer whose size differs
    /// from `canvas`
    pub fn flatten_layers(layers: &[MaskedLayer], canvas: Canvas) -> Result<RgbaImage> {
        if let Some((index, layer)) = layers
            .iter()
            .enumerate()
            .find(|(_, layer)| layer.dimensions() != canvas.dimensions())
        {
            return Err(EngravingError::DimensionMismatch {
                index,
                expected: canvas.dimensions(),
                found: layer.dimensions(),
            });
        }

        let mut pixels = canvas.transparent();
        for layer in layers {
            composite_over(&mut pixels, layer.pixels(), [0, 0]);
        }
        Ok(pixels)
    }

    /// Merge `layers` into the engraving layer and place a backing beneath it
    ///
    /// An empty stack produces a result holding only the backing.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if any layer differs in size from `canvas`
    pub fn merge(layers: Vec<MaskedLayer>, canvas: Canvas) -> Result<EngravedResult> {
        let engraving = if layers.is_empty() {
            None
        } else {
            let pixels = Self::flatten_layers(&layers, canvas)?;
            Some(Layer::new(ENGRAVING_LAYER_NAME, pixels))
        };
        drop(layers);

        let backing = Layer::new(BACKING_LAYER_NAME, canvas.filled(Rgba(BACKING_COLOR)));

        tracing::debug!(
            merged = engraving.is_some(),
            width = canvas.width(),
            height = canvas.height(),
            "merged engraving stack"
        );

        Ok(EngravedResult {
            canvas,
            engraving,
            backing,
        })
    }
}
