//! Luminance band extraction by channel thresholding
//!
//! Each threshold is a fraction of full-scale intensity; a pixel belongs to
//! the band when `intensity / 255 >= threshold`. Callers pass fractions, not
//! raw 0-255 levels: a level of 80 must be given as `80.0 / 255.0`.

use crate::raster::{BandMask, Channel, SourceImage};
use ndarray::Array2;

/// Whether a pixel of the given intensity passes a fractional threshold
pub fn passes_threshold(intensity: u8, threshold: f64) -> bool {
    f64::from(intensity) / 255.0 >= threshold
}

/// Whether thresholds are non-decreasing, so each band nests in the previous
pub fn is_monotonic(thresholds: &[f64]) -> bool {
    thresholds.windows(2).all(|pair| match pair {
        [lower, upper] => lower <= upper,
        _ => true,
    })
}

/// Derives one binary mask per threshold from a source channel
#[derive(Debug, Clone, Copy, Default)]
pub struct BandExtractor {
    channel: Channel,
}

impl BandExtractor {
    /// Extractor reading the given channel
    pub const fn new(channel: Channel) -> Self {
        Self { channel }
    }

    /// Channel this extractor thresholds
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// One mask per threshold, in input order, each the size of `source`
    ///
    /// An empty threshold list yields no masks. The source is only read.
    pub fn extract(&self, source: &SourceImage, thresholds: &[f64]) -> Vec<BandMask> {
        if thresholds.is_empty() {
            return Vec::new();
        }
        if !is_monotonic(thresholds) {
            tracing::warn!(
                ?thresholds,
                "thresholds are not increasing; bands will not nest"
            );
        }
        Self::threshold_channel(&source.channel(self.channel), thresholds)
    }

    /// Threshold a (row, col) intensity array once per threshold
    pub fn threshold_channel(intensity: &Array2<u8>, thresholds: &[f64]) -> Vec<BandMask> {
        let (rows, cols) = intensity.dim();
        thresholds
            .iter()
            .enumerate()
            .map(|(index, &threshold)| {
                let mask = BandMask::from_fn(cols as u32, rows as u32, |x, y| {
                    intensity
                        .get((y as usize, x as usize))
                        .is_some_and(|&value| passes_threshold(value, threshold))
                });
                tracing::debug!(
                    index,
                    threshold,
                    selected = mask.count_selected(),
                    "extracted band mask"
                );
                mask
            })
            .collect()
    }
}
