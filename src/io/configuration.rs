//! Effect constants and runtime configuration defaults

// Luminance cut points as fractions of full scale (0.31 is roughly 80/255)
/// Default threshold fractions, one band per entry, darkest cut first
pub const DEFAULT_THRESHOLDS: [f64; 6] = [0.31, 0.39, 0.47, 0.55, 0.63, 0.71];

/// Default tile rotation in degrees for each band
pub const DEFAULT_ROTATIONS: [f64; 6] = [-45.0, 0.0, 0.0, 90.0, 90.0, 0.0];

/// Prefix of the default pattern ids (`waves0` to `waves5`)
pub const DEFAULT_PATTERN_PREFIX: &str = "waves";

/// Directory searched for pattern PNGs when none is given
pub const DEFAULT_PATTERN_DIR: &str = "patterns";

/// Colour that transparent input pixels are flattened onto
pub const BACKGROUND_COLOR: [u8; 4] = [255, 255, 255, 255];

/// Fill of the backing layer placed beneath the engraving
pub const BACKING_COLOR: [u8; 4] = [255, 255, 255, 255];

// Safety limit to prevent excessive memory allocation for rotated tiles
/// Maximum allowed canvas dimension
pub const MAX_CANVAS_DIMENSION: u32 = 16_384;

// Layer names carried into the result
/// Name of the merged engraving layer
pub const ENGRAVING_LAYER_NAME: &str = "engraved_layer";
/// Name of the opaque backing layer
pub const BACKING_LAYER_NAME: &str = "white_layer";
/// Name given to the flattened input layer
pub const SOURCE_LAYER_NAME: &str = "original_image";

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 30;

// Output settings
/// Suffix of the flattened output (engraving over backing)
pub const OUTPUT_SUFFIX: &str = "_engraved";
/// Suffix of the transparent engraving-only output
pub const ENGRAVING_SUFFIX: &str = "_engraving";
/// Suffix of per-band outputs, followed by the band index
pub const BAND_SUFFIX: &str = "_band";

/// Pattern ids for the default effect, `waves0` through `waves5`
pub fn default_pattern_ids() -> Vec<String> {
    (0..DEFAULT_THRESHOLDS.len())
        .map(|index| format!("{DEFAULT_PATTERN_PREFIX}{index}"))
        .collect()
}
