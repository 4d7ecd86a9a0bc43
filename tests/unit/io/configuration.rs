//! Tests for effect constants and default configuration

#[cfg(test)]
mod tests {
    use engraving::io::configuration::{
        BACKGROUND_COLOR, BACKING_COLOR, BAND_SUFFIX, DEFAULT_PATTERN_PREFIX, DEFAULT_ROTATIONS,
        DEFAULT_THRESHOLDS, ENGRAVING_SUFFIX, MAX_CANVAS_DIMENSION, MAX_INDIVIDUAL_PROGRESS_BARS,
        OUTPUT_SUFFIX, default_pattern_ids,
    };

    // Tests the default thresholds rise from 80 to 180 grey levels
    // Verified by reordering the thresholds
    #[test]
    fn test_default_thresholds() {
        assert_eq!(DEFAULT_THRESHOLDS.len(), 6);
        assert!(DEFAULT_THRESHOLDS.windows(2).all(|w| matches!(w, [a, b] if a < b)));
        assert!(DEFAULT_THRESHOLDS.iter().all(|t| (0.0..=1.0).contains(t)));
    }

    // Tests one rotation and one pattern id per default threshold
    // Verified by dropping a default rotation
    #[test]
    fn test_default_lists_align() {
        assert_eq!(DEFAULT_ROTATIONS, [-45.0, 0.0, 0.0, 90.0, 90.0, 0.0]);
        let ids = default_pattern_ids();
        assert_eq!(ids.len(), DEFAULT_THRESHOLDS.len());
        assert_eq!(ids.first().map(String::as_str), Some("waves0"));
        assert_eq!(ids.last().map(String::as_str), Some("waves5"));
        assert!(ids.iter().all(|id| id.starts_with(DEFAULT_PATTERN_PREFIX)));
    }

    // Tests background and backing are opaque white
    // Verified by making the backing transparent
    #[test]
    fn test_colors_opaque_white() {
        assert_eq!(BACKGROUND_COLOR, [255, 255, 255, 255]);
        assert_eq!(BACKING_COLOR, [255, 255, 255, 255]);
    }

    // Tests output suffixes are distinct
    // Verified by reusing the output suffix for bands
    #[test]
    fn test_output_suffixes_distinct() {
        assert_ne!(OUTPUT_SUFFIX, ENGRAVING_SUFFIX);
        assert_ne!(OUTPUT_SUFFIX, BAND_SUFFIX);
        assert_ne!(ENGRAVING_SUFFIX, BAND_SUFFIX);
    }

    // Tests display and allocation limits
    // Verified by reducing dimension limit
    #[test]
    fn test_limits() {
        assert_eq!(MAX_CANVAS_DIMENSION, 16_384);
        assert_eq!(MAX_INDIVIDUAL_PROGRESS_BARS, 5);
    }
}
