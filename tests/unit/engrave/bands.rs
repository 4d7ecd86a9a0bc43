//! Tests for threshold comparisons and band mask extraction

#[cfg(test)]
mod tests {
    use engraving::engrave::BandExtractor;
    use engraving::engrave::bands::{is_monotonic, passes_threshold};
    use engraving::raster::{Channel, SourceImage};
    use image::{Rgba, RgbaImage};
    use ndarray::Array2;

    fn gradient(width: u32) -> SourceImage {
        let pixels = RgbaImage::from_fn(width, 2, |x, _| {
            let level = (x * 255 / (width - 1)) as u8;
            Rgba([level, 0, 255 - level, 255])
        });
        SourceImage::new(pixels).expect("valid source")
    }

    // Tests the threshold comparison is inclusive and fractional
    // Verified by comparing raw levels against the fraction
    #[test]
    fn test_passes_threshold() {
        assert!(passes_threshold(80, 80.0 / 255.0));
        assert!(!passes_threshold(79, 80.0 / 255.0));
        assert!(passes_threshold(0, 0.0));
        assert!(passes_threshold(255, 1.0));
        assert!(!passes_threshold(254, 1.0));
    }

    // Tests monotonicity detection
    // Verified by using < instead of <=
    #[test]
    fn test_is_monotonic() {
        assert!(is_monotonic(&[]));
        assert!(is_monotonic(&[0.5]));
        assert!(is_monotonic(&[0.1, 0.1, 0.7]));
        assert!(!is_monotonic(&[0.5, 0.2]));
    }

    // Tests one mask per threshold, in order, at source size
    // Verified by reversing the threshold iteration
    #[test]
    fn test_extract_one_mask_per_threshold() {
        let source = gradient(6);
        let thresholds = [0.1, 0.5, 0.9];
        let masks = BandExtractor::new(Channel::Red).extract(&source, &thresholds);

        assert_eq!(masks.len(), 3);
        for mask in &masks {
            assert_eq!(mask.dimensions(), (6, 2));
        }
        // Red levels are 0, 51, 102, 153, 204, 255
        assert_eq!(masks.first().map(|m| m.count_selected()), Some(10));
        assert_eq!(masks.get(1).map(|m| m.count_selected()), Some(6));
        assert_eq!(masks.get(2).map(|m| m.count_selected()), Some(2));
    }

    // Tests higher thresholds give nested, smaller bands
    // Verified by selecting pixels below the threshold
    #[test]
    fn test_bands_nest() {
        let source = gradient(16);
        let masks = BandExtractor::default().extract(&source, &[0.2, 0.4, 0.6, 0.8]);
        for pair in masks.windows(2) {
            if let [lower, upper] = pair {
                assert!(upper.is_subset_of(lower));
            }
        }
    }

    // Tests the configured channel is the one thresholded
    // Verified by always reading red
    #[test]
    fn test_extract_reads_configured_channel() {
        let source = gradient(6);
        let extractor = BandExtractor::new(Channel::Blue);
        assert_eq!(extractor.channel(), Channel::Blue);

        let masks = extractor.extract(&source, &[0.9]);
        // Blue is the mirrored gradient, so the dark red end passes
        assert_eq!(masks.first().map(|m| m.get(0, 0)), Some(true));
        assert_eq!(masks.first().map(|m| m.get(5, 0)), Some(false));
    }

    // Tests empty threshold lists yield no masks
    // Verified by returning an all-zero mask for empty input
    #[test]
    fn test_extract_empty_thresholds() {
        assert!(BandExtractor::default().extract(&gradient(4), &[]).is_empty());
    }

    // Tests thresholding a raw intensity array
    // Verified by transposing rows and columns
    #[test]
    fn test_threshold_channel_layout() {
        let intensity = Array2::from_shape_vec((2, 3), vec![0, 0, 255, 0, 0, 0])
            .expect("shape matches data");
        let masks = BandExtractor::threshold_channel(&intensity, &[0.5]);
        let mask = masks.first().expect("one mask");
        assert_eq!(mask.dimensions(), (3, 2));
        assert!(mask.get(2, 0));
        assert_eq!(mask.count_selected(), 1);
    }
}
