//! Tests for bit-packed band masks

#[cfg(test)]
mod tests {
    use engraving::raster::BandMask;

    // Tests new masks select nothing
    // Verified by initializing bits to true
    #[test]
    fn test_new_mask_is_empty() {
        let mask = BandMask::new(7, 3);
        assert_eq!(mask.dimensions(), (7, 3));
        assert!(mask.is_empty());
        assert_eq!(mask.count_selected(), 0);
    }

    // Tests from_fn stores pixels in row-major order
    // Verified by swapping x and y in the bit index
    #[test]
    fn test_from_fn_row_major() {
        let mask = BandMask::from_fn(4, 2, |x, y| x == 3 && y == 0);
        assert!(mask.get(3, 0));
        assert!(!mask.get(0, 3));
        assert!(!mask.get(3, 1));
        assert_eq!(mask.count_selected(), 1);
    }

    // Tests reads and writes outside the mask are harmless
    // Verified by wrapping out-of-range x into the next row
    #[test]
    fn test_out_of_range_access() {
        let mut mask = BandMask::new(2, 2);
        mask.set(2, 0, true);
        mask.set(0, 5, true);
        assert!(mask.is_empty());
        assert!(!mask.get(2, 0));

        mask.set(1, 1, true);
        assert!(mask.get(1, 1));
        mask.set(1, 1, false);
        assert!(!mask.get(1, 1));
    }

    // Tests subset relation including the dimension check
    // Verified by ignoring dimensions in is_subset_of
    #[test]
    fn test_subset_relation() {
        let small = BandMask::from_fn(4, 4, |x, _| x < 1);
        let large = BandMask::from_fn(4, 4, |x, _| x < 3);

        assert!(small.is_subset_of(&large));
        assert!(!large.is_subset_of(&small));
        assert!(BandMask::new(4, 4).is_subset_of(&small));
        assert!(!BandMask::new(4, 5).is_subset_of(&large));
    }

    // Tests conversion to an 8-bit channel
    // Verified by writing 1 instead of 255 for selected pixels
    #[test]
    fn test_to_image() {
        let mask = BandMask::from_fn(3, 1, |x, _| x == 1);
        let image = mask.to_image();
        assert_eq!(image.dimensions(), (3, 1));
        assert_eq!(image.get_pixel(0, 0).0, [0]);
        assert_eq!(image.get_pixel(1, 0).0, [255]);
    }
}
