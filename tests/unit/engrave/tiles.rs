//! Tests for tile sizing, placement and generation

#[cfg(test)]
mod tests {
    use engraving::EngravingError;
    use engraving::PatternLibrary;
    use engraving::engrave::TileGenerator;
    use engraving::engrave::tiles::{
        fill_with_pattern, parity_matched, placement_offset, tile_size,
    };
    use engraving::raster::{Canvas, Interpolation, Rotation};
    use image::{Rgba, RgbaImage};

    const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn striped_library() -> PatternLibrary {
        let mut library = PatternLibrary::new();
        let stripes = RgbaImage::from_fn(4, 4, |_, y| {
            if y % 2 == 0 { INK } else { Rgba([0, 0, 0, 0]) }
        });
        library.register("stripes", stripes).expect("non-empty pattern");
        library
    }

    // Tests tile side for axis-aligned and diagonal angles
    // Verified by dropping the sqrt(2) factor
    #[test]
    fn test_tile_size() {
        let nearest = Interpolation::Nearest;
        assert_eq!(tile_size(100, Rotation::degrees(0.0), nearest), 100);
        assert_eq!(tile_size(100, Rotation::degrees(90.0), nearest), 100);
        assert_eq!(tile_size(100, Rotation::degrees(-45.0), nearest), 142);
        assert_eq!(tile_size(1, Rotation::degrees(30.0), nearest), 2);
    }

    // Tests interpolated diagonal tiles carry an edge margin
    // Verified by sizing bilinear tiles like nearest ones
    #[test]
    fn test_tile_size_edge_margin() {
        let diagonal = Rotation::degrees(-45.0);
        assert_eq!(tile_size(100, diagonal, Interpolation::Bilinear), 144);
        assert_eq!(tile_size(100, diagonal, Interpolation::Bicubic), 146);
        // Quarter turns stay exact
        let quarter = Rotation::degrees(90.0);
        assert_eq!(tile_size(100, quarter, Interpolation::Bilinear), 100);
    }

    // Tests extents grow to the canvas parity so centring is exact
    // Verified by always adding one pixel
    #[test]
    fn test_parity_matched() {
        let canvas = Canvas::new(100, 37).expect("valid canvas");
        assert_eq!(parity_matched((201, 201), canvas), (202, 201));
        assert_eq!(parity_matched((202, 200), canvas), (202, 201));

        let (width, height) = parity_matched((201, 201), canvas);
        let offset = placement_offset(canvas, (width, height), Rotation::degrees(30.0));
        assert_eq!(offset, [-51, -82]);
        assert_eq!(i64::from(width) + 2 * offset[0], 100);
        assert_eq!(i64::from(height) + 2 * offset[1], 37);
    }

    // Tests placement of axis-aligned and centred tiles
    // Verified by centring axis-aligned tiles too
    #[test]
    fn test_placement_offset() {
        let canvas = Canvas::new(100, 100).expect("valid canvas");
        assert_eq!(
            placement_offset(canvas, (100, 100), Rotation::degrees(90.0)),
            [0, 0]
        );
        assert_eq!(
            placement_offset(canvas, (201, 201), Rotation::degrees(-45.0)),
            [-51, -51]
        );
    }

    // Tests patterns repeat from the top-left without scaling
    // Verified by scaling the pattern to the buffer size
    #[test]
    fn test_fill_with_pattern_repeats() {
        let mut pattern = RgbaImage::new(2, 2);
        pattern.put_pixel(0, 0, INK);
        let mut buffer = RgbaImage::new(5, 5);

        fill_with_pattern(&mut buffer, &pattern);

        assert_eq!(buffer.get_pixel(0, 0), &INK);
        assert_eq!(buffer.get_pixel(2, 4), &INK);
        assert_eq!(buffer.get_pixel(1, 0).0[3], 0);
        assert_eq!(buffer.pixels().filter(|p| **p == INK).count(), 9);
    }

    // Tests axis-aligned tiles are max-dimension squares at the origin
    // Verified by sizing tiles to width only
    #[test]
    fn test_generate_axis_aligned() {
        let library = striped_library();
        let generator = TileGenerator::new(&library, Interpolation::Nearest);
        let tile = generator
            .generate(40, 25, "stripes", 90.0)
            .expect("tile generation succeeds");

        assert_eq!(tile.tile_size(), 40);
        assert_eq!(tile.dimensions(), (40, 40));
        assert_eq!(tile.offset(), [0, 0]);
        assert_eq!(tile.rotation(), Rotation::degrees(90.0));
        assert!(tile.spans(Canvas::new(40, 25).expect("valid canvas")));
        // Rows become columns after a quarter turn
        assert_eq!(tile.pixels().get_pixel(0, 0).0[3], 0);
        assert_eq!(tile.pixels().get_pixel(39, 0), &INK);
    }

    // Tests diagonal tiles grow to cover the canvas after rotation
    // Verified by skipping the diagonal size increase
    #[test]
    fn test_generate_diagonal_covers_canvas() {
        let library = striped_library();
        let generator = TileGenerator::new(&library, Interpolation::Nearest);
        let tile = generator
            .generate(100, 100, "stripes", -45.0)
            .expect("tile generation succeeds");

        assert_eq!(tile.tile_size(), 142);
        let (width, height) = tile.dimensions();
        assert_eq!((width % 2, height % 2), (0, 0));
        assert!(f64::from(width) >= 100.0 * std::f64::consts::SQRT_2);
        assert!(f64::from(height) >= 100.0 * std::f64::consts::SQRT_2);
        assert!(tile.spans(Canvas::new(100, 100).expect("valid canvas")));
    }

    // Tests unknown pattern ids fail without substitution
    // Verified by falling back to the first registered pattern
    #[test]
    fn test_generate_unknown_pattern() {
        let library = striped_library();
        let generator = TileGenerator::new(&library, Interpolation::Nearest);
        match generator.generate(10, 10, "nonexistent", 0.0) {
            Err(EngravingError::PatternNotFound { pattern_id }) => {
                assert_eq!(pattern_id, "nonexistent");
            }
            other => unreachable!("Expected PatternNotFound, got {other:?}"),
        }
    }

    // Tests zero-sized canvases are rejected before the pattern lookup
    // Verified by looking up the pattern first
    #[test]
    fn test_generate_invalid_dimensions() {
        let library = striped_library();
        let generator = TileGenerator::new(&library, Interpolation::Bilinear);
        match generator.generate(0, 10, "nonexistent", 0.0) {
            Err(EngravingError::InvalidDimensions { width, height }) => {
                assert_eq!((width, height), (0, 10));
            }
            other => unreachable!("Expected InvalidDimensions, got {other:?}"),
        }
    }
}
