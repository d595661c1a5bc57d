//! Domain-critical regression tests for tile-quant.
//!
//! These tests are designed to catch specific classes of bugs, not just
//! confirm happy paths. Each test documents the regression it guards against.

#[cfg(test)]
mod domain_tests {
    use crate::api::Pixelator;
    use crate::buffer::{BlockSize, PixelBuffer};
    use crate::color::{ciede2000, Lab, Rgba8};
    use crate::downsample::downsample;
    use crate::mapper::{Classic, ColorMapper, MapperKind, Perceptual};
    use crate::palette::{IndexedPalette, Palette};

    /// PICO-8 palette: a realistic small palette with saturated entries and
    /// a few greys.
    const PICO8: [&str; 16] = [
        "#000000", "#1d2b53", "#7e2553", "#008751", "#ab5236", "#5f574f", "#c2c3c7", "#fff1e8",
        "#ff004d", "#ffa300", "#ffec27", "#00e436", "#29adff", "#83769c", "#ff77a8", "#ffccaa",
    ];

    fn pico8() -> IndexedPalette {
        IndexedPalette::new(Palette::from_hex(&PICO8).unwrap())
    }

    /// A gradient with a transparent column and a semi-transparent row.
    fn test_image(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |x, y| {
            let a = if x % 5 == 2 {
                0
            } else if y % 4 == 1 {
                128
            } else {
                255
            };
            Rgba8::new(
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                ((x + y) * 7 % 256) as u8,
                a,
            )
        })
    }

    fn both_mappers() -> [(&'static str, Box<dyn ColorMapper>); 2] {
        [
            ("classic", Box::new(Classic)),
            ("perceptual", Box::new(Perceptual::default())),
        ]
    }

    // ========================================================================
    // Transparency: alpha-0 pixels pass through untouched
    // ========================================================================

    /// If this breaks, it means: a mapper wrote a palette color into a fully
    /// transparent pixel, or rewrote its hidden RGB. Transparent tiles must
    /// survive every mapper bit-for-bit.
    #[test]
    fn test_transparent_pixels_untouched_by_both_mappers() {
        let palette = pico8();
        let source = test_image(20, 12);
        for (name, mapper) in both_mappers() {
            let mut mapped = source.clone();
            mapper.map_colors(&mut mapped, &palette);
            for (before, after) in source.pixels().zip(mapped.pixels()) {
                if before.a == 0 {
                    assert_eq!(
                        before, after,
                        "REGRESSION: {name} mapper modified a transparent pixel"
                    );
                } else {
                    assert!(
                        palette.palette().colors().contains(&after),
                        "REGRESSION: {name} mapper produced {after}, not a palette entry"
                    );
                }
            }
        }
    }

    // ========================================================================
    // Determinism
    // ========================================================================

    /// If this breaks, it means: some stage depends on hidden state
    /// (iteration order, uninitialized scratch, shortlist reuse across
    /// pixels). Identical inputs must give byte-identical output.
    #[test]
    fn test_pipeline_is_deterministic() {
        let source = test_image(37, 23);
        let palette = Palette::from_hex(&PICO8).unwrap();
        for mapper in [MapperKind::Classic, MapperKind::Perceptual] {
            let pixelator = Pixelator::new(BlockSize::new(3).unwrap())
                .mapper(mapper)
                .palette(palette.clone());
            let first = pixelator.run(&source);
            let second = pixelator.run(&source);
            assert_eq!(
                first, second,
                "REGRESSION: {mapper} pipeline is not deterministic"
            );
        }
    }

    // ========================================================================
    // Single-entry palette
    // ========================================================================

    /// If this breaks, it means: the mapper skipped pixels, or the entry's
    /// alpha was not written. With a single `#000` entry every non-transparent
    /// tile must become exactly (0, 0, 0, 255).
    #[test]
    fn test_single_entry_palette_maps_everything() {
        let palette = IndexedPalette::new(Palette::from_hex(&["#000"]).unwrap());
        let source = PixelBuffer::from_fn(6, 6, |x, y| {
            Rgba8::new((x * 40) as u8, (y * 40) as u8, 200, 30 + (x * y) as u8)
        });
        for (name, mapper) in both_mappers() {
            let mut mapped = source.clone();
            mapper.map_colors(&mut mapped, &palette);
            assert!(
                mapped.pixels().all(|p| p == Rgba8::opaque(0, 0, 0)),
                "REGRESSION: {name} mapper left a pixel unmapped"
            );
        }
    }

    // ========================================================================
    // Classic mapper: exhaustive nearest, lowest index on ties
    // ========================================================================

    /// If this breaks, it means: the classic mapper is not a true full scan
    /// (early exit, sorted palette) or resolves ties differently. Cross-check
    /// against a brute-force reference.
    #[test]
    fn test_classic_matches_brute_force() {
        let palette = pico8();
        let colors = palette.palette().colors().to_vec();
        let mut mapped = test_image(16, 16);
        let source = mapped.clone();
        Classic.map_colors(&mut mapped, &palette);

        for (before, after) in source.pixels().zip(mapped.pixels()) {
            if before.a == 0 {
                continue;
            }
            let best = colors
                .iter()
                .map(|&c| before.rgb_distance_squared(c))
                .min()
                .unwrap();
            let first = colors
                .iter()
                .position(|&c| before.rgb_distance_squared(c) == best)
                .unwrap();
            assert_eq!(after, colors[first], "REGRESSION: wrong nearest for {before}");
        }
    }

    /// If this breaks, it means: duplicate or equidistant entries no longer
    /// resolve to the first one. Entry alphas differ so the winner is
    /// observable.
    #[test]
    fn test_classic_tie_goes_to_lowest_index() {
        let palette = IndexedPalette::new(
            Palette::new(vec![
                Rgba8::new(100, 100, 100, 255),
                Rgba8::new(100, 100, 100, 200),
                Rgba8::new(100, 100, 100, 100),
            ])
            .unwrap(),
        );
        let mut tiles = PixelBuffer::filled(3, 3, Rgba8::opaque(90, 110, 100));
        Classic.map_colors(&mut tiles, &palette);
        assert!(tiles.pixels().all(|p| p.a == 255));
    }

    // ========================================================================
    // Perceptual mapper: neutral handling
    // ========================================================================

    /// If this breaks, it means: the neutral bias or chroma ramp is no
    /// longer applied, and near-grey tiles get pulled toward saturated
    /// palette colors that happen to be close in raw ΔE00.
    #[test]
    fn test_perceptual_keeps_greys_neutral() {
        let palette = pico8();
        for v in [20u8, 40, 90, 190, 200, 235] {
            let mut tiles = PixelBuffer::filled(3, 3, Rgba8::opaque(v, v, v));
            Perceptual::default().map_colors(&mut tiles, &palette);
            let chosen = tiles.pixel(1, 1);
            let chroma = Lab::from_rgba(chosen).chroma();
            assert!(
                chroma < 15.0,
                "REGRESSION: grey {v} mapped to saturated {chosen} (chroma {chroma:.1})"
            );
        }
    }

    /// If this breaks, it means: the refinement stage replaced the raw
    /// nearest with something far worse. Refinement only re-orders the
    /// shortlist, so the chosen entry must be within it.
    #[test]
    fn test_perceptual_choice_is_in_raw_shortlist() {
        let palette = pico8();
        let source = test_image(12, 9);
        let mut mapped = source.clone();
        Perceptual::default().map_colors(&mut mapped, &palette);

        for (before, after) in source.pixels().zip(mapped.pixels()) {
            if before.a == 0 {
                continue;
            }
            let lab = Lab::from_rgba(before);
            let mut ranked: Vec<(f64, usize)> = palette
                .entries()
                .iter()
                .enumerate()
                .map(|(i, e)| (ciede2000(lab, e.lab), i))
                .collect();
            ranked.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)));
            let in_shortlist = ranked
                .iter()
                .take(8)
                .any(|&(_, i)| palette.entry(i).rgba == after);
            assert!(
                in_shortlist,
                "REGRESSION: {before} mapped to {after}, outside the 8 raw-nearest entries"
            );
        }
    }

    // ========================================================================
    // Downsample geometry and averaging
    // ========================================================================

    /// If this breaks, it means: edge tiles were dropped or padded. A 33x17
    /// source at block 16 must give a 3x2 grid whose edge tiles average only
    /// the real pixels.
    #[test]
    fn test_partial_edge_tiles_are_averaged_over_real_pixels() {
        let source = PixelBuffer::from_fn(33, 17, |x, y| {
            if x == 32 || y == 16 {
                Rgba8::opaque(0, 0, 255)
            } else {
                Rgba8::opaque(255, 0, 0)
            }
        });
        let tiles = downsample(&source, BlockSize::new(16).unwrap());
        assert_eq!((tiles.width(), tiles.height()), (3, 2));
        assert_eq!(tiles.pixel(0, 0), Rgba8::opaque(255, 0, 0));
        assert_eq!(tiles.pixel(2, 0), Rgba8::opaque(0, 0, 255));
        assert_eq!(tiles.pixel(0, 1), Rgba8::opaque(0, 0, 255));
        assert_eq!(tiles.pixel(2, 1), Rgba8::opaque(0, 0, 255));
    }
}
