use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rotozoom::{
    transform, BmpReader, BmpWriter, InterpolationMode, MemorySink, MemorySource, Pixel,
    PixelBuffer, Strategy, TransformConfig,
};
use std::io::Cursor;

fn make_image(width: usize, height: usize, seed: u64) -> PixelBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let base = ((x * 11) ^ (y * 3) ^ (x * y)) & 0xFF;
            let noise: u8 = rng.random_range(0..32);
            data.push(Pixel::new(base as u8, noise, (x * 7 + y) as u8));
        }
    }
    PixelBuffer::from_vec(data, width, height).unwrap()
}

fn encode_bmp(image: &PixelBuffer) -> Vec<u8> {
    let mut writer = BmpWriter::new(Cursor::new(Vec::new()));
    let identity = TransformConfig {
        mode: InterpolationMode::NearestNeighbour,
        ..TransformConfig::default()
    };
    transform(
        &mut MemorySource::new(image.clone()).unwrap(),
        &mut writer,
        &identity,
    )
    .unwrap();
    writer.into_inner().unwrap().into_inner()
}

fn run_bmp(input: &[u8], config: &TransformConfig) -> Vec<u8> {
    let mut reader = BmpReader::new(Cursor::new(input)).unwrap();
    let mut writer = BmpWriter::new(Cursor::new(Vec::new()));
    transform(&mut reader, &mut writer, config).unwrap();
    writer.into_inner().unwrap().into_inner()
}

#[test]
fn tiled_bmp_output_matches_in_memory() {
    let input = encode_bmp(&make_image(29, 18, 11));
    let placements = [(0.0, 1.0), (30.0, 1.0), (-45.0, 1.7), (90.0, 0.6), (200.0, 2.2)];
    for mode in InterpolationMode::ALL {
        for (angle_deg, zoom) in placements {
            let base = TransformConfig {
                angle_deg,
                zoom,
                mode,
                ..TransformConfig::default()
            };
            let expected = run_bmp(&input, &base);
            for (tile_side, padding) in [(1, 3), (7, 5), (16, 3), (100, 5)] {
                let tiled = TransformConfig {
                    strategy: Strategy::Tiled,
                    tile_side,
                    padding,
                    ..base.clone()
                };
                assert!(
                    run_bmp(&input, &tiled) == expected,
                    "{mode} at {angle_deg} x{zoom}, tile {tile_side}, padding {padding}"
                );
            }
        }
    }
}

#[test]
fn tiled_memory_output_matches_in_memory() {
    let image = make_image(40, 25, 5);
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..12 {
        let mode = InterpolationMode::ALL[rng.random_range(0..4)];
        let base = TransformConfig {
            angle_deg: rng.random_range(-180.0..180.0),
            zoom: rng.random_range(0.3..2.5),
            mode,
            ..TransformConfig::default()
        };
        let tiled = TransformConfig {
            strategy: Strategy::Tiled,
            tile_side: rng.random_range(1..40),
            padding: rng.random_range(3..8),
            ..base.clone()
        };

        let mut expected = MemorySink::new();
        let report = transform(
            &mut MemorySource::new(image.clone()).unwrap(),
            &mut expected,
            &base,
        )
        .unwrap();
        assert_eq!(report.tiles, 0);

        let mut actual = MemorySink::new();
        let report = transform(
            &mut MemorySource::new(image.clone()).unwrap(),
            &mut actual,
            &tiled,
        )
        .unwrap();
        assert!(report.tiles > 0);
        assert_eq!(actual.buffer(), expected.buffer(), "{tiled:?}");
    }
}

#[test]
fn tiles_far_outside_the_source_are_white() {
    // A strong rotation leaves the canvas corners empty; tiles there never read.
    let image = make_image(60, 4, 3);
    let config = TransformConfig {
        angle_deg: 45.0,
        mode: InterpolationMode::Bilinear,
        strategy: Strategy::Tiled,
        tile_side: 8,
        ..TransformConfig::default()
    };
    let mut sink = MemorySink::new();
    transform(
        &mut MemorySource::new(image).unwrap(),
        &mut sink,
        &config,
    )
    .unwrap();
    let out = sink.buffer().unwrap();
    assert_eq!(out.get(0, 0), Some(Pixel::WHITE));
    let (w, h) = (out.width(), out.height());
    assert_eq!(out.get(w - 1, h - 1), Some(Pixel::WHITE));
}
