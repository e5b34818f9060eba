use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rotozoom::lowlevel::{sample_bicubic, sample_lanczos3, MirroredView, WeightCache};
use rotozoom::{
    transform, InterpolationMode, MemorySink, MemorySource, Pixel, PixelBuffer, TransformConfig,
};

fn random_image(width: usize, height: usize, seed: u64) -> PixelBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..width * height)
        .map(|_| Pixel::new(rng.random(), rng.random(), rng.random()))
        .collect();
    PixelBuffer::from_vec(data, width, height).unwrap()
}

fn checkerboard(width: usize, height: usize) -> PixelBuffer {
    let data = (0..height)
        .flat_map(|y| {
            (0..width).map(move |x| {
                if (x + y) % 2 == 0 {
                    Pixel::BLACK
                } else {
                    Pixel::WHITE
                }
            })
        })
        .collect();
    PixelBuffer::from_vec(data, width, height).unwrap()
}

fn run(image: &PixelBuffer, angle_deg: f64, zoom: f64, mode: InterpolationMode) -> PixelBuffer {
    let mut source = MemorySource::new(image.clone()).unwrap();
    let mut sink = MemorySink::new();
    let config = TransformConfig {
        angle_deg,
        zoom,
        mode,
        ..TransformConfig::default()
    };
    transform(&mut source, &mut sink, &config).unwrap();
    sink.into_buffer().unwrap()
}

#[test]
fn identity_nearest_reproduces_source() {
    let image = random_image(37, 23, 1);
    let out = run(&image, 0.0, 1.0, InterpolationMode::NearestNeighbour);
    assert_eq!(out, image);
}

#[test]
fn identity_is_exact_for_every_mode() {
    let image = random_image(16, 11, 2);
    for mode in InterpolationMode::ALL {
        assert_eq!(run(&image, 0.0, 1.0, mode), image, "{mode}");
    }
}

#[test]
fn red_square_quarter_turn_stays_red() {
    let red = Pixel::new(255, 0, 0);
    let image = PixelBuffer::filled(4, 4, red).unwrap();
    let out = run(&image, 90.0, 1.0, InterpolationMode::NearestNeighbour);
    assert_eq!((out.width(), out.height()), (4, 4));
    assert!(out.data().iter().all(|&p| p == red));
}

#[test]
fn quarter_turn_moves_top_row_to_left_column() {
    let image = random_image(5, 3, 3);
    let out = run(&image, 90.0, 1.0, InterpolationMode::NearestNeighbour);
    assert_eq!((out.width(), out.height()), (3, 5));
    // Counter-clockwise: source (x, y) lands at (y, width - 1 - x).
    for y in 0..3 {
        for x in 0..5 {
            assert_eq!(out.get(y, 4 - x), image.get(x, y), "source ({x}, {y})");
        }
    }
}

#[test]
fn single_pixel_source_yields_pixel_or_fill() {
    let pixel = Pixel::new(200, 10, 99);
    let image = PixelBuffer::filled(1, 1, pixel).unwrap();
    for mode in InterpolationMode::ALL {
        for angle in [0.0, 17.0, 45.0, 90.0, 133.0, 270.0] {
            for zoom in [0.5, 1.0, 3.0] {
                let out = run(&image, angle, zoom, mode);
                assert!(
                    out.data().iter().all(|&p| p == pixel || p == Pixel::WHITE),
                    "{mode} at {angle} x{zoom}"
                );
            }
        }
    }
}

#[test]
fn uniform_sources_stay_uniform() {
    for mode in [InterpolationMode::Bicubic, InterpolationMode::Lanczos3] {
        let black = PixelBuffer::filled(20, 14, Pixel::BLACK).unwrap();
        let out = run(&black, 33.0, 1.7, mode);
        assert!(out.data().iter().all(|&p| p == Pixel::BLACK || p == Pixel::WHITE));
        assert!(out.data().contains(&Pixel::BLACK));

        let white = PixelBuffer::filled(20, 14, Pixel::WHITE).unwrap();
        let out = run(&white, 33.0, 1.7, mode);
        assert!(out.data().iter().all(|&p| p == Pixel::WHITE), "{mode}");
    }
}

#[test]
fn adversarial_inputs_do_not_wrap() {
    for mode in [InterpolationMode::Bicubic, InterpolationMode::Lanczos3] {
        let board = checkerboard(24, 24);
        let out = run(&board, 12.5, 2.3, mode);
        assert_eq!((out.width(), out.height()), (66, 66));

        let noise = random_image(31, 17, 4);
        run(&noise, -71.0, 0.6, mode);
    }
}

#[test]
fn cubic_overshoot_is_clamped() {
    let mut data = vec![Pixel::BLACK; 2];
    data.extend([Pixel::WHITE; 4]);
    let step = PixelBuffer::from_vec(data, 6, 1).unwrap();
    let view = MirroredView::new(step.view());
    // Unclamped values here would be about 271 and -16.
    assert_eq!(sample_bicubic(&view, 2.5, 0.0), Pixel::WHITE);
    assert_eq!(sample_bicubic(&view, 0.5, 0.0), Pixel::BLACK);

    let weights = WeightCache::lanczos3();
    for step_x in 0..50 {
        let x = step_x as f64 * 0.1;
        let p = sample_lanczos3(&view, &weights, x, 0.0);
        assert_eq!(p.red, p.green);
        assert_eq!(p.green, p.blue);
    }
    assert_eq!(sample_lanczos3(&view, &weights, 3.0, 0.0), Pixel::WHITE);
}
