use fractales_core::{
    compute_divergence, compute_matrix, text, zoom, Complex, CoreError, FractalConfig,
    FractalOptions, Quadrant,
};

fn quick_mandelbrot() -> FractalConfig {
    FractalConfig::mandelbrot(FractalOptions {
        discrete_step: Some(0.03),
        max_iteration: Some(256),
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn headless_mandelbrot_render() {
    let cfg = quick_mandelbrot();
    let matrix = compute_matrix(&cfg);

    assert_eq!(matrix.width(), cfg.image_width());
    assert_eq!(matrix.height(), cfg.image_height());

    let sentinel = cfg.max_iteration() - 1;
    let mut escaped = 0;
    let mut interior = 0;
    for j in 0..matrix.sampled_height() {
        for i in 0..matrix.sampled_width() {
            if matrix.get(i, j) == sentinel {
                interior += 1;
            } else {
                escaped += 1;
            }
        }
    }
    assert!(escaped > 0, "should have some escaped points");
    assert!(interior > 0, "should have some interior points");
}

#[test]
fn headless_render_is_deterministic() {
    let cfg = quick_mandelbrot();
    assert_eq!(
        compute_matrix(&cfg),
        compute_matrix(&cfg),
        "two identical renders must produce identical results"
    );
}

#[test]
fn headless_julia_render() {
    let cfg = FractalConfig::julia(FractalOptions {
        complex_constant: Some(Complex::new(-0.7, 0.27015)),
        discrete_step: Some(0.02),
        max_iteration: Some(200),
        ..Default::default()
    })
    .unwrap();
    let matrix = compute_matrix(&cfg);
    assert_eq!((matrix.width(), matrix.height()), (101, 101));

    let cells: Vec<u32> = (0..matrix.sampled_height())
        .flat_map(|j| (0..matrix.sampled_width()).map(move |i| (i, j)))
        .map(|(i, j)| matrix.get(i, j))
        .collect();
    assert!(cells.iter().any(|&d| d == 199), "some points stay bounded");
    assert!(cells.iter().any(|&d| d < 199), "some points escape");
}

#[test]
fn saved_record_rebuilds_identical_render() {
    let cfg = zoom(&quick_mandelbrot(), Some(Quadrant::TopRight)).unwrap();
    let restored = text::decode(&text::encode(&cfg)).unwrap();
    assert_eq!(restored, cfg);
    assert_eq!(compute_matrix(&restored), compute_matrix(&cfg));
}

#[test]
fn zoomed_view_samples_the_narrowed_rectangle() {
    let cfg = quick_mandelbrot();
    let zoomed = zoom(&cfg, Some(Quadrant::BottomLeft)).unwrap();
    assert_eq!(zoomed.y_max(), 0.5);
    assert_eq!(zoomed.discrete_step(), 0.015);
    assert_eq!(zoomed.pixel_to_complex(0, 0), Complex::new(-2.0, 0.5));
    assert_eq!(
        compute_matrix(&zoomed).get(0, 0),
        compute_divergence(&zoomed, Complex::new(-2.0, 0.5))
    );
}

#[test]
fn errors_surface_as_typed_failures() {
    assert!(matches!(
        FractalConfig::julia(FractalOptions::default()),
        Err(CoreError::MissingRequiredParameter(_))
    ));
    assert!(matches!(
        zoom(&quick_mandelbrot(), None),
        Err(CoreError::MissingZoomSelection)
    ));
    assert!(matches!(
        text::decode("sierpinski\n"),
        Err(CoreError::CorruptFractalFile { .. })
    ));
}
