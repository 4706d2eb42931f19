use stylemig_model::{from_fn, Tensor};
use stylemig_pipeline::{run, Pipeline, PipelineConfig, PipelineError, Stage, FLAT_GRAY};
use stylemig_preprocess::Normalization;
use stylemig_source::Image;
use tempfile::tempdir;

#[test]
fn gray_square_end_to_end() {
    let source = Image::filled(4, 4, [128, 128, 128, 255]).unwrap();
    let norm = Normalization::new([0.5, 0.5, 0.5], [0.5, 0.5, 0.5]).unwrap();

    let mut fed = Vec::new();
    let mut identity = from_fn(|t: Tensor| {
        fed = t.iter().copied().collect();
        Ok(t.iter().take(16).copied().collect())
    });

    let out = run(&source, &mut identity, 4, 4, &norm).unwrap();
    drop(identity);

    let want = (128.0 / 255.0 - 0.5) / 0.5;
    assert_eq!(fed.len(), 3 * 4 * 4);
    assert!(fed.iter().all(|v| (v - want).abs() < 1e-6));

    assert_eq!(out.image.dimensions(), (4, 4));
    for px in out.image.pixels().chunks_exact(4) {
        assert_eq!(px, [FLAT_GRAY, FLAT_GRAY, FLAT_GRAY, 255]);
    }
}

#[test]
fn depth_ramp_renders_gradient() {
    // fake depth: distance grows with the row index
    let depth = from_fn(|t: Tensor| {
        let (h, w) = (t.shape()[1], t.shape()[2]);
        Ok((0..h * w).map(|i| (i / w) as f32 * 0.1 + 3.0).collect())
    });
    let config = PipelineConfig {
        input_width: 8,
        input_height: 8,
        ..Default::default()
    };
    let mut pipeline = Pipeline::new(depth, config).unwrap();
    let source = Image::from_fn(40, 30, |x, y| [x as u8, y as u8, 0, 255]).unwrap();

    let out = pipeline.run(&source).unwrap();
    assert_eq!(out.image.pixel(0, 0), Some([0, 0, 0, 255]));
    assert_eq!(out.image.pixel(7, 7), Some([255, 255, 255, 255]));
    let column: Vec<u8> = (0..8).map(|y| out.image.pixel(3, y).unwrap()[0]).collect();
    assert!(column.windows(2).all(|w| w[0] < w[1]), "{column:?}");
}

#[test]
fn failed_run_returns_no_image() {
    let wrong_size = from_fn(|_t: Tensor| Ok(vec![1.0; 7]));
    let mut pipeline = Pipeline::new(wrong_size, PipelineConfig::default()).unwrap();
    let source = Image::filled(16, 16, [10, 20, 30, 255]).unwrap();

    match pipeline.run(&source) {
        Err(err @ PipelineError::Decode(_)) => assert_eq!(err.stage(), Some(Stage::Decoding)),
        other => panic!("expected decode failure, got {other:?}"),
    }
    assert_eq!(pipeline.stage(), Stage::Failed);
}

#[test]
fn config_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pipeline.json");
    std::fs::write(
        &path,
        r#"{ "input_width": 256, "input_height": 128,
             "normalization": { "mean": [0.5, 0.5, 0.5], "std": [0.5, 0.5, 0.5] } }"#,
    )
    .unwrap();

    let cfg = PipelineConfig::from_json_file(&path).unwrap();
    assert_eq!((cfg.input_width, cfg.input_height), (256, 128));
    assert_eq!(cfg.normalization.mean, [0.5; 3]);
}

#[test]
fn config_file_with_zero_size_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pipeline.json");
    std::fs::write(&path, r#"{ "input_width": 0 }"#).unwrap();

    assert!(PipelineConfig::from_json_file(&path).is_err());
}
