use rand::Rng;
use stylemig_preprocess::{resize, Normalization, Preprocessor};
use stylemig_source::Image;

#[test]
fn cpu_smoke() {
    // Fake white 640×480 frame
    let img = Image::filled(640, 480, [255, 255, 255, 255]).unwrap();

    let pp = Preprocessor::new(512, 512, Normalization::default());
    let out = pp.run(&img).unwrap();
    assert_eq!(out.shape(), &[3, 512, 512]);

    // white maps to (1 - mean) / std on every channel
    let norm = Normalization::TORCHVISION;
    for c in 0..3 {
        let want = (1.0 - norm.mean[c]) / norm.std[c];
        let got = out[[c, 100, 100]];
        assert!((got - want).abs() < 0.02, "channel {c}: {got} vs {want}");
    }
}

#[test]
fn resize_hits_requested_size() {
    let mut rng = rand::thread_rng();
    for _ in 0..20 {
        let (sw, sh) = (rng.gen_range(1..64u32), rng.gen_range(1..64u32));
        let (dw, dh) = (rng.gen_range(1..96u32), rng.gen_range(1..96u32));
        let src = Image::from_fn(sw, sh, |_, _| {
            [rng.gen(), rng.gen(), rng.gen(), 255]
        })
        .unwrap();

        let out = resize(&src, dw, dh).unwrap();
        assert_eq!(out.dimensions(), (dw, dh), "{sw}x{sh} -> {dw}x{dh}");
        assert_eq!(out.pixels().len(), (dw * dh * 4) as usize);
    }
}

#[test]
fn normalization_loads_from_json() {
    let json = r#"{ "mean": [0.5, 0.5, 0.5], "std": [0.25, 0.5, 1.0] }"#;
    let norm: Normalization = serde_json::from_str(json).unwrap();
    norm.validate().unwrap();
    assert_eq!(norm.std, [0.25, 0.5, 1.0]);
}
