//! Model-free demonstration of the stylemig pipeline
//!
//! A synthetic gray frame goes through resize → encode → stub model →
//! decode.  The stub echoes the first W*H tensor values back, so a flat
//! input gives a flat output and the degenerate-range path is exercised
//! without any ONNX file on disk.

use anyhow::Result;
use stylemig_model::{from_fn, Tensor};
use stylemig_pipeline::{Pipeline, PipelineConfig};
use stylemig_preprocess::Normalization;
use stylemig_source::Image;

/// Values the stub hands back for a `w`×`h` model input.
fn output_len(w: u32, h: u32) -> usize {
    w as usize * h as usize
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    println!("stylemig Flat Output Demo");
    println!("=========================");

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let (src_w, src_h, dst_w, dst_h) = if args.len() >= 5 {
        let sw = args[1].parse::<u32>().unwrap_or(640);
        let sh = args[2].parse::<u32>().unwrap_or(480);
        let dw = args[3].parse::<u32>().unwrap_or(4);
        let dh = args[4].parse::<u32>().unwrap_or(4);
        (sw, sh, dw, dh)
    } else {
        println!("Usage: {} <src_width> <src_height> <model_width> <model_height>", args[0]);
        println!("Using defaults: 4x4 source, 4x4 model input");
        (4, 4, 4, 4)
    };

    let source = Image::filled(src_w, src_h, [128, 128, 128, 255])?;
    println!("✓ Created gray {}x{} source image", src_w, src_h);

    let pixels = output_len(dst_w, dst_h);
    let echo = from_fn(move |t: Tensor| Ok(t.iter().take(pixels).copied().collect()));

    let config = PipelineConfig {
        input_width: dst_w,
        input_height: dst_h,
        normalization: Normalization::new([0.5; 3], [0.5; 3])?,
    };
    let mut pipeline = Pipeline::new(echo, config)?;

    let output = pipeline.run(&source)?;
    let first = output.image.pixel(0, 0).unwrap_or_default();
    let flat = output
        .image
        .pixels()
        .chunks_exact(4)
        .all(|p| p == first.as_slice());

    println!("✓ Decoded {}x{} output", output.image.width(), output.image.height());
    println!("  first pixel: {:?}", first);
    println!("  uniform:     {}", flat);
    println!("  stage:       {}", pipeline.stage());
    Ok(())
}
