//! Full stylemig Pipeline Demo
//!
//! This example runs the complete pipeline on one picture:
//! 1. Decode the input image with stylemig-source
//! 2. Load the ONNX depth/style model with stylemig-model
//! 3. Resize + normalize + infer + min-max decode on a worker thread
//! 4. Write the grayscale result next to the input for viewing
//!
//! Usage: cargo run --bin depth_demo -- --model models/depth.onnx image.jpg

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use stylemig_model::{ModelConfig, OrtEvaluator};
use stylemig_pipeline::{Pipeline, PipelineConfig};
use stylemig_source::load_image;

/// Run a depth/style model over one image and render the output as grayscale.
#[derive(Parser, Debug)]
#[command(name = "depth_demo", version, about)]
struct CliArgs {
    /// Input image (PNG or JPEG).
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// ONNX model file.
    #[arg(long, default_value = "models/depth.onnx")]
    model: PathBuf,

    /// Where to write the rendered output. Defaults to `<input>_depth.png`.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pipeline settings as JSON (input size, mean/std).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model input width, overrides the config file.
    #[arg(long)]
    width: Option<u32>,

    /// Model input height, overrides the config file.
    #[arg(long)]
    height: Option<u32>,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn pipeline_config(args: &CliArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(w) = args.width {
        config.input_width = w;
    }
    if let Some(h) = args.height {
        config.input_height = h;
    }
    Ok(config)
}

fn output_path(args: &CliArgs) -> PathBuf {
    args.output.clone().unwrap_or_else(|| {
        let stem = args
            .input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        args.input.with_file_name(format!("{stem}_depth.png"))
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let source = load_image(&args.input)
        .with_context(|| format!("Failed to read input image {:?}", args.input))?;
    println!("📷 Loaded {:?} ({}x{})", args.input, source.width(), source.height());

    let model = OrtEvaluator::load(&ModelConfig::for_model(args.model.clone()))?;
    println!("✅ Model ready: {:?} (input \"{}\")", args.model, model.input_name());

    let config = pipeline_config(&args)?;
    println!(
        "🔧 Model input {}x{}, mean {:?}, std {:?}",
        config.input_width, config.input_height, config.normalization.mean, config.normalization.std
    );
    let pipeline = Pipeline::new(model, config)?;

    // worker owns the pipeline until the run finishes
    let pending = pipeline.spawn(source);
    let (_pipeline, outcome) = pending.wait().await?;
    let output = outcome.context("Pipeline run failed")?;

    let path = output_path(&args);
    output
        .image
        .to_rgba_image()
        .save(&path)
        .with_context(|| format!("Failed to write {:?}", path))?;

    println!("⏱  Inference time: {} ms", output.inference_ms());
    println!("💾 Wrote {:?}", path);
    Ok(())
}
