//! stylemig – pipeline layer
//!
//! Sequences the numeric stages around an opaque model:
//!
//! ```text
//! Image ─resize─▶ Image(W×H) ─encode─▶ Tensor(3,H,W) ─evaluate─▶ Vec<f32> ─decode─▶ Image(W×H, gray)
//! ```
//!
//! [`Pipeline::run`] does it on the calling thread; [`Pipeline::spawn`]
//! moves the whole pipeline onto tokio's blocking pool and hands it back
//! with the result, so the caller never blocks and can never start a
//! second run on the same instance while one is in flight.
//!
//! ```no_run
//! use stylemig_model::{ModelConfig, OrtEvaluator};
//! use stylemig_pipeline::{Pipeline, PipelineConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let model = OrtEvaluator::load(&ModelConfig::for_model("models/depth.onnx"))?;
//! let mut pipeline = Pipeline::new(model, PipelineConfig::default())?;
//! let source = stylemig_source::load_image("image.jpg")?;
//! let out = pipeline.run(&source)?;
//! println!("inference took {} ms", out.inference_ms());
//! # Ok(())
//! # }
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use stylemig_model::InferenceError;
use stylemig_preprocess::{Normalization, PreprocessError};
use thiserror::Error;

pub mod decode;
mod pipeline;
mod worker;

pub use decode::{decode, DecodeError, FLAT_GRAY};
pub use pipeline::{run, Pipeline, RunOutput, Stage};
pub use worker::PendingRun;

/// Default square model input resolution.
pub const DEFAULT_INPUT_SIZE: u32 = 512;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid pipeline config: {0}")]
    Config(String),
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),
    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("pipeline worker died: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl PipelineError {
    /// Stage the run was in when it failed, if it got that far.
    ///
    /// Bad normalization is caught while validating settings, before any
    /// stage, so it reports `None`.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Preprocess(PreprocessError::InvalidNormalization { .. }) => None,
            PipelineError::Preprocess(_) => Some(Stage::Resizing),
            PipelineError::Inference(_) => Some(Stage::Inferring),
            PipelineError::Decode(_) => Some(Stage::Decoding),
            PipelineError::Config(_) | PipelineError::Worker(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// What the model expects as input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input_width: u32,
    pub input_height: u32,
    pub normalization: Normalization,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_width: DEFAULT_INPUT_SIZE,
            input_height: DEFAULT_INPUT_SIZE,
            normalization: Normalization::TORCHVISION,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.input_width == 0 || self.input_height == 0 {
            return Err(PipelineError::Config(format!(
                "model input size {}x{} must be non-zero",
                self.input_width, self.input_height
            )));
        }
        self.normalization.validate()?;
        Ok(())
    }

    /// Read a JSON config; missing fields fall back to defaults.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pipeline config: {:?}", path))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse pipeline config: {:?}", path))?;
        config.validate()?;
        Ok(config)
    }
}
