// stylemig-model/src/lib.rs
// ============================================================
// stylemig-model  –  inference boundary
// The pipeline never talks to a runtime directly; it holds an
// `Evaluator` and asks it for one forward pass.
// ------------------------------------------------------------
// Pipeline: Tensor (3,H,W) → Evaluator → Vec<f32>
// ------------------------------------------------------------
// Public API
//   * Evaluator::evaluate(tensor)  – one blocking forward pass
//   * OrtEvaluator::load(config)   – onnxruntime backed evaluator
//   * ModelConfig                  – serde config for the above
// ============================================================

//! stylemig – model layer
//!
//! This crate provides a backend-agnostic [`Evaluator`] trait plus a
//! concrete [`OrtEvaluator`] that runs an ONNX depth/style network.  The
//! output is returned flat; interpreting its length is the caller's job.
//!
//! [`from_fn`] turns a closure into an evaluator, which is how tests and
//! demos stub the model out.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use anyhow::Context;
pub use stylemig_preprocess::Tensor;

mod onnx;

pub use onnx::OrtEvaluator;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("onnxruntime error: {0}")]
    Runtime(#[from] ort::Error),
    #[error("invalid input shape: expected [3, H, W], got {0:?}")]
    InvalidInput(Vec<usize>),
    #[error("model produced no output")]
    MissingOutput,
    #[error("evaluator failed: {0}")]
    Failed(String),
}

pub type Result<T> = std::result::Result<T, InferenceError>;

/// One forward evaluation: tensor in, flat float buffer out.
///
/// Calls are synchronous and never retried by the pipeline.
pub trait Evaluator {
    fn evaluate(&mut self, input: Tensor) -> Result<Vec<f32>>;
}

/// Evaluator backed by a closure, see [`from_fn`].
pub struct FnEvaluator<F>(F);

/// Wrap `f` so it can stand in for a model.
pub fn from_fn<F>(f: F) -> FnEvaluator<F>
where
    F: FnMut(Tensor) -> Result<Vec<f32>>,
{
    FnEvaluator(f)
}

impl<F> Evaluator for FnEvaluator<F>
where
    F: FnMut(Tensor) -> Result<Vec<f32>>,
{
    fn evaluate(&mut self, input: Tensor) -> Result<Vec<f32>> {
        (self.0)(input)
    }
}

impl<E: Evaluator + ?Sized> Evaluator for Box<E> {
    fn evaluate(&mut self, input: Tensor) -> Result<Vec<f32>> {
        (**self).evaluate(input)
    }
}

/// Graph optimization level handed to onnxruntime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptLevel {
    Disable,
    Level1,
    Level2,
    Level3,
}

/// Configuration for loading a model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the ONNX model file
    pub model_path: PathBuf,
    /// Graph optimization applied when the session is built
    pub optimization_level: OptLevel,
    /// Threads used inside a single operator
    pub intra_threads: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_path: get_base_models_dir().join("depth.onnx"),
            optimization_level: OptLevel::Level3,
            intra_threads: num_cpus::get(),
        }
    }
}

impl ModelConfig {
    /// Config for `model_path` with every other field defaulted.
    pub fn for_model<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: model_path.into(),
            ..Default::default()
        }
    }

    /// Read a JSON config; missing fields fall back to defaults.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model config: {:?}", path))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse model config: {:?}", path))
    }
}

/// Get the base models directory path
pub fn get_base_models_dir() -> PathBuf {
    PathBuf::from("./models")
}
