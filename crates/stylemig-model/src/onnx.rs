use anyhow::Context;
use ndarray::Axis;
use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::Tensor as OrtTensor,
};

use crate::{Evaluator, InferenceError, ModelConfig, OptLevel, Result, Tensor};

impl From<OptLevel> for GraphOptimizationLevel {
    fn from(level: OptLevel) -> Self {
        match level {
            OptLevel::Disable => GraphOptimizationLevel::Disable,
            OptLevel::Level1 => GraphOptimizationLevel::Level1,
            OptLevel::Level2 => GraphOptimizationLevel::Level2,
            OptLevel::Level3 => GraphOptimizationLevel::Level3,
        }
    }
}

/// onnxruntime session wrapped as an [`Evaluator`].
///
/// Feeds the first declared input and returns the first output flattened.
pub struct OrtEvaluator {
    session: Session,
    input_name: String,
}

impl OrtEvaluator {
    /// Build a session from `config.model_path`.
    pub fn load(config: &ModelConfig) -> anyhow::Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(config.optimization_level.into())?
            .with_intra_threads(config.intra_threads.max(1))?
            .commit_from_file(&config.model_path)
            .with_context(|| format!("Failed to load ONNX model: {:?}", config.model_path))?;

        let input_name = session
            .inputs()
            .first()
            .map(|input| input.name().to_string())
            .with_context(|| format!("Model declares no inputs: {:?}", config.model_path))?;

        log::info!(
            "loaded model {:?} (input {input_name}, {} threads)",
            config.model_path,
            config.intra_threads
        );

        Ok(Self { session, input_name })
    }

    pub fn input_name(&self) -> &str {
        &self.input_name
    }
}

impl Evaluator for OrtEvaluator {
    fn evaluate(&mut self, input: Tensor) -> Result<Vec<f32>> {
        if input.shape()[0] != 3 {
            return Err(InferenceError::InvalidInput(input.shape().to_vec()));
        }

        // [3,H,W] -> [1,3,H,W]
        let batched = input.insert_axis(Axis(0));
        let value = OrtTensor::from_array(batched)?;

        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => &value])?;

        let output = outputs
            .values()
            .next()
            .ok_or(InferenceError::MissingOutput)?;
        let (shape, data) = output.try_extract_tensor::<f32>()?;
        log::debug!("model output shape {:?} ({} values)", shape, data.len());

        Ok(data.to_vec())
    }
}
