// Off-thread execution: the pipeline travels to a blocking worker and
// comes back with the result, so only one run per instance can exist.
use stylemig_model::Evaluator;
use stylemig_source::Image;
use tokio::task::JoinHandle;

use crate::{Pipeline, PipelineError, Result, RunOutput};

/// A run executing on tokio's blocking pool.
pub struct PendingRun<E> {
    handle: JoinHandle<(Pipeline<E>, Result<RunOutput>)>,
}

impl<E> Pipeline<E>
where
    E: Evaluator + Send + 'static,
{
    /// Start a run on a worker thread.  Must be called inside a tokio runtime.
    pub fn spawn(mut self, source: Image) -> PendingRun<E> {
        let handle = tokio::task::spawn_blocking(move || {
            let outcome = self.run(&source);
            (self, outcome)
        });
        PendingRun { handle }
    }
}

impl<E> PendingRun<E> {
    /// Wait for completion.  The pipeline is handed back alongside the
    /// outcome, unless the worker panicked and took it down.
    pub async fn wait(self) -> std::result::Result<(Pipeline<E>, Result<RunOutput>), PipelineError> {
        Ok(self.handle.await?)
    }
}

#[cfg(test)]
mod tests {
    use crate::{PipelineConfig, PipelineError, Stage};
    use stylemig_model::{from_fn, InferenceError, Tensor};
    use stylemig_preprocess::Normalization;
    use stylemig_source::Image;

    use super::*;

    fn cfg() -> PipelineConfig {
        PipelineConfig {
            input_width: 4,
            input_height: 4,
            normalization: Normalization::new([0.5; 3], [0.5; 3]).unwrap(),
        }
    }

    #[tokio::test]
    async fn spawned_run_returns_pipeline_and_image() {
        let caller = std::thread::current().id();
        let eval = from_fn(move |t: Tensor| {
            assert_ne!(std::thread::current().id(), caller);
            Ok(t.iter().take(16).copied().collect())
        });
        let pipeline = Pipeline::new(eval, cfg()).unwrap();
        let source = Image::filled(8, 8, [128, 128, 128, 255]).unwrap();

        let (pipeline, outcome) = pipeline.spawn(source).wait().await.unwrap();
        let out = outcome.unwrap();
        assert_eq!(out.image.dimensions(), (4, 4));
        assert_eq!(pipeline.stage(), Stage::Done);
    }

    #[tokio::test]
    async fn spawned_failure_comes_back_as_error() {
        let eval = from_fn(|_t: Tensor| Err(InferenceError::Failed("no model".into())));
        let pipeline = Pipeline::new(eval, cfg()).unwrap();
        let source = Image::filled(4, 4, [1, 1, 1, 255]).unwrap();

        let (pipeline, outcome) = pipeline.spawn(source).wait().await.unwrap();
        assert!(matches!(outcome, Err(PipelineError::Inference(_))));
        assert_eq!(pipeline.stage(), Stage::Failed);
    }

    #[tokio::test]
    async fn panicking_evaluator_surfaces_as_worker_error() {
        let eval = from_fn(|_t: Tensor| -> stylemig_model::Result<Vec<f32>> {
            panic!("evaluator exploded")
        });
        let pipeline = Pipeline::new(eval, cfg()).unwrap();
        let source = Image::filled(4, 4, [1, 1, 1, 255]).unwrap();

        let err = pipeline.spawn(source).wait().await.err().expect("worker panicked");
        assert!(matches!(err, PipelineError::Worker(_)));
    }
}
