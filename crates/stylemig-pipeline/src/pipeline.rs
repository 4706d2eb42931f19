use std::fmt;
use std::time::{Duration, Instant};

use stylemig_model::Evaluator;
use stylemig_preprocess::{encode, resize, Normalization};
use stylemig_source::Image;

use crate::decode::{decode, value_range};
use crate::{PipelineConfig, Result};

/// Where a run currently is.  Linear; `Failed` is the only side exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Resizing,
    Encoding,
    Inferring,
    Decoding,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Resizing => "resizing",
            Stage::Encoding => "encoding",
            Stage::Inferring => "inferring",
            Stage::Decoding => "decoding",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of a successful run.
#[derive(Debug)]
pub struct RunOutput {
    /// Grayscale rendering of the model output, at model input size.
    pub image: Image,
    /// Wall time of the evaluator call alone.
    pub inference_time: Duration,
}

impl RunOutput {
    pub fn inference_ms(&self) -> u128 {
        self.inference_time.as_millis()
    }
}

/// Run one pass: resize → encode → evaluate → decode.
///
/// `norm` is validated before any stage starts, so a zero or non-finite
/// std never reaches the evaluator.
///
/// The decoded image has the model input size; an evaluator whose
/// output length differs from `input_w * input_h` fails the run.
pub fn run<E>(
    source: &Image,
    evaluator: &mut E,
    input_w: u32,
    input_h: u32,
    norm: &Normalization,
) -> Result<RunOutput>
where
    E: Evaluator + ?Sized,
{
    let mut stage = Stage::Idle;
    let outcome = run_stages(source, evaluator, input_w, input_h, norm, &mut stage);
    if let Err(err) = &outcome {
        log::error!("pipeline failed while {stage}: {err}");
    }
    outcome
}

fn run_stages<E>(
    source: &Image,
    evaluator: &mut E,
    input_w: u32,
    input_h: u32,
    norm: &Normalization,
    stage: &mut Stage,
) -> Result<RunOutput>
where
    E: Evaluator + ?Sized,
{
    // a hand-built Normalization may have skipped `Normalization::new`
    norm.validate()?;

    advance(stage, Stage::Resizing);
    let resized = resize(source, input_w, input_h)?;

    advance(stage, Stage::Encoding);
    let tensor = encode(&resized, norm);
    drop(resized);

    advance(stage, Stage::Inferring);
    let start = Instant::now();
    let output = evaluator.evaluate(tensor)?;
    let inference_time = start.elapsed();
    log::info!("inference time (ms): {}", inference_time.as_millis());

    advance(stage, Stage::Decoding);
    if let Some((min, max)) = value_range(&output) {
        log::debug!("output range [{min}, {max}] over {} values", output.len());
    }
    let image = decode(&output, input_w, input_h)?;

    advance(stage, Stage::Done);
    Ok(RunOutput {
        image,
        inference_time,
    })
}

fn advance(stage: &mut Stage, next: Stage) {
    log::debug!("pipeline {stage} -> {next}");
    *stage = next;
}

/// Owns an evaluator and the settings it expects.
///
/// One run at a time: `run` borrows mutably, `spawn` moves the pipeline
/// onto a worker until the run completes.
pub struct Pipeline<E> {
    evaluator: E,
    config: PipelineConfig,
    last: Stage,
}

impl<E: Evaluator> Pipeline<E> {
    pub fn new(evaluator: E, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            evaluator,
            config,
            last: Stage::Idle,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// State the most recent run ended in, `Idle` before the first.
    pub fn stage(&self) -> Stage {
        self.last
    }

    /// Blocking run on the current thread.
    pub fn run(&mut self, source: &Image) -> Result<RunOutput> {
        let cfg = &self.config;
        let outcome = run(
            source,
            &mut self.evaluator,
            cfg.input_width,
            cfg.input_height,
            &cfg.normalization,
        );
        self.last = match &outcome {
            Ok(_) => Stage::Done,
            Err(_) => Stage::Failed,
        };
        outcome
    }
}
