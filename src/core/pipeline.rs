// src/core/pipeline.rs
//
// The ordered stage chain of one feature.
//
// Building resolves every stage through the registry and propagates the
// frame length from stage to stage, so any disagreement between a producer
// and a consumer with a declared input length fails before a single sample
// is processed. Running threads each stage's output into the next one; the
// pipeline owns every intermediate buffer of a run.

use std::borrow::Cow;

use log::{debug, trace};

use super::registry::StageRegistry;
use super::result::FeatureValues;
use super::stage::{Stage, StageContext, StageParams};
use crate::config::FeatureSpec;
use crate::error::{Error, Result, StageError};

const INPUT: &str = "<input>";

/// Built chain of stages for one named feature
pub struct FeaturePipeline {
    name: String,
    stages: Vec<Box<dyn Stage>>,
    output_len: Option<usize>,
}

impl FeaturePipeline {
    /// Resolve, configure and shape-check every stage of `spec`.
    ///
    /// `sample_rate` is the rate of the signal the pipeline will see.
    pub fn build(spec: &FeatureSpec, registry: &StageRegistry, sample_rate: u32) -> Result<Self> {
        let feature = spec.name();
        if spec.stages().is_empty() {
            return Err(Error::EmptyFeature(feature.to_string()));
        }

        let mut stages: Vec<Box<dyn Stage>> = Vec::with_capacity(spec.stages().len());
        let mut current: Option<usize> = None;

        for (index, stage_spec) in spec.stages().iter().enumerate() {
            let producer = stages.last().map_or(INPUT, |s| s.name());
            let consumer = stage_spec.name();
            let ctx = StageContext {
                sample_rate,
                input_len: current,
            };

            let params = StageParams::new(stage_spec.parameters().clone());
            let stage = registry
                .build(consumer, params, &ctx)
                .map_err(|e| with_context(e, feature, index, consumer, producer))?;

            if let Some(required) = stage.input_len() {
                let reason = match current {
                    Some(n) if n == required => None,
                    Some(n) => Some(format!(
                        "{} expects frames of {} values, {} produces {}",
                        consumer, required, producer, n
                    )),
                    None => Some(format!(
                        "{} expects frames of {} values but receives the unframed signal",
                        consumer, required
                    )),
                };
                if let Some(reason) = reason {
                    return Err(Error::ShapeMismatch {
                        feature: feature.to_string(),
                        producer: producer.to_string(),
                        consumer: consumer.to_string(),
                        index,
                        reason,
                    });
                }
            }

            current = stage.declared_output_len(current);
            if current == Some(0) {
                return Err(Error::ShapeMismatch {
                    feature: feature.to_string(),
                    producer: producer.to_string(),
                    consumer: consumer.to_string(),
                    index,
                    reason: format!("{} would produce empty frames", consumer),
                });
            }
            stages.push(stage);
        }

        debug!(
            "Built feature {} [{}] -> {}",
            feature,
            stages.iter().map(|s| s.name()).collect::<Vec<_>>().join(", "),
            current.map_or_else(|| "unframed".to_string(), |n| format!("{} values per frame", n))
        );

        Ok(Self {
            name: feature.to_string(),
            stages,
            output_len: current,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stage names in execution order
    pub fn stage_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.stages.iter().map(|s| s.name())
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Frame length of the final stage's output, when it does not depend on
    /// the input buffer length
    pub fn output_len(&self) -> Option<usize> {
        self.output_len
    }

    /// Run every stage in order over `input`, treated as one frame.
    ///
    /// `input` is only read; intermediate buffers are private to this call.
    pub fn run(&self, input: &[f32]) -> Result<FeatureValues> {
        let mut frame_len = input.len();
        let mut current: Cow<'_, [f32]> = Cow::Borrowed(input);

        for (index, stage) in self.stages.iter().enumerate() {
            if frame_len == 0 {
                return Err(self.runtime_error(index, stage.as_ref(), "received an empty frame"));
            }
            if let Some(required) = stage.input_len() {
                if required != frame_len {
                    return Err(self.runtime_error(
                        index,
                        stage.as_ref(),
                        format!("expects frames of {} values, got {}", required, frame_len),
                    ));
                }
            }

            let out_len = stage.output_len(frame_len);
            if out_len == 0 {
                return Err(self.runtime_error(
                    index,
                    stage.as_ref(),
                    format!("produces empty frames from {} values", frame_len),
                ));
            }
            let chunk = stage.frames_out(frame_len) * out_len;
            let frames = current.len() / frame_len;
            let mut next = vec![0.0f32; frames * chunk];

            for (src, dst) in current.chunks_exact(frame_len).zip(next.chunks_exact_mut(chunk)) {
                stage
                    .apply(src, dst)
                    .map_err(|e| self.runtime_error(index, stage.as_ref(), e.to_string()))?;
            }

            trace!(
                "{}: {} {} x {} -> {} x {}",
                self.name,
                stage.name(),
                frames,
                frame_len,
                next.len() / out_len,
                out_len
            );
            current = Cow::Owned(next);
            frame_len = out_len;
        }

        Ok(FeatureValues::new(current.into_owned(), frame_len))
    }

    fn runtime_error(&self, index: usize, stage: &dyn Stage, reason: impl Into<String>) -> Error {
        Error::StageRuntime {
            feature: self.name.clone(),
            stage: stage.name().to_string(),
            index,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Debug for FeaturePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeaturePipeline")
            .field("name", &self.name)
            .field("stages", &self.stage_names().collect::<Vec<_>>())
            .field("output_len", &self.output_len)
            .finish()
    }
}

/// Attach feature and position to a stage-local error
fn with_context(err: StageError, feature: &str, index: usize, stage: &str, producer: &str) -> Error {
    match err {
        StageError::Unknown(name) => Error::UnknownStage {
            feature: feature.to_string(),
            stage: name,
        },
        StageError::Parameter { key, reason } => Error::Parameter {
            feature: feature.to_string(),
            stage: stage.to_string(),
            index,
            key,
            reason,
        },
        StageError::Shape(reason) => Error::ShapeMismatch {
            feature: feature.to_string(),
            producer: producer.to_string(),
            consumer: stage.to_string(),
            index,
            reason,
        },
        StageError::Runtime(reason) => Error::StageRuntime {
            feature: feature.to_string(),
            stage: stage.to_string(),
            index,
            reason,
        },
    }
}
