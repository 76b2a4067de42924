//! Error types for building and running feature extractors

use thiserror::Error;

/// Crate-level error. Build-time variants abort extractor construction,
/// run-time variants abort the current `calculate` call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Stage name not present in the registry
    #[error("feature \"{feature}\": unknown stage \"{stage}\"")]
    UnknownStage { feature: String, stage: String },

    /// A stage name was registered twice
    #[error("stage \"{0}\" is already registered")]
    DuplicateStage(String),

    /// Unparseable, out-of-domain or unknown stage parameter
    #[error("feature \"{feature}\": stage #{index} {stage}: parameter \"{key}\": {reason}")]
    Parameter {
        feature: String,
        stage: String,
        index: usize,
        key: String,
        reason: String,
    },

    /// Two consecutive stages disagree on frame length
    #[error("feature \"{feature}\": {producer} -> {consumer} (stage #{index}): {reason}")]
    ShapeMismatch {
        feature: String,
        producer: String,
        consumer: String,
        index: usize,
        reason: String,
    },

    /// Two features share a name
    #[error("duplicate feature name \"{0}\"")]
    DuplicateFeatureName(String),

    /// A feature with no stages
    #[error("feature \"{0}\" has no stages")]
    EmptyFeature(String),

    #[error("invalid {which} sample rate {rate}")]
    InvalidSampleRate { which: &'static str, rate: u32 },

    /// `calculate` was given zero samples
    #[error("input buffer is empty")]
    EmptyBuffer,

    /// A stage hit a numerically invalid state while running
    #[error("feature \"{feature}\": stage #{index} {stage} failed: {reason}")]
    StageRuntime {
        feature: String,
        stage: String,
        index: usize,
        reason: String,
    },

    /// Rate conversion failure
    #[error("resampling {source_rate} Hz -> {target_rate} Hz failed: {reason}")]
    Resample {
        source_rate: u32,
        target_rate: u32,
        reason: String,
    },

    /// Malformed feature description (text or JSON)
    #[error("feature description, line {line}: {reason}")]
    Description { line: usize, reason: String },
}

/// Convenience Result type using the crate Error
pub type Result<T> = std::result::Result<T, Error>;

/// Stage-local failure without feature context.
///
/// Stages return this from their factories and from `apply`; the pipeline
/// attaches the feature name and stage position before it reaches callers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StageError {
    #[error("unknown stage \"{0}\"")]
    Unknown(String),

    #[error("parameter \"{key}\": {reason}")]
    Parameter { key: String, reason: String },

    /// The incoming frame length is incompatible with this stage
    #[error("{0}")]
    Shape(String),

    #[error("{0}")]
    Runtime(String),
}

impl StageError {
    pub fn parameter(key: impl Into<String>, reason: impl Into<String>) -> Self {
        StageError::Parameter {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn shape(reason: impl Into<String>) -> Self {
        StageError::Shape(reason.into())
    }

    pub fn runtime(reason: impl Into<String>) -> Self {
        StageError::Runtime(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = Error::Parameter {
            feature: "MFCC".to_string(),
            stage: "Window".to_string(),
            index: 0,
            key: "length".to_string(),
            reason: "expected a positive integer, got \"-5\"".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("MFCC"));
        assert!(msg.contains("Window"));
        assert!(msg.contains("length"));
    }
}
