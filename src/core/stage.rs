// src/core/stage.rs
//
// The stage contract: typed configuration parsed from string parameters,
// per-frame shape declaration, and a pure frame transform.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use crate::error::StageError;

/// What a stage factory knows about its position in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageContext {
    /// Sample rate of the signal entering the pipeline (the target rate)
    pub sample_rate: u32,
    /// Frame length produced by the previous stage; `None` while the signal
    /// is still the unframed input buffer
    pub input_len: Option<usize>,
}

impl StageContext {
    /// The incoming frame length, or a shape error for stages that cannot
    /// run on an unframed signal
    pub fn fixed_input_len(&self, stage: &str) -> Result<usize, StageError> {
        self.input_len.ok_or_else(|| {
            StageError::shape(format!(
                "{} needs a fixed frame length; put a Window before it",
                stage
            ))
        })
    }
}

/// A single processing unit in a feature pipeline.
///
/// Implementations hold their parsed configuration and any tables derived
/// from it; `apply` must not mutate them, so a built stage can be shared by
/// concurrent `calculate` calls.
pub trait Stage: Send + Sync {
    /// Registry name
    fn name(&self) -> &'static str;

    /// Frame length this stage was declared for, if it requires one
    fn input_len(&self) -> Option<usize> {
        None
    }

    /// Length of each output frame for an input frame of `input_len` values
    fn output_len(&self, input_len: usize) -> usize;

    /// Output frame length when the input length is not known yet.
    /// Framing stages override this.
    fn declared_output_len(&self, input_len: Option<usize>) -> Option<usize> {
        input_len.map(|n| self.output_len(n))
    }

    /// Number of output frames one input frame expands to
    fn frames_out(&self, _input_len: usize) -> usize {
        1
    }

    /// Transform one input frame. `output` holds exactly
    /// `frames_out(input.len()) * output_len(input.len())` values.
    fn apply(&self, input: &[f32], output: &mut [f32]) -> Result<(), StageError>;
}

/// String parameters of a stage, consumed key by key while the stage
/// parses its typed configuration.
///
/// Integers are decimal text, booleans `true`/`false`. Keys left over after
/// the factory returns are reported as unknown.
#[derive(Debug, Clone, Default)]
pub struct StageParams {
    remaining: BTreeMap<String, String>,
}

impl StageParams {
    pub fn new(params: BTreeMap<String, String>) -> Self {
        Self { remaining: params }
    }

    /// Remove and return the raw value of `key`
    pub fn take_raw(&mut self, key: &str) -> Option<String> {
        self.remaining.remove(key)
    }

    /// Parse an optional value
    pub fn take<T>(&mut self, key: &str) -> Result<Option<T>, StageError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.remaining.remove(key) {
            None => Ok(None),
            Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
                StageError::parameter(key, format!("cannot parse \"{}\": {}", raw, e))
            }),
        }
    }

    /// Parse a value falling back to `default`
    pub fn take_or<T>(&mut self, key: &str, default: T) -> Result<T, StageError>
    where
        T: FromStr,
        T::Err: Display,
    {
        Ok(self.take(key)?.unwrap_or(default))
    }

    /// A mandatory parameter
    pub fn require<T>(&mut self, key: &str) -> Result<T, StageError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.take(key)?
            .ok_or_else(|| StageError::parameter(key, "missing required value"))
    }

    /// Optional positive integer
    pub fn take_positive(&mut self, key: &str) -> Result<Option<usize>, StageError> {
        match self.remaining.remove(key) {
            None => Ok(None),
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(v) if v > 0 => Ok(Some(v)),
                _ => Err(StageError::parameter(
                    key,
                    format!("expected a positive integer, got \"{}\"", raw),
                )),
            },
        }
    }

    /// Boolean in its textual form
    pub fn take_bool(&mut self, key: &str, default: bool) -> Result<bool, StageError> {
        match self.remaining.remove(key) {
            None => Ok(default),
            Some(raw) => match raw.trim() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(StageError::parameter(
                    key,
                    format!("expected \"true\" or \"false\", got \"{}\"", raw),
                )),
            },
        }
    }

    /// Finite float
    pub fn take_f32(&mut self, key: &str, default: f32) -> Result<f32, StageError> {
        let value: f32 = self.take_or(key, default)?;
        if !value.is_finite() {
            return Err(StageError::parameter(key, "value must be finite"));
        }
        Ok(value)
    }

    /// Fails on any key the stage did not consume
    pub fn finish(self) -> Result<(), StageError> {
        match self.remaining.into_keys().next() {
            None => Ok(()),
            Some(key) => Err(StageError::parameter(key, "unknown parameter")),
        }
    }
}

impl From<BTreeMap<String, String>> for StageParams {
    fn from(params: BTreeMap<String, String>) -> Self {
        Self::new(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> StageParams {
        StageParams::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_typed_parsing() {
        let mut p = params(&[("length", "512"), ("squared", "true"), ("floor", "0.5")]);
        assert_eq!(p.take_positive("length").unwrap(), Some(512));
        assert!(p.take_bool("squared", false).unwrap());
        assert_eq!(p.take_f32("floor", 1.0).unwrap(), 0.5);
        assert_eq!(p.take_positive("step").unwrap(), None);
        assert!(p.finish().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut p = params(&[("length", "-5")]);
        match p.take_positive("length") {
            Err(StageError::Parameter { key, .. }) => assert_eq!(key, "length"),
            other => panic!("unexpected {:?}", other),
        }

        let mut p = params(&[("squared", "yes")]);
        assert!(p.take_bool("squared", false).is_err());

        let mut p = params(&[("length", "0")]);
        assert!(p.take_positive("length").is_err());
    }

    #[test]
    fn test_leftover_key_is_unknown() {
        let mut p = params(&[("length", "16"), ("lenght", "16")]);
        p.take_positive("length").unwrap();
        match p.finish() {
            Err(StageError::Parameter { key, reason }) => {
                assert_eq!(key, "lenght");
                assert_eq!(reason, "unknown parameter");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unframed_context() {
        let ctx = StageContext { sample_rate: 16000, input_len: None };
        assert!(matches!(ctx.fixed_input_len("DCT"), Err(StageError::Shape(_))));
        let ctx = StageContext { sample_rate: 16000, input_len: Some(32) };
        assert_eq!(ctx.fixed_input_len("DCT").unwrap(), 32);
    }
}
