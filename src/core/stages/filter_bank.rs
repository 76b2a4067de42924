// src/core/stages/filter_bank.rs
//
// Bins a one-sided power spectrum into triangular bands.

use crate::core::dsp::{FilterBankDesign, FrequencyScale, TriangularFilterBank};
use crate::core::stage::{Stage, StageContext, StageParams};
use crate::error::StageError;

const DEFAULT_NUMBER: usize = 32;
const DEFAULT_FREQUENCY_MIN: f64 = 130.0;
const DEFAULT_FREQUENCY_MAX: f64 = 6854.0;

/// Triangular filter bank. The incoming frame is taken as a spectrum
/// spanning 0 Hz to the Nyquist frequency of the pipeline's sample rate.
pub struct FilterBank {
    bank: TriangularFilterBank,
}

impl FilterBank {
    pub const NAME: &'static str = "FilterBank";

    pub fn configure(
        params: &mut StageParams,
        ctx: &StageContext,
    ) -> Result<Box<dyn Stage>, StageError> {
        let scale: FrequencyScale = params.take_or("type", FrequencyScale::Mel)?;
        let number = params.take_positive("number")?.unwrap_or(DEFAULT_NUMBER);
        let frequency_min: f64 = params.take_or("frequency_min", DEFAULT_FREQUENCY_MIN)?;
        let frequency_max: f64 = params.take_or("frequency_max", DEFAULT_FREQUENCY_MAX)?;
        let squared = params.take_bool("squared", false)?;
        let bins = ctx.fixed_input_len(Self::NAME)?;

        let nyquist = ctx.sample_rate as f64 / 2.0;
        if !(0.0..nyquist).contains(&frequency_min) {
            return Err(StageError::parameter(
                "frequency_min",
                format!("{} Hz is outside 0..{} Hz", frequency_min, nyquist),
            ));
        }
        if !(frequency_max > frequency_min && frequency_max <= nyquist) {
            return Err(StageError::parameter(
                "frequency_max",
                format!(
                    "{} Hz must be above frequency_min ({} Hz) and at most {} Hz",
                    frequency_max, frequency_min, nyquist
                ),
            ));
        }

        let design = FilterBankDesign {
            scale,
            number,
            frequency_min,
            frequency_max,
            squared,
        };
        let bank = TriangularFilterBank::new(&design, bins, ctx.sample_rate)
            .map_err(|reason| StageError::parameter("number", reason))?;
        Ok(Box::new(Self { bank }))
    }
}

impl Stage for FilterBank {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn input_len(&self) -> Option<usize> {
        Some(self.bank.bins())
    }

    fn output_len(&self, _input_len: usize) -> usize {
        self.bank.len()
    }

    fn apply(&self, input: &[f32], output: &mut [f32]) -> Result<(), StageError> {
        self.bank.apply(input, output);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stages::test_support::{build, run};

    #[test]
    fn test_defaults() {
        let stage = build("FilterBank", &[], Some(257)).unwrap();
        assert_eq!(stage.input_len(), Some(257));
        assert_eq!(stage.output_len(257), 32);
    }

    #[test]
    fn test_squared_shape_is_smaller() {
        let plain = build("FilterBank", &[("number", "8")], Some(257)).unwrap();
        let squared = build("FilterBank", &[("number", "8"), ("squared", "true")], Some(257)).unwrap();
        let flat = vec![1.0; 257];
        let a = run(plain.as_ref(), &flat);
        let b = run(squared.as_ref(), &flat);
        for (x, y) in a.iter().zip(b.iter()) {
            assert!(y < x);
            assert!(*y > 0.0);
        }
    }

    #[test]
    fn test_linear_and_bark() {
        for scale in ["linear", "bark"] {
            let stage = build("FilterBank", &[("type", scale), ("number", "16")], Some(257)).unwrap();
            let out = run(stage.as_ref(), &vec![1.0; 257]);
            assert_eq!(out.len(), 16);
            assert!(out.iter().all(|&v| v > 0.0));
        }
    }

    #[test]
    fn test_frequency_validation() {
        assert!(matches!(
            build("FilterBank", &[("frequency_max", "9000")], Some(257)),
            Err(StageError::Parameter { ref key, .. }) if key == "frequency_max"
        ));
        assert!(matches!(
            build("FilterBank", &[("frequency_min", "7000")], Some(257)),
            Err(StageError::Parameter { ref key, .. }) if key == "frequency_max"
        ));
        assert!(matches!(
            build("FilterBank", &[("squared", "1")], Some(257)),
            Err(StageError::Parameter { ref key, .. }) if key == "squared"
        ));
    }

    #[test]
    fn test_unframed_input() {
        assert!(matches!(build("FilterBank", &[], None), Err(StageError::Shape(_))));
    }
}
